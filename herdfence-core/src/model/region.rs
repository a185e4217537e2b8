use serde::{Deserialize, Serialize};
use std::fmt::Display;

use super::{Point, RegionError};

/// radius used when a circle is described without one, and the advisory
/// radius reported for polygon summaries.
pub const DEFAULT_RADIUS_METERS: f64 = 100.0;

/// minimum number of vertices of a polygon region. the normalizer collapses
/// consecutive repeats and the closing vertex before this is checked.
pub const MIN_POLYGON_VERTICES: usize = 3;

/// canonical geofence geometry. polygon rings are stored open: the last
/// vertex implicitly connects back to the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Region {
    Circle { center: Point, radius_meters: f64 },
    Polygon { vertices: Vec<Point> },
}

impl Region {
    pub fn circle(center: Point, radius_meters: f64) -> Result<Region, RegionError> {
        let region = Region::Circle {
            center,
            radius_meters,
        };
        region.validate()?;
        Ok(region)
    }

    pub fn polygon(vertices: Vec<Point>) -> Result<Region, RegionError> {
        let region = Region::Polygon { vertices };
        region.validate()?;
        Ok(region)
    }

    /// checks the structural invariants of the region. regions built through
    /// the constructors or the normalizer always pass, but values can also
    /// arrive through deserialization.
    pub fn validate(&self) -> Result<(), RegionError> {
        match self {
            Region::Circle {
                center,
                radius_meters,
            } => {
                center.validate()?;
                if !radius_meters.is_finite() || *radius_meters <= 0.0 {
                    return Err(RegionError::InvalidRegion(format!(
                        "circle radius must be a positive number of meters, found {radius_meters}"
                    )));
                }
                Ok(())
            }
            Region::Polygon { vertices } => {
                if vertices.is_empty() {
                    return Err(RegionError::EmptyPolygon);
                }
                if vertices.len() < MIN_POLYGON_VERTICES {
                    return Err(RegionError::InvalidRegion(format!(
                        "polygon requires at least {MIN_POLYGON_VERTICES} vertices, found {}",
                        vertices.len()
                    )));
                }
                vertices.iter().try_for_each(Point::validate)
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Region::Circle { .. } => "circle",
            Region::Polygon { .. } => "polygon",
        }
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Region::Circle {
                center,
                radius_meters,
            } => write!(f, "circle {center} r={radius_meters}m"),
            Region::Polygon { vertices } => write!(f, "polygon with {} vertices", vertices.len()),
        }
    }
}
