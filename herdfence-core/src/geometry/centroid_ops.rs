use serde::{Deserialize, Serialize};

use crate::model::{Point, Region, RegionError, DEFAULT_RADIUS_METERS};

/// a region reduced to a single center and radius, the only form legacy
/// devices understand. for polygons the radius is advisory and must not be
/// used to classify positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionSummary {
    pub center: Point,
    pub radius_meters: f64,
}

impl RegionSummary {
    /// radius truncated to whole meters as sent over the device channel.
    pub fn radius_as_whole_meters(&self) -> u32 {
        self.radius_meters.trunc() as u32
    }
}

/// summarizes a region as a center point and radius. circles map to
/// themselves; polygons map to the mean of their vertices and
/// [`DEFAULT_RADIUS_METERS`].
pub fn summarize(region: &Region) -> Result<RegionSummary, RegionError> {
    region.validate()?;
    match region {
        Region::Circle {
            center,
            radius_meters,
        } => Ok(RegionSummary {
            center: *center,
            radius_meters: *radius_meters,
        }),
        Region::Polygon { vertices } => {
            let n = vertices.len() as f64;
            let (lat_sum, lng_sum) = vertices
                .iter()
                .fold((0.0, 0.0), |(lat, lng), p| (lat + p.latitude, lng + p.longitude));
            let center = Point::new(lat_sum / n, lng_sum / n)?;
            Ok(RegionSummary {
                center,
                radius_meters: DEFAULT_RADIUS_METERS,
            })
        }
    }
}
