use serde::{Deserialize, Serialize};
use std::fmt::Display;

use super::RegionError;

/// a WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl Point {
    /// builds a point, rejecting non-finite or out-of-range coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Result<Point, RegionError> {
        let point = Point {
            latitude,
            longitude,
        };
        point.validate()?;
        Ok(point)
    }

    /// latitude must be in [-90, 90] and longitude in [-180, 180].
    pub fn validate(&self) -> Result<(), RegionError> {
        let lat_ok = self.latitude.is_finite() && (-90.0..=90.0).contains(&self.latitude);
        let lng_ok = self.longitude.is_finite() && (-180.0..=180.0).contains(&self.longitude);
        if lat_ok && lng_ok {
            Ok(())
        } else {
            Err(RegionError::InvalidCoordinate {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }

    /// receivers without a satellite fix commonly report (0, 0).
    pub fn is_null_island(&self) -> bool {
        self.latitude == 0.0 && self.longitude == 0.0
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

impl From<Point> for geo::Point<f64> {
    fn from(value: Point) -> Self {
        geo::Point::new(value.longitude, value.latitude)
    }
}

impl From<&Point> for geo::Coord<f64> {
    fn from(value: &Point) -> Self {
        geo::Coord {
            x: value.longitude,
            y: value.latitude,
        }
    }
}
