use serde::{Deserialize, Serialize};

use super::{normalize_as, Coordinates, RegionInput, RegionKind};
use crate::model::{Region, RegionError};

/// storage/API representation of a region: a circle is `{lat, lng, radius}`,
/// a polygon an ordered `[{lat, lng}, ...]` with the separate `radius` column
/// left empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRecord {
    pub geofence_type: RegionKind,
    pub coordinates: RegionInput,
    #[serde(default)]
    pub radius: Option<f64>,
}

impl From<&Region> for RegionRecord {
    fn from(region: &Region) -> Self {
        match region {
            Region::Circle {
                center,
                radius_meters,
            } => RegionRecord {
                geofence_type: RegionKind::Circle,
                coordinates: RegionInput::Coordinates(Coordinates {
                    lat: center.latitude,
                    lng: center.longitude,
                    radius: Some(*radius_meters),
                }),
                radius: Some(*radius_meters),
            },
            Region::Polygon { vertices } => {
                let coordinates = vertices
                    .iter()
                    .map(|p| Coordinates {
                        lat: p.latitude,
                        lng: p.longitude,
                        radius: None,
                    })
                    .collect::<Vec<_>>();
                RegionRecord {
                    geofence_type: RegionKind::Polygon,
                    coordinates: RegionInput::from(coordinates),
                    radius: None,
                }
            }
        }
    }
}

impl TryFrom<&RegionRecord> for Region {
    type Error = RegionError;

    fn try_from(record: &RegionRecord) -> Result<Self, Self::Error> {
        // older rows keep the circle radius only in the radius column
        let coordinates = match (&record.coordinates, record.radius) {
            (RegionInput::Coordinates(c), Some(radius)) if c.radius.is_none() => {
                RegionInput::Coordinates(Coordinates {
                    radius: Some(radius),
                    ..*c
                })
            }
            (other, _) => other.clone(),
        };
        normalize_as(&coordinates, record.geofence_type)
    }
}
