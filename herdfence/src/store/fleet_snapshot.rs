use std::path::Path;

use herdfence_core::geometry::RegionRecord;
use herdfence_core::model::{Device, Geofence, GeofenceId, Group, GroupId, PositionSample, Region};
use serde::{Deserialize, Serialize};

use super::{GeofenceStore, InMemoryStore};
use crate::error::HerdfenceError;

/// a geofence row as exported by the geofence API: the region is kept in its
/// persisted `{geofence_type, coordinates, radius}` form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeofenceSnapshot {
    pub id: GeofenceId,
    pub group_id: GroupId,
    pub name: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(flatten)]
    pub region: RegionRecord,
}

fn default_active() -> bool {
    true
}

/// JSON export of devices, groups, geofences and recorded positions used to
/// seed an [`InMemoryStore`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FleetSnapshot {
    #[serde(default)]
    pub devices: Vec<Device>,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub geofences: Vec<GeofenceSnapshot>,
    #[serde(default)]
    pub positions: Vec<PositionSample>,
}

impl FleetSnapshot {
    pub fn from_file(path: &Path) -> Result<FleetSnapshot, HerdfenceError> {
        let contents = std::fs::read_to_string(path)?;
        let snapshot = serde_json::from_str(&contents)?;
        Ok(snapshot)
    }
}

impl TryFrom<FleetSnapshot> for InMemoryStore {
    type Error = HerdfenceError;

    fn try_from(snapshot: FleetSnapshot) -> Result<Self, Self::Error> {
        let store = InMemoryStore::new();
        for device in snapshot.devices {
            // apply the same identifier canonicalization as device registration
            let device = Device::new(device.id, &device.external_id, device.display_name);
            store.upsert_device(device)?;
        }
        for group in snapshot.groups {
            store.upsert_group(group)?;
        }
        for row in snapshot.geofences {
            let region = Region::try_from(&row.region).map_err(|e| {
                HerdfenceError::ConfigurationError(format!(
                    "geofence {} in snapshot has invalid geometry: {e}",
                    row.id
                ))
            })?;
            store.restore_geofence(Geofence {
                id: row.id,
                group_id: row.group_id,
                name: row.name,
                region,
                active: row.active,
            })?;
        }
        for sample in snapshot.positions {
            store.insert_position_sample(sample)?;
        }
        log::debug!("loaded fleet snapshot into in-memory store");
        Ok(store)
    }
}
