use herdfence_core::model::{DeviceId, PositionSample};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeofenceStatus {
    /// none of the device's groups has an active geofence.
    NoGeofence,
    /// a geofence applies but the device has not reported a position.
    NoLocation,
    Inside,
    Outside,
    /// the latest position was stored without a verdict.
    Unverified,
}

impl GeofenceStatus {
    pub fn from_latest(has_geofence: bool, latest: Option<&PositionSample>) -> GeofenceStatus {
        if !has_geofence {
            return GeofenceStatus::NoGeofence;
        }
        match latest.map(|s| s.inside_geofence) {
            None => GeofenceStatus::NoLocation,
            Some(Some(true)) => GeofenceStatus::Inside,
            Some(Some(false)) => GeofenceStatus::Outside,
            Some(None) => GeofenceStatus::Unverified,
        }
    }
}

/// geofence summary for one device, built from its latest stored sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceStatus {
    pub device_id: DeviceId,
    pub external_id: String,
    pub group_names: Vec<String>,
    pub geofence_names: Vec<String>,
    pub status: GeofenceStatus,
    pub last_position: Option<PositionSample>,
}
