use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DeviceId, Point};

/// one reported position of a device. samples are append-only: the
/// `inside_geofence` verdict is the one computed when the sample was
/// recorded and is not revisited when geofences change later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    pub device_id: DeviceId,
    pub timestamp: DateTime<Utc>,
    pub point: Point,
    /// None when no verdict could be computed (no fix, or no active geofence).
    pub inside_geofence: Option<bool>,
    #[serde(default)]
    pub rssi: Option<i32>,
    #[serde(default)]
    pub snr: Option<f64>,
}
