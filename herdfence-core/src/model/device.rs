use serde::{Deserialize, Serialize};

use super::DeviceId;

/// a tracked device. `external_id` is the hardware identifier used to
/// address the device through the device integration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub external_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl Device {
    /// hardware identifiers are stored upper-cased so lookups from uplink
    /// payloads match regardless of the case the network server reports.
    pub fn new(id: DeviceId, external_id: &str, display_name: Option<String>) -> Device {
        Device {
            id,
            external_id: external_id.trim().to_uppercase(),
            display_name,
        }
    }
}
