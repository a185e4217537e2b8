use herdfence_core::geometry::RegionSummary;
use herdfence_core::model::{Device, DeviceId, GroupId};
use serde::{Deserialize, Serialize};

/// result of pushing a geofence to one device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchOutcome {
    pub device_id: DeviceId,
    pub external_id: String,
    pub succeeded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DispatchOutcome {
    pub fn success(device: &Device) -> DispatchOutcome {
        DispatchOutcome {
            device_id: device.id,
            external_id: device.external_id.clone(),
            succeeded: true,
            error: None,
        }
    }

    pub fn failure(device: &Device, error: String) -> DispatchOutcome {
        DispatchOutcome {
            device_id: device.id,
            external_id: device.external_id.clone(),
            succeeded: false,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum DispatchStatus {
    /// every member was attempted once. individual sends may have failed.
    Completed,
    /// the group had no members, nothing was sent.
    EmptyGroup,
    /// membership could not be resolved, nothing was sent.
    Aborted { reason: String },
}

/// aggregate of one dispatch run. returned through the task's join handle
/// and logged, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchReport {
    pub group_id: GroupId,
    pub geofence_name: String,
    pub summary: RegionSummary,
    #[serde(flatten)]
    pub status: DispatchStatus,
    /// sorted by device id.
    pub outcomes: Vec<DispatchOutcome>,
}

impl DispatchReport {
    pub fn new(
        group_id: GroupId,
        geofence_name: &str,
        summary: RegionSummary,
        status: DispatchStatus,
        mut outcomes: Vec<DispatchOutcome>,
    ) -> DispatchReport {
        outcomes.sort_by_key(|o| o.device_id);
        DispatchReport {
            group_id,
            geofence_name: geofence_name.to_string(),
            summary,
            status,
            outcomes,
        }
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn outcome_for(&self, device_id: DeviceId) -> Option<&DispatchOutcome> {
        self.outcomes.iter().find(|o| o.device_id == device_id)
    }
}
