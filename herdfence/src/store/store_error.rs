use chrono::{DateTime, Utc};
use herdfence_core::model::{DeviceId, GeofenceId, GroupId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("group {0} does not exist")]
    GroupNotFound(GroupId),
    /// device lookups happen both by store id and by hardware identifier
    #[error("device {0} does not exist")]
    DeviceNotFound(String),
    #[error("geofence {0} does not exist")]
    GeofenceNotFound(GeofenceId),
    #[error("position sample for device {0} at {1} already recorded")]
    DuplicateSample(DeviceId, DateTime<Utc>),
    #[error("{0}")]
    Backend(String),
}
