mod device_status;
mod geofence_service;
mod position_config;
mod position_service;

pub use device_status::{DeviceStatus, GeofenceStatus};
pub use geofence_service::{GeofenceChange, GeofenceDraft, GeofenceService};
pub use position_config::PositionConfig;
pub use position_service::{PositionReport, PositionService};
