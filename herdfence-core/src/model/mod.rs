mod device;
mod geofence;
mod group;
mod ids;
mod point;
mod position_sample;
mod region;
mod region_error;

pub use device::Device;
pub use geofence::Geofence;
pub use group::Group;
pub use ids::{DeviceId, GeofenceId, GroupId};
pub use point::Point;
pub use position_sample::PositionSample;
pub use region::{Region, DEFAULT_RADIUS_METERS, MIN_POLYGON_VERTICES};
pub use region_error::RegionError;
