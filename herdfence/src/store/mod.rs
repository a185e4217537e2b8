mod fleet_snapshot;
mod geofence_store;
mod in_memory_store;
mod store_error;

pub use fleet_snapshot::{FleetSnapshot, GeofenceSnapshot};
pub use geofence_store::{run_blocking, GeofenceStore, NewGeofence};
pub use in_memory_store::InMemoryStore;
pub use store_error::StoreError;
