use std::sync::Arc;

use herdfence_core::model::{
    Device, DeviceId, Geofence, GeofenceId, Group, GroupId, PositionSample, Region,
};

use super::StoreError;
use crate::error::HerdfenceError;

/// values required to create a geofence. the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGeofence {
    pub group_id: GroupId,
    pub name: String,
    pub region: Region,
    pub active: bool,
}

/// persistence operations consumed by the engine. implementations are
/// expected to be consistent at the row level; calls may block, so async
/// callers go through [`run_blocking`].
pub trait GeofenceStore: Send + Sync {
    fn get_group(&self, id: GroupId) -> Result<Group, StoreError>;

    fn get_device(&self, id: DeviceId) -> Result<Device, StoreError>;

    fn get_device_by_external_id(&self, external_id: &str) -> Result<Device, StoreError>;

    /// devices for the given ids. ids without a device are skipped, since a
    /// membership row can outlive its device between reads.
    fn get_devices(&self, ids: &[DeviceId]) -> Result<Vec<Device>, StoreError>;

    fn groups_for_device(&self, id: DeviceId) -> Result<Vec<Group>, StoreError>;

    fn get_geofence(&self, id: GeofenceId) -> Result<Geofence, StoreError>;

    fn get_active_geofences_for_group(&self, id: GroupId) -> Result<Vec<Geofence>, StoreError>;

    fn insert_geofence(&self, geofence: NewGeofence) -> Result<Geofence, StoreError>;

    /// swaps the stored record for `geofence.id` as a whole.
    fn replace_geofence(&self, geofence: Geofence) -> Result<Geofence, StoreError>;

    fn remove_geofence(&self, id: GeofenceId) -> Result<Geofence, StoreError>;

    /// appends a sample. samples are never updated, a second sample with the
    /// same (device, timestamp) key is a [`StoreError::DuplicateSample`].
    fn insert_position_sample(&self, sample: PositionSample) -> Result<(), StoreError>;

    fn latest_position_for_device(&self, id: DeviceId)
        -> Result<Option<PositionSample>, StoreError>;

    /// most recent first.
    fn positions_for_device(
        &self,
        id: DeviceId,
        limit: usize,
    ) -> Result<Vec<PositionSample>, StoreError>;
}

/// runs a store operation on the blocking thread pool so that slow storage
/// does not stall the async workers.
pub async fn run_blocking<T, F>(store: &Arc<dyn GeofenceStore>, op: F) -> Result<T, HerdfenceError>
where
    T: Send + 'static,
    F: FnOnce(&dyn GeofenceStore) -> Result<T, StoreError> + Send + 'static,
{
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || op(store.as_ref()))
        .await
        .map_err(|e| HerdfenceError::InternalError(format!("store task did not complete: {e}")))?
        .map_err(HerdfenceError::from)
}
