use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use herdfence_core::model::{
    Device, DeviceId, Geofence, GeofenceId, Group, GroupId, PositionSample,
};
use itertools::Itertools;

use super::{GeofenceStore, NewGeofence, StoreError};

#[derive(Debug, Default)]
struct StoreState {
    devices: HashMap<DeviceId, Device>,
    groups: BTreeMap<GroupId, Group>,
    geofences: BTreeMap<GeofenceId, Geofence>,
    positions: HashMap<DeviceId, BTreeMap<DateTime<Utc>, PositionSample>>,
    next_geofence_id: i64,
}

/// process-local [`GeofenceStore`] guarded by a single read/write lock. every
/// write replaces whole records, so readers never observe a partially
/// edited geofence or group.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> InMemoryStore {
        InMemoryStore::default()
    }

    pub fn upsert_device(&self, device: Device) -> Result<(), StoreError> {
        let mut state = self.write()?;
        state.devices.insert(device.id, device);
        Ok(())
    }

    pub fn upsert_group(&self, group: Group) -> Result<(), StoreError> {
        let mut state = self.write()?;
        if let Some(id) = group.members.iter().find(|id| !state.devices.contains_key(*id)) {
            return Err(StoreError::DeviceNotFound(id.to_string()));
        }
        state.groups.insert(group.id, group);
        Ok(())
    }

    /// replaces the member set of a group.
    pub fn set_group_members(
        &self,
        group_id: GroupId,
        members: impl IntoIterator<Item = DeviceId>,
    ) -> Result<(), StoreError> {
        let mut state = self.write()?;
        let members = members.into_iter().collect::<Vec<_>>();
        if let Some(id) = members.iter().find(|id| !state.devices.contains_key(*id)) {
            return Err(StoreError::DeviceNotFound(id.to_string()));
        }
        let group = state
            .groups
            .get_mut(&group_id)
            .ok_or(StoreError::GroupNotFound(group_id))?;
        group.members = members.into_iter().collect();
        Ok(())
    }

    /// inserts a geofence with a caller-chosen id, used when loading snapshots.
    pub fn restore_geofence(&self, geofence: Geofence) -> Result<(), StoreError> {
        let mut state = self.write()?;
        if !state.groups.contains_key(&geofence.group_id) {
            return Err(StoreError::GroupNotFound(geofence.group_id));
        }
        state.next_geofence_id = state.next_geofence_id.max(geofence.id.0);
        state.geofences.insert(geofence.id, geofence);
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreState>, StoreError> {
        self.state
            .read()
            .map_err(|e| StoreError::Backend(format!("store lock poisoned: {e}")))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreState>, StoreError> {
        self.state
            .write()
            .map_err(|e| StoreError::Backend(format!("store lock poisoned: {e}")))
    }
}

impl GeofenceStore for InMemoryStore {
    fn get_group(&self, id: GroupId) -> Result<Group, StoreError> {
        self.read()?
            .groups
            .get(&id)
            .cloned()
            .ok_or(StoreError::GroupNotFound(id))
    }

    fn get_device(&self, id: DeviceId) -> Result<Device, StoreError> {
        self.read()?
            .devices
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::DeviceNotFound(id.to_string()))
    }

    fn get_device_by_external_id(&self, external_id: &str) -> Result<Device, StoreError> {
        let key = external_id.trim().to_uppercase();
        self.read()?
            .devices
            .values()
            .find(|d| d.external_id == key)
            .cloned()
            .ok_or(StoreError::DeviceNotFound(key))
    }

    fn get_devices(&self, ids: &[DeviceId]) -> Result<Vec<Device>, StoreError> {
        let state = self.read()?;
        let devices = ids
            .iter()
            .unique()
            .filter_map(|id| state.devices.get(id).cloned())
            .collect();
        Ok(devices)
    }

    fn groups_for_device(&self, id: DeviceId) -> Result<Vec<Group>, StoreError> {
        let state = self.read()?;
        if !state.devices.contains_key(&id) {
            return Err(StoreError::DeviceNotFound(id.to_string()));
        }
        let groups = state
            .groups
            .values()
            .filter(|g| g.members.contains(&id))
            .cloned()
            .collect();
        Ok(groups)
    }

    fn get_geofence(&self, id: GeofenceId) -> Result<Geofence, StoreError> {
        self.read()?
            .geofences
            .get(&id)
            .cloned()
            .ok_or(StoreError::GeofenceNotFound(id))
    }

    fn get_active_geofences_for_group(&self, id: GroupId) -> Result<Vec<Geofence>, StoreError> {
        let state = self.read()?;
        if !state.groups.contains_key(&id) {
            return Err(StoreError::GroupNotFound(id));
        }
        let geofences = state
            .geofences
            .values()
            .filter(|g| g.group_id == id && g.active)
            .cloned()
            .collect();
        Ok(geofences)
    }

    fn insert_geofence(&self, geofence: NewGeofence) -> Result<Geofence, StoreError> {
        let mut state = self.write()?;
        if !state.groups.contains_key(&geofence.group_id) {
            return Err(StoreError::GroupNotFound(geofence.group_id));
        }
        state.next_geofence_id += 1;
        let stored = Geofence {
            id: GeofenceId(state.next_geofence_id),
            group_id: geofence.group_id,
            name: geofence.name,
            region: geofence.region,
            active: geofence.active,
        };
        state.geofences.insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn replace_geofence(&self, geofence: Geofence) -> Result<Geofence, StoreError> {
        let mut state = self.write()?;
        if !state.groups.contains_key(&geofence.group_id) {
            return Err(StoreError::GroupNotFound(geofence.group_id));
        }
        let slot = state
            .geofences
            .get_mut(&geofence.id)
            .ok_or(StoreError::GeofenceNotFound(geofence.id))?;
        *slot = geofence.clone();
        Ok(geofence)
    }

    fn remove_geofence(&self, id: GeofenceId) -> Result<Geofence, StoreError> {
        self.write()?
            .geofences
            .remove(&id)
            .ok_or(StoreError::GeofenceNotFound(id))
    }

    fn insert_position_sample(&self, sample: PositionSample) -> Result<(), StoreError> {
        let mut state = self.write()?;
        if !state.devices.contains_key(&sample.device_id) {
            return Err(StoreError::DeviceNotFound(sample.device_id.to_string()));
        }
        let series = state.positions.entry(sample.device_id).or_default();
        if series.contains_key(&sample.timestamp) {
            return Err(StoreError::DuplicateSample(
                sample.device_id,
                sample.timestamp,
            ));
        }
        series.insert(sample.timestamp, sample);
        Ok(())
    }

    fn latest_position_for_device(
        &self,
        id: DeviceId,
    ) -> Result<Option<PositionSample>, StoreError> {
        let state = self.read()?;
        let latest = state
            .positions
            .get(&id)
            .and_then(|series| series.values().next_back().cloned());
        Ok(latest)
    }

    fn positions_for_device(
        &self,
        id: DeviceId,
        limit: usize,
    ) -> Result<Vec<PositionSample>, StoreError> {
        let state = self.read()?;
        let samples = state
            .positions
            .get(&id)
            .map(|series| series.values().rev().take(limit).cloned().collect())
            .unwrap_or_default();
        Ok(samples)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;
    use herdfence_core::model::{Point, Region};

    fn store_with_group() -> InMemoryStore {
        let store = InMemoryStore::new();
        store
            .upsert_device(Device::new(DeviceId(1), "70b3d57ed8003421", None))
            .unwrap();
        store
            .upsert_group(Group::new(GroupId(10), "north paddock").with_members([DeviceId(1)]))
            .unwrap();
        store
    }

    fn circle() -> Region {
        Region::circle(Point::new(-33.45, -70.66).unwrap(), 200.0).unwrap()
    }

    fn sample(minute: u32) -> PositionSample {
        PositionSample {
            device_id: DeviceId(1),
            timestamp: Utc.with_ymd_and_hms(2025, 3, 1, 12, minute, 0).unwrap(),
            point: Point::new(-33.45, -70.66).unwrap(),
            inside_geofence: Some(true),
            rssi: Some(-97),
            snr: Some(7.5),
        }
    }

    #[test]
    fn test_geofence_lifecycle() {
        let store = store_with_group();
        let created = store
            .insert_geofence(NewGeofence {
                group_id: GroupId(10),
                name: String::from("corral"),
                region: circle(),
                active: true,
            })
            .unwrap();
        assert_eq!(
            store.get_active_geofences_for_group(GroupId(10)).unwrap(),
            vec![created.clone()]
        );

        let inactive = Geofence {
            active: false,
            ..created.clone()
        };
        store.replace_geofence(inactive).unwrap();
        assert!(store
            .get_active_geofences_for_group(GroupId(10))
            .unwrap()
            .is_empty());

        store.remove_geofence(created.id).unwrap();
        assert_eq!(
            store.get_geofence(created.id),
            Err(StoreError::GeofenceNotFound(created.id))
        );
    }

    #[test]
    fn test_geofence_requires_group() {
        let store = store_with_group();
        let result = store.insert_geofence(NewGeofence {
            group_id: GroupId(99),
            name: String::from("nowhere"),
            region: circle(),
            active: true,
        });
        assert_eq!(result, Err(StoreError::GroupNotFound(GroupId(99))));
    }

    #[test]
    fn test_external_id_lookup_ignores_case() {
        let store = store_with_group();
        let device = store.get_device_by_external_id("70B3D57ED8003421").unwrap();
        assert_eq!(device.id, DeviceId(1));
        assert_eq!(device.external_id, "70B3D57ED8003421");
    }

    #[test]
    fn test_samples_are_append_only() {
        let store = store_with_group();
        store.insert_position_sample(sample(0)).unwrap();
        store.insert_position_sample(sample(5)).unwrap();
        let duplicate = sample(5);
        assert!(matches!(
            store.insert_position_sample(duplicate),
            Err(StoreError::DuplicateSample(..))
        ));
        let latest = store.latest_position_for_device(DeviceId(1)).unwrap();
        assert_eq!(latest, Some(sample(5)));
        let history = store.positions_for_device(DeviceId(1), 10).unwrap();
        assert_eq!(history, vec![sample(5), sample(0)]);
    }

    #[test]
    fn test_membership_edits() {
        let store = store_with_group();
        store
            .upsert_device(Device::new(DeviceId(2), "a1", None))
            .unwrap();
        store
            .set_group_members(GroupId(10), [DeviceId(2)])
            .unwrap();
        assert!(store.groups_for_device(DeviceId(1)).unwrap().is_empty());
        assert_eq!(store.groups_for_device(DeviceId(2)).unwrap().len(), 1);
        assert_eq!(
            store.set_group_members(GroupId(10), [DeviceId(3)]),
            Err(StoreError::DeviceNotFound(String::from("3")))
        );
    }
}
