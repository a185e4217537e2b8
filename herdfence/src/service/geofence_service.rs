use std::sync::Arc;

use herdfence_core::geometry::{normalize, normalize_as, summarize, RegionInput, RegionKind};
use herdfence_core::model::{Geofence, GeofenceId, GroupId, Region};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::dispatch::{DispatchReport, FanoutDispatcher};
use crate::error::HerdfenceError;
use crate::store::{run_blocking, GeofenceStore, NewGeofence};

/// geofence as submitted by a client, before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeofenceDraft {
    pub group_id: GroupId,
    pub name: String,
    /// when present, the coordinates must describe a region of this kind.
    #[serde(default)]
    pub geofence_type: Option<RegionKind>,
    pub coordinates: RegionInput,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl GeofenceDraft {
    pub fn region(&self) -> Result<Region, HerdfenceError> {
        let region = match self.geofence_type {
            Some(kind) => normalize_as(&self.coordinates, kind)?,
            None => normalize(&self.coordinates)?,
        };
        Ok(region)
    }
}

/// a committed geofence write. `dispatch` is the handle of the detached
/// fan-out started for it; dropping it does not cancel the fan-out.
#[derive(Debug)]
pub struct GeofenceChange {
    pub geofence: Geofence,
    pub dispatch: JoinHandle<DispatchReport>,
}

pub struct GeofenceService {
    store: Arc<dyn GeofenceStore>,
    dispatcher: Arc<FanoutDispatcher>,
}

impl GeofenceService {
    pub fn new(store: Arc<dyn GeofenceStore>, dispatcher: Arc<FanoutDispatcher>) -> GeofenceService {
        GeofenceService { store, dispatcher }
    }

    pub async fn create_geofence(
        &self,
        draft: GeofenceDraft,
    ) -> Result<GeofenceChange, HerdfenceError> {
        let region = draft.region()?;
        let new_geofence = NewGeofence {
            group_id: draft.group_id,
            name: draft.name,
            region,
            active: draft.active,
        };
        let geofence =
            run_blocking(&self.store, move |store| store.insert_geofence(new_geofence)).await?;
        log::info!(
            "created {} geofence {} '{}' for group {}",
            geofence.region.kind(),
            geofence.id,
            geofence.name,
            geofence.group_id
        );
        let dispatch = self.dispatch_to_group(&geofence)?;
        Ok(GeofenceChange { geofence, dispatch })
    }

    pub async fn update_geofence(
        &self,
        id: GeofenceId,
        draft: GeofenceDraft,
    ) -> Result<GeofenceChange, HerdfenceError> {
        let region = draft.region()?;
        let replacement = Geofence {
            id,
            group_id: draft.group_id,
            name: draft.name,
            region,
            active: draft.active,
        };
        let geofence =
            run_blocking(&self.store, move |store| store.replace_geofence(replacement)).await?;
        log::info!(
            "updated geofence {} '{}' of group {}",
            geofence.id,
            geofence.name,
            geofence.group_id
        );
        let dispatch = self.dispatch_to_group(&geofence)?;
        Ok(GeofenceChange { geofence, dispatch })
    }

    /// removes the geofence. devices keep whatever they were last sent.
    pub async fn delete_geofence(&self, id: GeofenceId) -> Result<Geofence, HerdfenceError> {
        let removed = run_blocking(&self.store, move |store| store.remove_geofence(id)).await?;
        log::info!("deleted geofence {} '{}'", removed.id, removed.name);
        Ok(removed)
    }

    pub async fn get_geofence(&self, id: GeofenceId) -> Result<Geofence, HerdfenceError> {
        run_blocking(&self.store, move |store| store.get_geofence(id)).await
    }

    /// every committed create or update is pushed to the group, active or not.
    fn dispatch_to_group(
        &self,
        geofence: &Geofence,
    ) -> Result<JoinHandle<DispatchReport>, HerdfenceError> {
        let summary = summarize(&geofence.region)?;
        log::debug!(
            "dispatching geofence {} (active: {}) to group {}",
            geofence.id,
            geofence.active,
            geofence.group_id
        );
        let handle = self
            .dispatcher
            .trigger_dispatch(geofence.group_id, &geofence.name, summary);
        Ok(handle)
    }
}
