use std::sync::Arc;

use chrono::{DateTime, Utc};
use herdfence_core::geometry::classify;
use herdfence_core::model::{Device, DeviceId, Geofence, Group, Point, PositionSample};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::{DeviceStatus, GeofenceStatus, PositionConfig};
use crate::error::HerdfenceError;
use crate::store::{run_blocking, GeofenceStore, StoreError};

/// a decoded position uplink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionReport {
    pub timestamp: DateTime<Utc>,
    pub point: Point,
    pub gps_valid: bool,
    #[serde(default)]
    pub rssi: Option<i32>,
    #[serde(default)]
    pub snr: Option<f64>,
}

pub struct PositionService {
    store: Arc<dyn GeofenceStore>,
    config: PositionConfig,
}

impl PositionService {
    pub fn new(store: Arc<dyn GeofenceStore>, config: PositionConfig) -> PositionService {
        PositionService { store, config }
    }

    /// classifies the reported position against the active geofences of all
    /// groups of the device and appends the resulting sample.
    pub async fn record_position(
        &self,
        device_id: DeviceId,
        report: PositionReport,
    ) -> Result<PositionSample, HerdfenceError> {
        report.point.validate()?;
        let (device, _, geofences) =
            run_blocking(&self.store, move |store| device_context(store, device_id)).await?;

        let classifiable = self
            .config
            .is_classifiable(report.gps_valid, report.point.is_null_island());
        let inside_geofence = if !classifiable {
            log::debug!(
                "position of device {} at {} has no usable fix, not classified",
                device.external_id,
                report.timestamp
            );
            None
        } else if geofences.is_empty() {
            None
        } else {
            Some(classify(&report.point, geofences.iter().map(|g| &g.region))?)
        };

        let sample = PositionSample {
            device_id: device.id,
            timestamp: report.timestamp,
            point: report.point,
            inside_geofence,
            rssi: report.rssi,
            snr: report.snr,
        };
        let stored = sample.clone();
        run_blocking(&self.store, move |store| store.insert_position_sample(stored)).await?;
        match sample.inside_geofence {
            Some(false) => log::warn!(
                "device {} ({}) reported {} outside its geofences",
                device.id,
                device.external_id,
                sample.point
            ),
            _ => log::debug!(
                "recorded position {} for device {} (inside: {:?})",
                sample.point,
                device.id,
                sample.inside_geofence
            ),
        }
        Ok(sample)
    }

    /// as [`PositionService::record_position`] for a device addressed by its
    /// hardware identifier.
    pub async fn record_position_by_external_id(
        &self,
        external_id: &str,
        report: PositionReport,
    ) -> Result<PositionSample, HerdfenceError> {
        let external_id = external_id.to_string();
        let device = run_blocking(&self.store, move |store| {
            store.get_device_by_external_id(&external_id)
        })
        .await?;
        self.record_position(device.id, report).await
    }

    pub async fn device_status(&self, device_id: DeviceId) -> Result<DeviceStatus, HerdfenceError> {
        let (device, groups, geofences, latest) = run_blocking(&self.store, move |store| {
            let (device, groups, geofences) = device_context(store, device_id)?;
            let latest = store.latest_position_for_device(device_id)?;
            Ok((device, groups, geofences, latest))
        })
        .await?;
        let status = GeofenceStatus::from_latest(!geofences.is_empty(), latest.as_ref());
        Ok(DeviceStatus {
            device_id: device.id,
            external_id: device.external_id,
            group_names: groups.into_iter().map(|g| g.name).collect(),
            geofence_names: geofences.into_iter().map(|g| g.name).collect(),
            status,
            last_position: latest,
        })
    }
}

/// the device, its groups, and the active geofences of those groups.
fn device_context(
    store: &dyn GeofenceStore,
    device_id: DeviceId,
) -> Result<(Device, Vec<Group>, Vec<Geofence>), StoreError> {
    let device = store.get_device(device_id)?;
    let groups = store.groups_for_device(device_id)?;
    let geofences = groups
        .iter()
        .map(|g| store.get_active_geofences_for_group(g.id))
        .flatten_ok()
        .collect::<Result<Vec<_>, _>>()?;
    Ok((device, groups, geofences))
}
