use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use futures::FutureExt;
use herdfence_core::geometry::RegionSummary;
use herdfence_core::model::{Device, DeviceId, GroupId};
use tokio::task::JoinHandle;

use super::{DispatchConfig, DispatchOutcome, DispatchReport, DispatchStatus};
use crate::device::DeviceIntegration;
use crate::error::HerdfenceError;
use crate::store::{run_blocking, GeofenceStore};

/// pushes a region summary to every device of a group. each device gets at
/// most one attempt per dispatch and a failing device never affects the others.
pub struct FanoutDispatcher {
    store: Arc<dyn GeofenceStore>,
    devices: Arc<dyn DeviceIntegration>,
    config: DispatchConfig,
}

impl FanoutDispatcher {
    pub fn new(
        store: Arc<dyn GeofenceStore>,
        devices: Arc<dyn DeviceIntegration>,
        config: DispatchConfig,
    ) -> FanoutDispatcher {
        FanoutDispatcher {
            store,
            devices,
            config,
        }
    }

    /// starts a dispatch on a detached task and returns immediately. callers
    /// may drop the handle; the dispatch still runs to completion.
    pub fn trigger_dispatch(
        self: &Arc<Self>,
        group_id: GroupId,
        geofence_name: &str,
        summary: RegionSummary,
    ) -> JoinHandle<DispatchReport> {
        let dispatcher = Arc::clone(self);
        let geofence_name = geofence_name.to_string();
        tokio::spawn(async move {
            dispatcher
                .dispatch(group_id, &geofence_name, summary)
                .await
        })
    }

    /// resolves the members of `group_id` and sends `summary` to each of them.
    /// all failures are folded into the returned report.
    pub async fn dispatch(
        &self,
        group_id: GroupId,
        geofence_name: &str,
        summary: RegionSummary,
    ) -> DispatchReport {
        let members = match self.resolve_members(group_id).await {
            Ok(members) => members,
            Err(e) => {
                log::error!(
                    "geofence '{geofence_name}' not dispatched, unable to resolve group {group_id}: {e}"
                );
                let status = DispatchStatus::Aborted {
                    reason: e.to_string(),
                };
                return DispatchReport::new(group_id, geofence_name, summary, status, vec![]);
            }
        };

        if members.is_empty() {
            log::info!(
                "geofence '{geofence_name}' not dispatched, group {group_id} has no devices"
            );
            return DispatchReport::new(
                group_id,
                geofence_name,
                summary,
                DispatchStatus::EmptyGroup,
                vec![],
            );
        }

        let total = members.len();
        let radius_meters = summary.radius_as_whole_meters();
        let limit = self.config.max_concurrent_sends.max(1);
        log::debug!(
            "dispatching geofence '{geofence_name}' to {total} devices of group {group_id} ({limit} concurrent)"
        );

        let sends = members
            .iter()
            .map(|device| {
                self.send_to_device(device, group_id, geofence_name, &summary, radius_meters)
            })
            .collect::<Vec<_>>();
        let outcomes = stream::iter(sends)
            .buffer_unordered(limit)
            .collect::<Vec<_>>()
            .await;

        let report = DispatchReport::new(
            group_id,
            geofence_name,
            summary,
            DispatchStatus::Completed,
            outcomes,
        );
        log::info!(
            "geofence '{}' dispatched to group {}: {} succeeded, {} failed, {} total",
            geofence_name,
            group_id,
            report.succeeded(),
            report.failed(),
            total
        );
        report
    }

    async fn resolve_members(&self, group_id: GroupId) -> Result<Vec<Device>, HerdfenceError> {
        let (ids, devices) = run_blocking(&self.store, move |store| {
            let group = store.get_group(group_id)?;
            let ids = group.members.into_iter().collect::<Vec<DeviceId>>();
            let devices = store.get_devices(&ids)?;
            Ok((ids, devices))
        })
        .await?;
        for id in missing_members(&ids, &devices) {
            log::warn!("member {id} of group {group_id} has no device record, skipped");
        }
        Ok(devices)
    }

    async fn send_to_device(
        &self,
        device: &Device,
        group_id: GroupId,
        geofence_name: &str,
        summary: &RegionSummary,
        radius_meters: u32,
    ) -> DispatchOutcome {
        if !self.config.radius_in_range(radius_meters) {
            let error = format!(
                "radius {radius_meters} m outside device range [{}, {}] m",
                self.config.min_radius_meters, self.config.max_radius_meters
            );
            log::warn!(
                "device {} ({}) of group {group_id} skipped for geofence '{geofence_name}': {error}",
                device.id,
                device.external_id
            );
            return DispatchOutcome::failure(device, error);
        }

        let send = self.devices.send_geofence(
            &device.external_id,
            summary.center.latitude,
            summary.center.longitude,
            radius_meters,
        );
        let result = match AssertUnwindSafe(send).catch_unwind().await {
            Ok(Ok(true)) => Ok(()),
            Ok(Ok(false)) => Err(String::from("device did not accept the geofence")),
            Ok(Err(e)) => Err(e.to_string()),
            Err(panic) => Err(format!("device send panicked: {}", panic_message(panic.as_ref()))),
        };

        match result {
            Ok(()) => {
                log::info!(
                    "geofence '{geofence_name}' sent to device {} ({}) of group {group_id}",
                    device.id,
                    device.external_id
                );
                DispatchOutcome::success(device)
            }
            Err(error) => {
                log::error!(
                    "geofence '{geofence_name}' not delivered to device {} ({}) of group {group_id}: {error}",
                    device.id,
                    device.external_id
                );
                DispatchOutcome::failure(device, error)
            }
        }
    }
}

/// member ids of the group that did not resolve to a device.
fn missing_members(ids: &[DeviceId], devices: &[Device]) -> Vec<DeviceId> {
    ids.iter()
        .filter(|id| !devices.iter().any(|d| d.id == **id))
        .copied()
        .collect()
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        String::from("unknown panic payload")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::device::DeviceError;
    use crate::store::InMemoryStore;
    use async_trait::async_trait;
    use herdfence_core::model::{Group, Point};
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// records every command, fails or panics for selected hardware ids.
    #[derive(Default)]
    struct RecordingDeviceIntegration {
        failing: HashSet<String>,
        rejecting: HashSet<String>,
        panicking: HashSet<String>,
        delay: Option<Duration>,
        sent: Mutex<Vec<(String, f64, f64, u32)>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl RecordingDeviceIntegration {
        fn sent(&self) -> Vec<(String, f64, f64, u32)> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DeviceIntegration for RecordingDeviceIntegration {
        async fn send_geofence(
            &self,
            hardware_id: &str,
            latitude: f64,
            longitude: f64,
            radius_meters: u32,
        ) -> Result<bool, DeviceError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.sent.lock().unwrap().push((
                hardware_id.to_string(),
                latitude,
                longitude,
                radius_meters,
            ));
            if self.panicking.contains(hardware_id) {
                panic!("radio driver crashed");
            }
            if self.failing.contains(hardware_id) {
                return Err(DeviceError::Unreachable {
                    hardware_id: hardware_id.to_string(),
                    reason: String::from("no gateway in range"),
                });
            }
            Ok(!self.rejecting.contains(hardware_id))
        }
    }

    fn store_with_members(count: i64) -> Arc<InMemoryStore> {
        let store = InMemoryStore::new();
        for i in 1..=count {
            store
                .upsert_device(Device::new(DeviceId(i), &format!("dev-{i}"), None))
                .unwrap();
        }
        store
            .upsert_group(Group::new(GroupId(1), "herd").with_members((1..=count).map(DeviceId)))
            .unwrap();
        Arc::new(store)
    }

    fn summary(radius_meters: f64) -> RegionSummary {
        RegionSummary {
            center: Point::new(-33.45, -70.66).unwrap(),
            radius_meters,
        }
    }

    fn dispatcher(
        store: Arc<InMemoryStore>,
        devices: Arc<RecordingDeviceIntegration>,
        config: DispatchConfig,
    ) -> Arc<FanoutDispatcher> {
        Arc::new(FanoutDispatcher::new(store, devices, config))
    }

    #[tokio::test]
    async fn test_one_failing_device_does_not_affect_others() {
        let devices = Arc::new(RecordingDeviceIntegration {
            failing: HashSet::from([String::from("DEV-2")]),
            ..Default::default()
        });
        let fanout = dispatcher(
            store_with_members(3),
            devices.clone(),
            DispatchConfig::default(),
        );
        let report = fanout
            .trigger_dispatch(GroupId(1), "corral", summary(150.7))
            .await
            .unwrap();

        assert_eq!(report.status, DispatchStatus::Completed);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert!(report.outcome_for(DeviceId(1)).unwrap().succeeded);
        let b = report.outcome_for(DeviceId(2)).unwrap();
        assert!(!b.succeeded);
        assert!(b.error.as_ref().unwrap().contains("no gateway in range"));
        assert!(report.outcome_for(DeviceId(3)).unwrap().succeeded);
        assert_eq!(
            report.outcomes.iter().map(|o| o.device_id).collect::<Vec<_>>(),
            vec![DeviceId(1), DeviceId(2), DeviceId(3)]
        );

        let sent = devices.sent();
        assert_eq!(sent.len(), 3);
        assert!(sent
            .iter()
            .all(|(_, lat, lng, r)| *lat == -33.45 && *lng == -70.66 && *r == 150));
    }

    #[tokio::test]
    async fn test_rejected_command_is_a_failure() {
        let devices = Arc::new(RecordingDeviceIntegration {
            rejecting: HashSet::from([String::from("DEV-1")]),
            ..Default::default()
        });
        let fanout = dispatcher(store_with_members(1), devices, DispatchConfig::default());
        let report = fanout.dispatch(GroupId(1), "corral", summary(100.0)).await;
        assert_eq!(report.failed(), 1);
        assert_eq!(
            report.outcomes[0].error.as_deref(),
            Some("device did not accept the geofence")
        );
    }

    #[tokio::test]
    async fn test_empty_group_sends_nothing() {
        let devices = Arc::new(RecordingDeviceIntegration::default());
        let fanout = dispatcher(
            store_with_members(0),
            devices.clone(),
            DispatchConfig::default(),
        );
        let report = fanout.dispatch(GroupId(1), "corral", summary(100.0)).await;
        assert_eq!(report.status, DispatchStatus::EmptyGroup);
        assert!(report.outcomes.is_empty());
        assert!(devices.sent().is_empty());
    }

    #[tokio::test]
    async fn test_missing_group_aborts() {
        let devices = Arc::new(RecordingDeviceIntegration::default());
        let fanout = dispatcher(
            store_with_members(2),
            devices.clone(),
            DispatchConfig::default(),
        );
        let report = fanout.dispatch(GroupId(42), "corral", summary(100.0)).await;
        match report.status {
            DispatchStatus::Aborted { reason } => assert!(reason.contains("42")),
            other => panic!("expected aborted dispatch, found {other:?}"),
        }
        assert!(devices.sent().is_empty());
    }

    #[tokio::test]
    async fn test_panicking_send_is_isolated() {
        let devices = Arc::new(RecordingDeviceIntegration {
            panicking: HashSet::from([String::from("DEV-1")]),
            ..Default::default()
        });
        let fanout = dispatcher(store_with_members(2), devices, DispatchConfig::default());
        let report = fanout
            .trigger_dispatch(GroupId(1), "corral", summary(100.0))
            .await
            .unwrap();
        let failed = report.outcome_for(DeviceId(1)).unwrap();
        assert!(!failed.succeeded);
        assert!(failed.error.as_ref().unwrap().contains("radio driver crashed"));
        assert!(report.outcome_for(DeviceId(2)).unwrap().succeeded);
    }

    #[tokio::test]
    async fn test_concurrency_cap_is_honoured() {
        let devices = Arc::new(RecordingDeviceIntegration {
            delay: Some(Duration::from_millis(10)),
            ..Default::default()
        });
        let config = DispatchConfig {
            max_concurrent_sends: 3,
            ..Default::default()
        };
        let fanout = dispatcher(store_with_members(12), devices.clone(), config);
        let report = fanout.dispatch(GroupId(1), "corral", summary(100.0)).await;
        assert_eq!(report.succeeded(), 12);
        let max_in_flight = devices.max_in_flight.load(Ordering::SeqCst);
        assert_eq!(max_in_flight, 3, "{max_in_flight} sends were in flight");
    }

    #[tokio::test]
    async fn test_membership_resolved_when_dispatch_runs() {
        let store = store_with_members(3);
        let devices = Arc::new(RecordingDeviceIntegration::default());
        let fanout = dispatcher(store.clone(), devices.clone(), DispatchConfig::default());
        // the current-thread runtime does not poll the task until this test yields
        let handle = fanout.trigger_dispatch(GroupId(1), "corral", summary(100.0));
        store
            .set_group_members(GroupId(1), [DeviceId(2), DeviceId(3)])
            .unwrap();
        let report = handle.await.unwrap();
        assert_eq!(
            report.outcomes.iter().map(|o| o.device_id).collect::<Vec<_>>(),
            vec![DeviceId(2), DeviceId(3)]
        );
        let mut sent = devices
            .sent()
            .into_iter()
            .map(|(hardware_id, ..)| hardware_id)
            .collect::<Vec<_>>();
        sent.sort();
        assert_eq!(sent, vec![String::from("DEV-2"), String::from("DEV-3")]);
    }

    #[test]
    fn test_missing_members_are_reported() {
        let devices = vec![
            Device::new(DeviceId(1), "a1", None),
            Device::new(DeviceId(3), "c3", None),
        ];
        let ids = [DeviceId(1), DeviceId(2), DeviceId(3), DeviceId(4)];
        assert_eq!(
            missing_members(&ids, &devices),
            vec![DeviceId(2), DeviceId(4)]
        );
        assert!(missing_members(&ids[..1], &devices).is_empty());
    }

    #[tokio::test]
    async fn test_radius_outside_device_range_is_not_sent() {
        let devices = Arc::new(RecordingDeviceIntegration::default());
        let fanout = dispatcher(
            store_with_members(2),
            devices.clone(),
            DispatchConfig::default(),
        );
        let report = fanout.dispatch(GroupId(1), "corral", summary(9.9)).await;
        assert_eq!(report.status, DispatchStatus::Completed);
        assert_eq!(report.failed(), 2);
        assert!(devices.sent().is_empty());

        let report = fanout.dispatch(GroupId(1), "corral", summary(70000.0)).await;
        assert_eq!(report.failed(), 2);
        assert!(devices.sent().is_empty());
    }
}
