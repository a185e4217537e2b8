use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use herdfence_core::geometry;
use herdfence_core::model::{DeviceId, GeofenceId, Point, Region};
use serde::Serialize;
use serde_json::json;
use tokio::runtime::Runtime;

use crate::config::HerdfenceConfig;
use crate::device::LoggingDeviceIntegration;
use crate::dispatch::FanoutDispatcher;
use crate::error::HerdfenceError;
use crate::service::{PositionReport, PositionService};
use crate::store::{FleetSnapshot, GeofenceStore, InMemoryStore};

/// containment of (lat, lng) in a JSON region.
pub fn contains(region: &str, lat: f64, lng: f64) -> Result<String, HerdfenceError> {
    let region = parse_region(region)?;
    let point = Point::new(lat, lng)?;
    let inside = geometry::contains(&region, &point)?;
    to_json(&json!({
        "region": region,
        "point": point,
        "inside": inside,
    }))
}

pub fn summarize(region: &str) -> Result<String, HerdfenceError> {
    let region = parse_region(region)?;
    let summary = geometry::summarize(&region)?;
    to_json(&json!({
        "center": summary.center,
        "radius_meters": summary.radius_meters,
        "radius_whole_meters": summary.radius_as_whole_meters(),
    }))
}

/// runs the fan-out for a stored geofence against a dry-run device integration.
pub fn dispatch(
    fleet: &str,
    geofence_id: i64,
    config: Option<&String>,
) -> Result<String, HerdfenceError> {
    let config = HerdfenceConfig::from_optional_file(config)?;
    let store = load_store(fleet)?;
    let geofence = store.get_geofence(GeofenceId(geofence_id))?;
    let summary = geometry::summarize(&geofence.region)?;
    let dispatcher = Arc::new(FanoutDispatcher::new(
        store,
        Arc::new(LoggingDeviceIntegration),
        config.dispatch,
    ));
    let runtime = build_runtime()?;
    // the dispatch task must be spawned from inside the runtime
    let report = runtime
        .block_on(async {
            dispatcher
                .trigger_dispatch(geofence.group_id, &geofence.name, summary)
                .await
        })
        .map_err(|e| HerdfenceError::InternalError(format!("dispatch task failed: {e}")))?;
    to_json(&report)
}

/// records a position reported now and returns the stored sample.
pub fn classify(
    fleet: &str,
    device_id: i64,
    lat: f64,
    lng: f64,
    gps_valid: bool,
    config: Option<&String>,
) -> Result<String, HerdfenceError> {
    let config = HerdfenceConfig::from_optional_file(config)?;
    let store = load_store(fleet)?;
    let service = PositionService::new(store, config.positions);
    let report = PositionReport {
        timestamp: Utc::now(),
        point: Point::new(lat, lng)?,
        gps_valid,
        rssi: None,
        snr: None,
    };
    let runtime = build_runtime()?;
    let sample = runtime.block_on(service.record_position(DeviceId(device_id), report))?;
    to_json(&sample)
}

pub fn status(fleet: &str, device_id: i64) -> Result<String, HerdfenceError> {
    let store = load_store(fleet)?;
    let service = PositionService::new(store, Default::default());
    let runtime = build_runtime()?;
    let status = runtime.block_on(service.device_status(DeviceId(device_id)))?;
    to_json(&status)
}

fn parse_region(region: &str) -> Result<Region, HerdfenceError> {
    let value: serde_json::Value = serde_json::from_str(region)?;
    let region = geometry::normalize_value(&value)?;
    Ok(region)
}

fn load_store(fleet: &str) -> Result<Arc<dyn GeofenceStore>, HerdfenceError> {
    log::info!("loading fleet snapshot from {fleet}");
    let snapshot = FleetSnapshot::from_file(Path::new(fleet))?;
    let store = InMemoryStore::try_from(snapshot)?;
    Ok(Arc::new(store))
}

fn build_runtime() -> Result<Runtime, HerdfenceError> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| {
            HerdfenceError::InternalError(format!(
                "failure creating async rust tokio runtime: {e}"
            ))
        })
}

fn to_json<T: Serialize>(value: &T) -> Result<String, HerdfenceError> {
    let output = serde_json::to_string_pretty(value)?;
    Ok(output)
}
