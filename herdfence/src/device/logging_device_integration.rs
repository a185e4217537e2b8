use async_trait::async_trait;

use super::{DeviceError, DeviceIntegration};

/// dry-run integration that logs each command instead of transmitting it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingDeviceIntegration;

#[async_trait]
impl DeviceIntegration for LoggingDeviceIntegration {
    async fn send_geofence(
        &self,
        hardware_id: &str,
        latitude: f64,
        longitude: f64,
        radius_meters: u32,
    ) -> Result<bool, DeviceError> {
        log::info!(
            "dry run: geofence ({latitude:.6}, {longitude:.6}) r={radius_meters}m -> {hardware_id}"
        );
        Ok(true)
    }
}
