use async_trait::async_trait;

use super::DeviceError;

/// command channel to physical devices. implementations own their transport,
/// timeouts and encoding; the engine only sees whether the device accepted the
/// geofence.
#[async_trait]
pub trait DeviceIntegration: Send + Sync {
    /// pushes a circular geofence to the device addressed by `hardware_id`.
    /// `Ok(false)` means the channel answered but did not accept the command.
    async fn send_geofence(
        &self,
        hardware_id: &str,
        latitude: f64,
        longitude: f64,
        radius_meters: u32,
    ) -> Result<bool, DeviceError>;
}
