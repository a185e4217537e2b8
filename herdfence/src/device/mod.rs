mod device_error;
mod device_integration;
mod logging_device_integration;

pub use device_error::DeviceError;
pub use device_integration::DeviceIntegration;
pub use logging_device_integration::LoggingDeviceIntegration;
