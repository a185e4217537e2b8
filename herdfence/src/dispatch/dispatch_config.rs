use serde::{Deserialize, Serialize};

use crate::error::HerdfenceError;

pub const DEFAULT_MAX_CONCURRENT_SENDS: usize = 64;
pub const DEFAULT_MIN_RADIUS_METERS: u32 = 10;
pub const DEFAULT_MAX_RADIUS_METERS: u32 = 65535;

/// limits applied when pushing a geofence to the members of a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// hard cap on device commands in flight for a single dispatch.
    #[serde(default = "default_max_concurrent_sends")]
    pub max_concurrent_sends: usize,
    /// smallest radius the device channel can carry, in whole meters.
    #[serde(default = "default_min_radius_meters")]
    pub min_radius_meters: u32,
    /// largest radius the device channel can carry, in whole meters.
    #[serde(default = "default_max_radius_meters")]
    pub max_radius_meters: u32,
}

fn default_max_concurrent_sends() -> usize {
    DEFAULT_MAX_CONCURRENT_SENDS
}

fn default_min_radius_meters() -> u32 {
    DEFAULT_MIN_RADIUS_METERS
}

fn default_max_radius_meters() -> u32 {
    DEFAULT_MAX_RADIUS_METERS
}

impl Default for DispatchConfig {
    fn default() -> Self {
        DispatchConfig {
            max_concurrent_sends: DEFAULT_MAX_CONCURRENT_SENDS,
            min_radius_meters: DEFAULT_MIN_RADIUS_METERS,
            max_radius_meters: DEFAULT_MAX_RADIUS_METERS,
        }
    }
}

impl DispatchConfig {
    pub fn validate(&self) -> Result<(), HerdfenceError> {
        if self.max_concurrent_sends == 0 {
            return Err(HerdfenceError::ConfigurationError(String::from(
                "dispatch.max_concurrent_sends must be at least 1",
            )));
        }
        if self.min_radius_meters > self.max_radius_meters {
            return Err(HerdfenceError::ConfigurationError(format!(
                "dispatch.min_radius_meters ({}) exceeds dispatch.max_radius_meters ({})",
                self.min_radius_meters, self.max_radius_meters
            )));
        }
        Ok(())
    }

    pub fn radius_in_range(&self, radius_meters: u32) -> bool {
        (self.min_radius_meters..=self.max_radius_meters).contains(&radius_meters)
    }
}
