use serde::{Deserialize, Serialize};

/// gating rules for classifying incoming positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionConfig {
    /// only classify positions reported with a valid GPS fix.
    #[serde(default = "default_true")]
    pub require_gps_fix: bool,
    /// treat (0, 0) as "no fix", as emitted by receivers without a lock.
    #[serde(default = "default_true")]
    pub skip_null_island: bool,
}

fn default_true() -> bool {
    true
}

impl Default for PositionConfig {
    fn default() -> Self {
        PositionConfig {
            require_gps_fix: true,
            skip_null_island: true,
        }
    }
}

impl PositionConfig {
    pub fn is_classifiable(&self, gps_valid: bool, is_null_island: bool) -> bool {
        (gps_valid || !self.require_gps_fix) && !(is_null_island && self.skip_null_island)
    }
}
