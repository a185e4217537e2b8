use serde::{Deserialize, Serialize};

use crate::dispatch::DispatchConfig;
use crate::error::HerdfenceError;
use crate::service::PositionConfig;

/// engine parameters. every field has a default so a partial file, or no
/// file at all, is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HerdfenceConfig {
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub positions: PositionConfig,
}

impl HerdfenceConfig {
    pub fn validate(&self) -> Result<(), HerdfenceError> {
        self.dispatch.validate()
    }

    /// loads the file when given, otherwise the defaults.
    pub fn from_optional_file(file: Option<&String>) -> Result<HerdfenceConfig, HerdfenceError> {
        let config = match file {
            None => HerdfenceConfig::default(),
            Some(f) => {
                log::info!("reading herdfence configuration from {f}");
                HerdfenceConfig::try_from(f)?
            }
        };
        config.validate()?;
        Ok(config)
    }
}

impl TryFrom<&String> for HerdfenceConfig {
    type Error = HerdfenceError;

    fn try_from(f: &String) -> Result<Self, Self::Error> {
        if f.ends_with(".toml") {
            let s = std::fs::read_to_string(f).map_err(|e| {
                HerdfenceError::ConfigurationError(format!("failure reading {f}: {e}"))
            })?;
            toml::from_str(&s).map_err(|e| {
                HerdfenceError::ConfigurationError(format!("failure decoding {f}: {e}"))
            })
        } else if f.ends_with(".json") {
            let s = std::fs::read_to_string(f).map_err(|e| {
                HerdfenceError::ConfigurationError(format!("failure reading {f}: {e}"))
            })?;
            serde_json::from_str(&s).map_err(|e| {
                HerdfenceError::ConfigurationError(format!("failure decoding {f}: {e}"))
            })
        } else {
            Err(HerdfenceError::ConfigurationError(format!(
                "unsupported file type: {f}"
            )))
        }
    }
}
