use herdfence_core::model::RegionError;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum HerdfenceError {
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },
    #[error("store failure: {0}")]
    StoreError(String),
    #[error("rejected geometry: {source}")]
    InvalidRegion {
        #[from]
        source: RegionError,
    },
    #[error("invalid herdfence configuration: {0}")]
    ConfigurationError(String),
    #[error("failure reading file: {source}")]
    StdIoError {
        #[from]
        source: std::io::Error,
    },
    #[error("failure decoding JSON: {source}")]
    SerdeJsonError {
        #[from]
        source: serde_json::Error,
    },
    #[error("{0}")]
    InternalError(String),
}

impl From<StoreError> for HerdfenceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::GroupNotFound(id) => HerdfenceError::NotFound {
                kind: "group",
                id: id.to_string(),
            },
            StoreError::DeviceNotFound(id) => HerdfenceError::NotFound {
                kind: "device",
                id,
            },
            StoreError::GeofenceNotFound(id) => HerdfenceError::NotFound {
                kind: "geofence",
                id: id.to_string(),
            },
            other => HerdfenceError::StoreError(other.to_string()),
        }
    }
}
