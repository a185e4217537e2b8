use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegionError {
    #[error("invalid region: {0}")]
    InvalidRegion(String),
    #[error("polygon region has no vertices")]
    EmptyPolygon,
    #[error("coordinate out of range: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },
    #[error("unrecognized region input: {0}")]
    UnrecognizedInput(String),
}
