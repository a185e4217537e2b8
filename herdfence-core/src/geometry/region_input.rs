use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;

/// named-field coordinate object as sent by map clients: `{lat, lng, radius?}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
}

/// a single polygon vertex in either of the accepted object shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VertexInput {
    Coordinates(Coordinates),
    Mapping(HashMap<String, f64>),
}

/// region description in any of the shapes accepted at the normalization
/// boundary. a sequence describes a polygon, a single object a circle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RegionInput {
    Vertices(Vec<VertexInput>),
    Coordinates(Coordinates),
    Mapping(HashMap<String, f64>),
}

/// optional caller-declared geometry type, checked against the input shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    Circle,
    Polygon,
}

impl Display for RegionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegionKind::Circle => write!(f, "circle"),
            RegionKind::Polygon => write!(f, "polygon"),
        }
    }
}

impl RegionInput {
    pub fn kind(&self) -> RegionKind {
        match self {
            RegionInput::Vertices(_) => RegionKind::Polygon,
            RegionInput::Coordinates(_) | RegionInput::Mapping(_) => RegionKind::Circle,
        }
    }
}

impl From<Coordinates> for RegionInput {
    fn from(value: Coordinates) -> Self {
        RegionInput::Coordinates(value)
    }
}

impl From<Vec<Coordinates>> for RegionInput {
    fn from(value: Vec<Coordinates>) -> Self {
        RegionInput::Vertices(value.into_iter().map(VertexInput::Coordinates).collect())
    }
}
