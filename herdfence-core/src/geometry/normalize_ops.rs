use std::collections::HashMap;

use super::{Coordinates, RegionInput, RegionKind, VertexInput};
use crate::model::{Point, Region, RegionError, DEFAULT_RADIUS_METERS};

const LATITUDE_KEYS: [&str; 2] = ["lat", "latitude"];
const LONGITUDE_KEYS: [&str; 3] = ["lng", "lon", "longitude"];
const RADIUS_KEY: &str = "radius";

/// converts any accepted region description into a validated canonical [`Region`].
///
/// # Arguments
/// * input - circle object/mapping or polygon vertex sequence
///
/// # Result
/// the canonical region, or the reason it was rejected. a missing circle radius
/// becomes [`DEFAULT_RADIUS_METERS`]; an empty vertex sequence is rejected with
/// [`RegionError::EmptyPolygon`].
pub fn normalize(input: &RegionInput) -> Result<Region, RegionError> {
    match input {
        RegionInput::Coordinates(coordinates) => normalize_circle(coordinates),
        RegionInput::Mapping(mapping) => {
            let coordinates = coordinates_from_mapping(mapping)?;
            normalize_circle(&coordinates)
        }
        RegionInput::Vertices(vertices) => normalize_polygon(vertices),
    }
}

/// same as [`normalize`], additionally requiring the input shape to match a
/// declared geometry type.
pub fn normalize_as(input: &RegionInput, kind: RegionKind) -> Result<Region, RegionError> {
    let found = input.kind();
    if found != kind {
        return Err(RegionError::InvalidRegion(format!(
            "declared {kind} geofence but coordinates describe a {found}"
        )));
    }
    normalize(input)
}

/// normalizes an untyped JSON payload.
pub fn normalize_value(value: &serde_json::Value) -> Result<Region, RegionError> {
    if let Some(array) = value.as_array() {
        if array.is_empty() {
            return Err(RegionError::EmptyPolygon);
        }
    }
    let input: RegionInput = serde_json::from_value(value.clone())
        .map_err(|e| RegionError::UnrecognizedInput(format!("{value}: {e}")))?;
    normalize(&input)
}

fn normalize_circle(coordinates: &Coordinates) -> Result<Region, RegionError> {
    let center = Point::new(coordinates.lat, coordinates.lng)?;
    let radius = coordinates.radius.unwrap_or(DEFAULT_RADIUS_METERS);
    Region::circle(center, radius)
}

fn normalize_polygon(vertices: &[VertexInput]) -> Result<Region, RegionError> {
    if vertices.is_empty() {
        return Err(RegionError::EmptyPolygon);
    }
    let mut points = vertices
        .iter()
        .map(|v| match v {
            VertexInput::Coordinates(c) => Point::new(c.lat, c.lng),
            VertexInput::Mapping(m) => {
                let c = coordinates_from_mapping(m)?;
                Point::new(c.lat, c.lng)
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    // repeated vertices do not count toward the minimum vertex count
    points.dedup();
    // rings read back from storage repeat the first vertex at the end
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    Region::polygon(points)
}

fn coordinates_from_mapping(mapping: &HashMap<String, f64>) -> Result<Coordinates, RegionError> {
    let lookup = |keys: &[&str]| keys.iter().find_map(|k| mapping.get(*k).copied());
    let lat = lookup(&LATITUDE_KEYS).ok_or_else(|| {
        RegionError::UnrecognizedInput(format!("mapping has no latitude key {LATITUDE_KEYS:?}"))
    })?;
    let lng = lookup(&LONGITUDE_KEYS).ok_or_else(|| {
        RegionError::UnrecognizedInput(format!("mapping has no longitude key {LONGITUDE_KEYS:?}"))
    })?;
    Ok(Coordinates {
        lat,
        lng,
        radius: mapping.get(RADIUS_KEY).copied(),
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_named_fields_and_mapping_agree() {
        let typed = RegionInput::Coordinates(Coordinates {
            lat: -33.45,
            lng: -70.66,
            radius: Some(250.0),
        });
        let mapping = RegionInput::Mapping(HashMap::from([
            ("lat".to_string(), -33.45),
            ("lng".to_string(), -70.66),
            ("radius".to_string(), 250.0),
        ]));
        let expected = Region::Circle {
            center: Point::new(-33.45, -70.66).unwrap(),
            radius_meters: 250.0,
        };
        assert_eq!(normalize(&typed), Ok(expected.clone()));
        assert_eq!(normalize(&mapping), Ok(expected));
    }

    #[test]
    fn test_missing_radius_uses_default() {
        let region = normalize_value(&json!({"lat": 10.0, "lng": 20.0})).unwrap();
        match region {
            Region::Circle { radius_meters, .. } => {
                assert_eq!(radius_meters, DEFAULT_RADIUS_METERS)
            }
            other => panic!("expected circle, found {other}"),
        }
    }

    #[test]
    fn test_mapping_aliases() {
        let region = normalize_value(&json!({"latitude": 1.5, "longitude": 2.5})).unwrap();
        assert_eq!(
            region,
            Region::Circle {
                center: Point::new(1.5, 2.5).unwrap(),
                radius_meters: DEFAULT_RADIUS_METERS
            }
        );
    }

    #[test]
    fn test_polygon_from_mixed_vertices() {
        let value = json!([
            {"lat": 0.0, "lng": 0.0},
            {"latitude": 0.0, "lon": 2.0},
            {"lat": 2.0, "lng": 2.0, "radius": null}
        ]);
        let region = normalize_value(&value).unwrap();
        match region {
            Region::Polygon { vertices } => assert_eq!(vertices.len(), 3),
            other => panic!("expected polygon, found {other}"),
        }
    }

    #[test]
    fn test_closed_ring_is_opened() {
        let value = json!([
            {"lat": 0.0, "lng": 0.0},
            {"lat": 0.0, "lng": 2.0},
            {"lat": 2.0, "lng": 2.0},
            {"lat": 2.0, "lng": 0.0},
            {"lat": 0.0, "lng": 0.0}
        ]);
        match normalize_value(&value).unwrap() {
            Region::Polygon { vertices } => {
                assert_eq!(vertices.len(), 4);
                assert_ne!(vertices.first(), vertices.last());
            }
            other => panic!("expected polygon, found {other}"),
        }
    }

    #[test]
    fn test_repeated_vertices_do_not_count() {
        let collapsed = json!([
            {"lat": 0.0, "lng": 0.0},
            {"lat": 0.0, "lng": 2.0},
            {"lat": 0.0, "lng": 0.0},
            {"lat": 0.0, "lng": 0.0}
        ]);
        assert!(matches!(
            normalize_value(&collapsed),
            Err(RegionError::InvalidRegion(_))
        ));

        let stuttered = json!([
            {"lat": 0.0, "lng": 0.0},
            {"lat": 0.0, "lng": 2.0},
            {"lat": 0.0, "lng": 2.0},
            {"lat": 2.0, "lng": 2.0}
        ]);
        match normalize_value(&stuttered).unwrap() {
            Region::Polygon { vertices } => assert_eq!(vertices.len(), 3),
            other => panic!("expected polygon, found {other}"),
        }
    }

    #[test]
    fn test_empty_polygon_is_an_error() {
        assert_eq!(normalize_value(&json!([])), Err(RegionError::EmptyPolygon));
        assert_eq!(
            normalize(&RegionInput::Vertices(vec![])),
            Err(RegionError::EmptyPolygon)
        );
    }

    #[test]
    fn test_degenerate_inputs_rejected() {
        let zero_radius = json!({"lat": 1.0, "lng": 1.0, "radius": 0.0});
        assert!(matches!(
            normalize_value(&zero_radius),
            Err(RegionError::InvalidRegion(_))
        ));
        let two_vertices = json!([{"lat": 1.0, "lng": 1.0}, {"lat": 2.0, "lng": 2.0}]);
        assert!(matches!(
            normalize_value(&two_vertices),
            Err(RegionError::InvalidRegion(_))
        ));
        let out_of_range = json!({"lat": 91.0, "lng": 1.0});
        assert!(matches!(
            normalize_value(&out_of_range),
            Err(RegionError::InvalidCoordinate { .. })
        ));
        assert!(matches!(
            normalize_value(&json!({"x": 1.0})),
            Err(RegionError::UnrecognizedInput(_))
        ));
        assert!(matches!(
            normalize_value(&json!("circle")),
            Err(RegionError::UnrecognizedInput(_))
        ));
    }

    #[test]
    fn test_declared_kind_must_match_shape() {
        let input = RegionInput::Coordinates(Coordinates {
            lat: 1.0,
            lng: 1.0,
            radius: None,
        });
        assert!(normalize_as(&input, RegionKind::Circle).is_ok());
        assert!(matches!(
            normalize_as(&input, RegionKind::Polygon),
            Err(RegionError::InvalidRegion(_))
        ));
    }

    #[test]
    fn test_deterministic() {
        let value = json!([{"lat": 1.0, "lng": 1.0}, {"lat": 1.0, "lng": 2.0}, {"lat": 2.0, "lng": 1.5}]);
        assert_eq!(normalize_value(&value), normalize_value(&value));
    }
}
