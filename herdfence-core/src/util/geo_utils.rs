use geo::{Distance, Haversine, Intersects, LineString};

use crate::model::Point;

/// great-circle distance in meters between two points on a spherical earth
/// using the haversine formula (mean earth radius).
pub fn haversine_distance_meters(a: &Point, b: &Point) -> f64 {
    Haversine.distance(geo::Point::from(*a), geo::Point::from(*b))
}

/// builds the closed ring for a set of open polygon vertices in (x=lng, y=lat)
/// order. the first coordinate is repeated at the end.
///
/// # Arguments
///
/// * `vertices` - open polygon ring
///
/// # Returns
///
/// * a closed `LineString`, empty if `vertices` is empty
pub fn closed_ring(vertices: &[Point]) -> LineString<f64> {
    let mut coords: Vec<geo::Coord<f64>> = vertices.iter().map(geo::Coord::from).collect();
    if let Some(first) = coords.first().copied() {
        coords.push(first);
    }
    LineString::new(coords)
}

/// true if the point lies exactly on one of the ring's edges or vertices.
pub fn on_ring_boundary(vertices: &[Point], point: &Point) -> bool {
    closed_ring(vertices).intersects(&geo::Point::from(*point))
}

#[cfg(test)]
mod test {
    use super::*;

    /// reference haversine with a 6,371,000 m sphere
    fn reference_haversine(a: &Point, b: &Point) -> f64 {
        let r = 6_371_000.0_f64;
        let (lat1, lat2) = (a.latitude.to_radians(), b.latitude.to_radians());
        let dlat = lat2 - lat1;
        let dlng = (b.longitude - a.longitude).to_radians();
        let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
        2.0 * r * h.sqrt().asin()
    }

    #[test]
    fn test_haversine_matches_reference_sphere() {
        let santiago = Point::new(-33.4489, -70.6693).unwrap();
        let valparaiso = Point::new(-33.0472, -71.6127).unwrap();
        let d = haversine_distance_meters(&santiago, &valparaiso);
        let expected = reference_haversine(&santiago, &valparaiso);
        assert!(((d - expected) / expected).abs() < 0.005, "{d} vs {expected}");
    }

    #[test]
    fn test_closed_ring() {
        let vertices = vec![
            Point::new(0.0, 0.0).unwrap(),
            Point::new(0.0, 1.0).unwrap(),
            Point::new(1.0, 1.0).unwrap(),
        ];
        let ring = closed_ring(&vertices);
        assert_eq!(ring.0.len(), 4);
        assert!(ring.is_closed());
        assert!(on_ring_boundary(&vertices, &Point::new(0.0, 0.5).unwrap()));
        assert!(!on_ring_boundary(&vertices, &Point::new(0.2, 0.8).unwrap()));
    }
}
