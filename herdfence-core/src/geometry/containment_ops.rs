use itertools::Itertools;

use crate::model::{Point, Region, RegionError};
use crate::util::geo_utils;

/// tests whether `point` lies inside `region`.
///
/// circles compare the haversine distance from the center against the radius
/// (boundary inclusive). polygons use the even-odd rule on (longitude, latitude)
/// treated as planar coordinates; a point exactly on an edge or vertex is
/// classified as outside.
///
/// # Arguments
/// * region - circle or polygon to test against
/// * point - position to classify
///
/// # Result
/// the verdict, or an error if either argument violates its invariants
pub fn contains(region: &Region, point: &Point) -> Result<bool, RegionError> {
    region.validate()?;
    point.validate()?;
    match region {
        Region::Circle {
            center,
            radius_meters,
        } => {
            let distance = geo_utils::haversine_distance_meters(center, point);
            Ok(distance <= *radius_meters)
        }
        Region::Polygon { vertices } => {
            if geo_utils::on_ring_boundary(vertices, point) {
                return Ok(false);
            }
            Ok(even_odd(vertices, point))
        }
    }
}

/// casts a ray toward +x and counts edge crossings. each edge is evaluated
/// independently so the result does not depend on which vertex the ring starts at.
fn even_odd(vertices: &[Point], point: &Point) -> bool {
    let (px, py) = (point.longitude, point.latitude);
    vertices
        .iter()
        .circular_tuple_windows::<(_, _)>()
        .filter(|(a, b)| {
            let (ax, ay) = (a.longitude, a.latitude);
            let (bx, by) = (b.longitude, b.latitude);
            if (ay > py) == (by > py) {
                return false;
            }
            let x_cross = (bx - ax) * (py - ay) / (by - ay) + ax;
            px < x_cross
        })
        .count()
        % 2
        == 1
}
