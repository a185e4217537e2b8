use super::contains;
use crate::model::{Point, Region, RegionError};

/// true if any of the regions contains the point. an empty set of regions
/// classifies every point as outside.
pub fn classify<'a, I>(point: &Point, regions: I) -> Result<bool, RegionError>
where
    I: IntoIterator<Item = &'a Region>,
{
    point.validate()?;
    for region in regions {
        if contains(region, point)? {
            return Ok(true);
        }
    }
    Ok(false)
}
