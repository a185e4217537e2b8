mod centroid_ops;
mod classify_ops;
mod containment_ops;
mod normalize_ops;
mod region_input;
mod region_record;

pub use centroid_ops::{summarize, RegionSummary};
pub use classify_ops::classify;
pub use containment_ops::contains;
pub use normalize_ops::{normalize, normalize_as, normalize_value};
pub use region_input::{Coordinates, RegionInput, RegionKind, VertexInput};
pub use region_record::RegionRecord;
