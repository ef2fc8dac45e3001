pub mod floating_point;

pub use floating_point::*;

/// Below this many points, batched operations stay sequential;
/// the rayon overhead outweighs the work.
pub(crate) const PARALLEL_THRESHOLD: usize = 1024;
