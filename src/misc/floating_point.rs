use nalgebra::RealField;
use num_traits::ToPrimitive;

/// Trait for floating point types (f32, f64)
/// Mainly used to identify the type of the field in nalgebra.
/// `Send + Sync` is required so that batched warps can be parallelized.
pub trait FloatingPoint: RealField + ToPrimitive + Copy + Send + Sync {
    /// Smallest positive normal value of the type,
    /// used to regularize the radial basis kernel at zero distance.
    fn min_positive() -> Self;
}

impl FloatingPoint for f32 {
    fn min_positive() -> Self {
        f32::MIN_POSITIVE
    }
}

impl FloatingPoint for f64 {
    fn min_positive() -> Self {
        f64::MIN_POSITIVE
    }
}
