use crate::misc::FloatingPoint;

/// The 3D thin-plate spline radial basis kernel `U(r) = r² · log(r²)`,
/// written in terms of the squared distance so callers skip the square root.
///
/// At zero distance the kernel returns the smallest positive normal value
/// of the scalar type instead of zero. Coincident source landmarks would
/// otherwise zero out a diagonal entry of the interpolation matrix and drop
/// it below the rank the factorization needs.
///
/// # Examples
/// ```
/// use warpo::prelude::radial_basis;
///
/// let r: f64 = 2.0;
/// let r2 = r * r;
/// assert_eq!(radial_basis(r2), r2 * r2.ln());
/// assert_eq!(radial_basis(0.0), f64::MIN_POSITIVE);
/// ```
pub fn radial_basis<T: FloatingPoint>(r_squared: T) -> T {
    if r_squared <= T::zero() {
        T::min_positive()
    } else {
        r_squared * r_squared.ln()
    }
}
