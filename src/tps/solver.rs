use nalgebra::{clamp, DMatrix, Vector3};

use crate::landmark::LandmarkPair;
use crate::misc::FloatingPoint;
use crate::tps::coefficients::{NonAffineTerm, TpsCoefficients};
use crate::tps::kernel::radial_basis;

/// Solve for the thin-plate spline coefficients that carry each landmark's
/// source position to `lerp(src, dst, blend)` and interpolate smoothly
/// elsewhere.
///
/// The solver is total: an empty pair list yields the identity bundle, and
/// degenerate landmark configurations (collinear or coincident sources)
/// degrade to the least-norm solution of the rank-revealing factorization
/// rather than failing.
///
/// The i-th non-affine term of the result is centered exactly on
/// `pairs[i].src`, in input order.
///
/// # Examples
/// ```
/// use approx::assert_relative_eq;
/// use nalgebra::Point3;
/// use warpo::prelude::{solve, LandmarkPair};
///
/// let pairs = vec![LandmarkPair::new(
///     Point3::new(0., 0., 0.),
///     Point3::new(1., 0., 0.),
/// )];
/// let coef = solve(&pairs, 1.0);
/// let warped = coef.evaluate(&Point3::origin());
/// assert_relative_eq!(warped, Point3::new(1., 0., 0.), epsilon = 1e-4);
/// ```
pub fn solve<T: FloatingPoint>(pairs: &[LandmarkPair<T>], blend: T) -> TpsCoefficients<T> {
    if pairs.is_empty() {
        return TpsCoefficients::identity();
    }

    let blend = clamp(blend, T::zero(), T::one());
    let n = pairs.len();
    let size = n + 4;

    // Bordered system:
    //   | K   P | · C = V
    //   | Pᵀ  0 |
    // with K the kernel matrix over source landmarks and P the rows
    // [1, x, y, z]. The bottom-right 4×4 block stays zero.
    let mut l = DMatrix::<T>::zeros(size, size);
    for i in 0..n {
        for j in 0..n {
            let r2 = (pairs[i].src - pairs[j].src).norm_squared();
            l[(i, j)] = radial_basis(r2);
        }

        let p = &pairs[i].src;
        l[(i, n)] = T::one();
        l[(i, n + 1)] = p.x;
        l[(i, n + 2)] = p.y;
        l[(i, n + 3)] = p.z;

        l[(n, i)] = T::one();
        l[(n + 1, i)] = p.x;
        l[(n + 2, i)] = p.y;
        l[(n + 3, i)] = p.z;
    }

    // The three axis systems share L; solve them as one three-column
    // right-hand side against a single factorization.
    let mut rhs = DMatrix::<T>::zeros(size, 3);
    for (i, pair) in pairs.iter().enumerate() {
        let target = pair.warp_target(blend);
        rhs[(i, 0)] = target.x;
        rhs[(i, 1)] = target.y;
        rhs[(i, 2)] = target.z;
    }

    let svd = l.svd(true, true);
    let solution = match svd.solve(&rhs, T::default_epsilon()) {
        Ok(solution) => solution,
        // `solve` only errs on a negative epsilon; keep the function total.
        Err(_) => return identity_with_control_points(pairs),
    };

    let row = |i: usize| Vector3::new(solution[(i, 0)], solution[(i, 1)], solution[(i, 2)]);

    let non_affine = pairs
        .iter()
        .enumerate()
        .map(|(i, pair)| NonAffineTerm {
            weight: row(i),
            control_point: pair.src,
        })
        .collect();

    TpsCoefficients {
        a1: row(n),
        a2: row(n + 1),
        a3: row(n + 2),
        a4: row(n + 3),
        non_affine,
    }
}

/// Identity affine part with one zero-weight term per landmark, preserving
/// the one-term-per-pair shape of the bundle.
fn identity_with_control_points<T: FloatingPoint>(
    pairs: &[LandmarkPair<T>],
) -> TpsCoefficients<T> {
    TpsCoefficients {
        non_affine: pairs
            .iter()
            .map(|pair| NonAffineTerm {
                weight: Vector3::zeros(),
                control_point: pair.src,
            })
            .collect(),
        ..TpsCoefficients::identity()
    }
}
