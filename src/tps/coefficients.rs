use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use crate::misc::{FloatingPoint, PARALLEL_THRESHOLD};
use crate::tps::kernel::radial_basis;

/// The non-affine contribution of one landmark: a weight vector applied to
/// the radial basis kernel centered at the landmark's source position.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NonAffineTerm<T: FloatingPoint> {
    /// Per-axis kernel weight.
    pub weight: Vector3<T>,
    /// The source landmark position the kernel is centered on.
    pub control_point: Point3<T>,
}

/// A solved thin-plate spline coefficient bundle.
///
/// The warp it parameterizes is
///
/// ```text
/// f(p) = a1 + a2·pₓ + a3·p_y + a4·p_z + Σᵢ wᵢ · U(‖cᵢ − p‖)
/// ```
///
/// with one non-affine term per input landmark, in input order. The
/// identity bundle (the [`Default`]) maps every point to itself.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TpsCoefficients<T: FloatingPoint> {
    /// Constant affine term.
    pub a1: Vector3<T>,
    /// Affine coefficient on x.
    pub a2: Vector3<T>,
    /// Affine coefficient on y.
    pub a3: Vector3<T>,
    /// Affine coefficient on z.
    pub a4: Vector3<T>,
    /// Per-landmark kernel terms, ordered as the input pair list.
    pub non_affine: Vec<NonAffineTerm<T>>,
}

impl<T: FloatingPoint> TpsCoefficients<T> {
    /// The identity bundle: `a1 = 0`, `(a2, a3, a4)` the standard basis,
    /// no non-affine terms.
    ///
    /// # Examples
    /// ```
    /// use nalgebra::Point3;
    /// use warpo::prelude::TpsCoefficients;
    ///
    /// let identity = TpsCoefficients::<f64>::identity();
    /// let p = Point3::new(1.5, -2.0, 0.25);
    /// assert_eq!(identity.evaluate(&p), p);
    /// ```
    pub fn identity() -> Self {
        Self {
            a1: Vector3::zeros(),
            a2: Vector3::x(),
            a3: Vector3::y(),
            a4: Vector3::z(),
            non_affine: vec![],
        }
    }

    /// Number of non-affine terms.
    pub fn len(&self) -> usize {
        self.non_affine.len()
    }

    pub fn is_empty(&self) -> bool {
        self.non_affine.is_empty()
    }

    /// Evaluate the warp at a single point.
    pub fn evaluate(&self, point: &Point3<T>) -> Point3<T> {
        let mut warped =
            self.a1 + self.a2 * point.x + self.a3 * point.y + self.a4 * point.z;
        for term in &self.non_affine {
            let r2 = (term.control_point - point).norm_squared();
            warped += term.weight * radial_basis(r2);
        }
        Point3::from(warped)
    }

    /// Evaluate the warp at each input point, writing into `warped`.
    ///
    /// Points are independent; large batches are evaluated in parallel.
    ///
    /// # Panics
    ///
    /// Panics if `warped` does not have the same length as `points`.
    pub fn evaluate_batch(&self, points: &[Point3<T>], warped: &mut [Point3<T>]) {
        assert_eq!(points.len(), warped.len());
        if points.len() >= PARALLEL_THRESHOLD {
            warped
                .par_iter_mut()
                .zip(points.par_iter())
                .for_each(|(out, p)| *out = self.evaluate(p));
        } else {
            for (out, p) in warped.iter_mut().zip(points.iter()) {
                *out = self.evaluate(p);
            }
        }
    }
}

impl<T: FloatingPoint> Default for TpsCoefficients<T> {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_maps_points_to_themselves() {
        let identity = TpsCoefficients::<f64>::identity();
        for p in [
            Point3::origin(),
            Point3::new(1., 2., 3.),
            Point3::new(-7.5, 0.25, 1e3),
        ] {
            assert_eq!(identity.evaluate(&p), p);
        }
    }

    #[test]
    fn test_affine_only_bundle() {
        // Pure translation by (1, 2, 3).
        let coef = TpsCoefficients {
            a1: Vector3::new(1., 2., 3.),
            ..TpsCoefficients::identity()
        };
        let p = Point3::new(0.5, 0.5, 0.5);
        assert_relative_eq!(coef.evaluate(&p), Point3::new(1.5, 2.5, 3.5), epsilon = 1e-12);
    }

    #[test]
    fn test_batch_matches_single_evaluation() {
        let coef = TpsCoefficients {
            a1: Vector3::new(0.5, 0., 0.),
            non_affine: vec![NonAffineTerm {
                weight: Vector3::new(0.1, 0., 0.),
                control_point: Point3::new(1., 1., 1.),
            }],
            ..TpsCoefficients::identity()
        };
        let points: Vec<_> = (0..usize::max(8, crate::misc::PARALLEL_THRESHOLD + 1))
            .map(|i| Point3::new(i as f64 * 0.1, 0., 0.))
            .collect();
        let mut warped = vec![Point3::origin(); points.len()];
        coef.evaluate_batch(&points, &mut warped);
        for (p, w) in points.iter().zip(&warped) {
            assert_eq!(*w, coef.evaluate(p));
        }
    }

    #[test]
    #[should_panic]
    fn test_batch_rejects_mismatched_output_length() {
        let coef = TpsCoefficients::<f64>::identity();
        let points = vec![Point3::origin(); 4];
        let mut warped = vec![Point3::origin(); 3];
        coef.evaluate_batch(&points, &mut warped);
    }
}
