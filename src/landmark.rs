use nalgebra::Point3;

use crate::misc::FloatingPoint;

/// An ordered pair of corresponding 3D positions: a point on the source
/// mesh and the destination it should warp to.
///
/// Equality is componentwise exact; a pair has no identity beyond its
/// positions.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LandmarkPair<T: FloatingPoint> {
    /// Position on the source mesh.
    pub src: Point3<T>,
    /// Corresponding position on the destination mesh.
    pub dst: Point3<T>,
}

impl<T: FloatingPoint> LandmarkPair<T> {
    pub fn new(src: Point3<T>, dst: Point3<T>) -> Self {
        Self { src, dst }
    }

    /// The position this pair asks the warp to reach, at a given blend
    /// factor: `src` at 0, `dst` at 1, linear in between.
    ///
    /// # Examples
    /// ```
    /// use nalgebra::Point3;
    /// use warpo::prelude::LandmarkPair;
    ///
    /// let pair = LandmarkPair::new(Point3::new(0., 0., 0.), Point3::new(2., 0., 0.));
    /// assert_eq!(pair.warp_target(0.5), Point3::new(1., 0., 0.));
    /// ```
    pub fn warp_target(&self, blend: T) -> Point3<T> {
        self.src + (self.dst - self.src) * blend
    }
}
