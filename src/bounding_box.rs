use nalgebra::{Point3, Vector3};

use crate::misc::FloatingPoint;

/// An axis-aligned bounding box in 3D space.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundingBox<T: FloatingPoint> {
    min: Point3<T>,
    max: Point3<T>,
}

impl<T: FloatingPoint> BoundingBox<T> {
    /// Create a new bounding box from a minimum and maximum point.
    /// The components are reordered so that `min <= max` holds per axis.
    pub fn new(min: Point3<T>, max: Point3<T>) -> Self {
        let mut tmin = min;
        let mut tmax = max;

        for i in 0..3 {
            tmin[i] = min[i].min(max[i]);
            tmax[i] = max[i].max(min[i]);
        }

        BoundingBox {
            min: tmin,
            max: tmax,
        }
    }

    /// Create a new bounding box from a point iterator.
    ///
    /// An empty iterator yields a degenerate box at the origin.
    ///
    /// # Examples
    /// ```
    /// use nalgebra::Point3;
    /// use warpo::prelude::BoundingBox;
    ///
    /// let b: BoundingBox<f64> = BoundingBox::new_with_points([
    ///     Point3::new(0., 2., 0.),
    ///     Point3::new(1., -1., 3.),
    /// ]);
    /// assert_eq!(*b.min(), Point3::new(0., -1., 0.));
    /// assert_eq!(*b.max(), Point3::new(1., 2., 3.));
    /// ```
    pub fn new_with_points<I: IntoIterator<Item = Point3<T>>>(iter: I) -> Self {
        let mut iter = iter.into_iter();
        let first = match iter.next() {
            Some(p) => p,
            None => Point3::origin(),
        };

        let mut min = first;
        let mut max = first;

        for point in iter {
            for i in 0..3 {
                min[i] = min[i].min(point[i]);
                max[i] = max[i].max(point[i]);
            }
        }

        Self { min, max }
    }

    pub fn min(&self) -> &Point3<T> {
        &self.min
    }

    pub fn max(&self) -> &Point3<T> {
        &self.max
    }

    pub fn center(&self) -> Point3<T> {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn size(&self) -> Vector3<T> {
        self.max - self.min
    }

    /// Check if a point lies inside the box (inclusive of the boundary).
    pub fn contains(&self, point: &Point3<T>) -> bool {
        (0..3).all(|i| self.min[i] <= point[i] && point[i] <= self.max[i])
    }
}
