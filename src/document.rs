use std::collections::BTreeMap;

use itertools::{EitherOrBoth, Itertools};
use nalgebra::{clamp, Point3};

use crate::landmark::LandmarkPair;
use crate::mesh::TriangleMesh;
use crate::misc::FloatingPoint;

/// Which half of the document an edit targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DocumentSide {
    Source,
    Destination,
}

/// One half of the editable document: a mesh plus indexed landmark
/// positions.
///
/// The source and destination halves share the landmark index space: index
/// `k` on the source corresponds to index `k` on the destination. Indices
/// present on only one half are unpaired and excluded from solving.
#[derive(Clone, Debug, PartialEq)]
pub struct DocumentInput<T: FloatingPoint> {
    mesh: TriangleMesh<T>,
    landmarks: BTreeMap<usize, Point3<T>>,
}

impl<T: FloatingPoint> DocumentInput<T> {
    pub fn new(mesh: TriangleMesh<T>) -> Self {
        Self {
            mesh,
            landmarks: BTreeMap::new(),
        }
    }

    pub fn mesh(&self) -> &TriangleMesh<T> {
        &self.mesh
    }

    /// Replace the mesh, keeping the landmarks.
    pub fn set_mesh(&mut self, mesh: TriangleMesh<T>) {
        self.mesh = mesh;
    }

    pub fn landmarks(&self) -> &BTreeMap<usize, Point3<T>> {
        &self.landmarks
    }

    pub fn landmark(&self, index: usize) -> Option<&Point3<T>> {
        self.landmarks.get(&index)
    }

    /// Insert or move the landmark at `index`.
    pub fn set_landmark(&mut self, index: usize, position: Point3<T>) {
        self.landmarks.insert(index, position);
    }

    /// Remove the landmark at `index`, returning its position if present.
    pub fn remove_landmark(&mut self, index: usize) -> Option<Point3<T>> {
        self.landmarks.remove(&index)
    }
}

impl<T: FloatingPoint> Default for DocumentInput<T> {
    fn default() -> Self {
        Self::new(TriangleMesh::empty())
    }
}

/// The editable state of a warping session: source input, destination
/// input, and the blend factor.
///
/// Documents have value semantics; the undo/redo store snapshots them by
/// clone and compares them by equality.
#[derive(Clone, Debug, PartialEq)]
pub struct Document<T: FloatingPoint> {
    source: DocumentInput<T>,
    destination: DocumentInput<T>,
    blend: T,
}

impl<T: FloatingPoint> Document<T> {
    /// Create a document over a source and destination mesh, with no
    /// landmarks and a blend factor of 1.
    pub fn new(source_mesh: TriangleMesh<T>, destination_mesh: TriangleMesh<T>) -> Self {
        Self {
            source: DocumentInput::new(source_mesh),
            destination: DocumentInput::new(destination_mesh),
            blend: T::one(),
        }
    }

    pub fn source(&self) -> &DocumentInput<T> {
        &self.source
    }

    pub fn destination(&self) -> &DocumentInput<T> {
        &self.destination
    }

    pub fn input(&self, side: DocumentSide) -> &DocumentInput<T> {
        match side {
            DocumentSide::Source => &self.source,
            DocumentSide::Destination => &self.destination,
        }
    }

    pub fn input_mut(&mut self, side: DocumentSide) -> &mut DocumentInput<T> {
        match side {
            DocumentSide::Source => &mut self.source,
            DocumentSide::Destination => &mut self.destination,
        }
    }

    /// Blend factor in `[0, 1]`.
    pub fn blend(&self) -> T {
        self.blend
    }

    /// Set the blend factor, clamped to `[0, 1]`.
    pub fn set_blend(&mut self, blend: T) {
        self.blend = clamp(blend, T::zero(), T::one());
    }

    /// Place a new landmark on one side, allocating the next free index in
    /// the shared index space, and return that index.
    ///
    /// # Examples
    /// ```
    /// use nalgebra::Point3;
    /// use warpo::prelude::{Document, DocumentSide, TriangleMesh};
    ///
    /// let mut doc = Document::<f64>::new(TriangleMesh::empty(), TriangleMesh::empty());
    /// let k = doc.place_landmark(DocumentSide::Source, Point3::origin());
    /// doc.set_landmark(DocumentSide::Destination, k, Point3::new(1., 0., 0.));
    /// assert_eq!(doc.landmark_pairs().len(), 1);
    /// ```
    pub fn place_landmark(&mut self, side: DocumentSide, position: Point3<T>) -> usize {
        let index = self.next_landmark_index();
        self.input_mut(side).set_landmark(index, position);
        index
    }

    /// Insert or move the landmark at `index` on one side.
    pub fn set_landmark(&mut self, side: DocumentSide, index: usize, position: Point3<T>) {
        self.input_mut(side).set_landmark(index, position);
    }

    /// Remove the landmark at `index` from one side.
    pub fn remove_landmark(&mut self, side: DocumentSide, index: usize) -> Option<Point3<T>> {
        self.input_mut(side).remove_landmark(index)
    }

    /// Remove the landmark at `index` from both sides.
    pub fn remove_landmark_pair(&mut self, index: usize) {
        self.source.remove_landmark(index);
        self.destination.remove_landmark(index);
    }

    /// The paired landmarks: intersection of the two index spaces, in
    /// ascending index order. This is the pair list the solver sees.
    pub fn landmark_pairs(&self) -> Vec<LandmarkPair<T>> {
        self.source
            .landmarks
            .iter()
            .merge_join_by(self.destination.landmarks.iter(), |(a, _), (b, _)| a.cmp(b))
            .filter_map(|entry| match entry {
                EitherOrBoth::Both((_, src), (_, dst)) => Some(LandmarkPair::new(*src, *dst)),
                _ => None,
            })
            .collect()
    }

    /// Indices present on at least one side.
    pub fn landmark_indices(&self) -> Vec<usize> {
        self.source
            .landmarks
            .keys()
            .merge(self.destination.landmarks.keys())
            .dedup()
            .copied()
            .collect()
    }

    fn next_landmark_index(&self) -> usize {
        self.source
            .landmarks
            .keys()
            .chain(self.destination.landmarks.keys())
            .max()
            .map_or(0, |m| m + 1)
    }
}

impl<T: FloatingPoint> Default for Document<T> {
    fn default() -> Self {
        Self::new(TriangleMesh::empty(), TriangleMesh::empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpaired_landmarks_are_excluded() {
        let mut doc = Document::<f64>::default();
        doc.set_landmark(DocumentSide::Source, 0, Point3::new(0., 0., 0.));
        doc.set_landmark(DocumentSide::Source, 1, Point3::new(1., 0., 0.));
        doc.set_landmark(DocumentSide::Destination, 1, Point3::new(1., 1., 0.));
        doc.set_landmark(DocumentSide::Destination, 2, Point3::new(2., 0., 0.));

        let pairs = doc.landmark_pairs();
        assert_eq!(
            pairs,
            vec![LandmarkPair::new(
                Point3::new(1., 0., 0.),
                Point3::new(1., 1., 0.)
            )]
        );
        assert_eq!(doc.landmark_indices(), vec![0, 1, 2]);
    }

    #[test]
    fn test_pairs_are_ordered_by_index() {
        let mut doc = Document::<f64>::default();
        for k in [3usize, 0, 7] {
            doc.set_landmark(DocumentSide::Source, k, Point3::new(k as f64, 0., 0.));
            doc.set_landmark(DocumentSide::Destination, k, Point3::new(k as f64, 1., 0.));
        }
        let pairs = doc.landmark_pairs();
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0].src.x, 0.);
        assert_eq!(pairs[1].src.x, 3.);
        assert_eq!(pairs[2].src.x, 7.);
    }

    #[test]
    fn test_place_landmark_allocates_across_both_sides() {
        let mut doc = Document::<f64>::default();
        let a = doc.place_landmark(DocumentSide::Source, Point3::origin());
        let b = doc.place_landmark(DocumentSide::Destination, Point3::origin());
        let c = doc.place_landmark(DocumentSide::Source, Point3::origin());
        assert_eq!((a, b, c), (0, 1, 2));
    }

    #[test]
    fn test_remove_landmark_pair_clears_both_sides() {
        let mut doc = Document::<f64>::default();
        doc.set_landmark(DocumentSide::Source, 0, Point3::origin());
        doc.set_landmark(DocumentSide::Destination, 0, Point3::new(1., 0., 0.));
        doc.remove_landmark_pair(0);
        assert!(doc.source().landmarks().is_empty());
        assert!(doc.destination().landmarks().is_empty());
        assert!(doc.landmark_pairs().is_empty());
    }

    #[test]
    fn test_set_blend_clamps() {
        let mut doc = Document::<f64>::default();
        doc.set_blend(1.5);
        assert_eq!(doc.blend(), 1.0);
        doc.set_blend(-0.5);
        assert_eq!(doc.blend(), 0.0);
        doc.set_blend(0.25);
        assert_eq!(doc.blend(), 0.25);
    }

    #[test]
    fn test_dragging_a_landmark_mutates_in_place() {
        let mut doc = Document::<f64>::default();
        doc.set_landmark(DocumentSide::Source, 0, Point3::origin());
        doc.set_landmark(DocumentSide::Source, 0, Point3::new(0.5, 0., 0.));
        assert_eq!(doc.source().landmarks().len(), 1);
        assert_eq!(
            doc.source().landmark(0),
            Some(&Point3::new(0.5, 0., 0.))
        );
    }
}
