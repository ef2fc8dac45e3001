use log::debug;

use crate::document::Document;
use crate::landmark::LandmarkPair;
use crate::mesh::TriangleMesh;
use crate::misc::FloatingPoint;
use crate::tps::{solve, TpsCoefficients};

/// Counters for cache activity, mostly useful in tests and perf panels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Total `lookup` calls.
    pub lookups: usize,
    /// How many lookups re-ran the solver.
    pub solves: usize,
    /// How many lookups re-warped the source mesh.
    pub warps: usize,
}

/// Incrementally recomputes the warped source mesh from a document.
///
/// The cache tracks a dependency chain of four values — pair list (with
/// blend), coefficient bundle, source mesh, warped mesh — and recomputes a
/// stage only when the value of its inputs actually changed. Comparisons
/// are by value, not identity, so returning to a previously seen blend is
/// allowed to hit.
///
/// # Examples
/// ```
/// use nalgebra::Point3;
/// use warpo::prelude::{Document, ResultCache, TriangleMesh};
///
/// let mesh = TriangleMesh::try_new(
///     vec![Point3::new(0., 0., 0.), Point3::new(1., 0., 0.), Point3::new(0., 1., 0.)],
///     vec![[0, 1, 2]],
/// )
/// .unwrap();
/// let doc = Document::new(mesh.clone(), mesh.clone());
///
/// let mut cache = ResultCache::new();
/// // No landmarks: the warp is the identity.
/// assert_eq!(cache.lookup(&doc).vertices(), mesh.vertices());
/// cache.lookup(&doc);
/// assert_eq!(cache.stats().solves, 1);
/// ```
#[derive(Debug)]
pub struct ResultCache<T: FloatingPoint> {
    inputs: Option<(Vec<LandmarkPair<T>>, T)>,
    coefficients: TpsCoefficients<T>,
    source_mesh: Option<TriangleMesh<T>>,
    warped: Option<TriangleMesh<T>>,
    stats: CacheStats,
}

impl<T: FloatingPoint> ResultCache<T> {
    pub fn new() -> Self {
        Self {
            inputs: None,
            coefficients: TpsCoefficients::identity(),
            source_mesh: None,
            warped: None,
            stats: CacheStats::default(),
        }
    }

    /// Return the warped source mesh for the current document state,
    /// recomputing only the stages whose inputs changed since the last
    /// lookup.
    pub fn lookup(&mut self, document: &Document<T>) -> &TriangleMesh<T> {
        self.stats.lookups += 1;

        let pairs = document.landmark_pairs();
        let blend = document.blend();

        let inputs_changed = !matches!(
            &self.inputs,
            Some((cached_pairs, cached_blend))
                if *cached_pairs == pairs && *cached_blend == blend
        );

        let mut coefficients_changed = false;
        if inputs_changed {
            debug!(
                "tps inputs changed ({} pairs, blend {:?}), re-solving",
                pairs.len(),
                blend.to_f64()
            );
            let coefficients = solve(&pairs, blend);
            self.stats.solves += 1;
            coefficients_changed = coefficients != self.coefficients;
            self.coefficients = coefficients;
            self.inputs = Some((pairs, blend));
        }

        let source = document.source().mesh();
        let mesh_changed = self.source_mesh.as_ref() != Some(source);
        if mesh_changed {
            self.source_mesh = Some(source.clone());
        }

        if coefficients_changed || mesh_changed || self.warped.is_none() {
            debug!(
                "re-warping {} vertices (coefficients changed: {}, mesh changed: {})",
                source.vertex_count(),
                coefficients_changed,
                mesh_changed
            );
            let coefficients = &self.coefficients;
            let warped = source.with_transformed_vertices(|p| coefficients.evaluate(p));
            self.stats.warps += 1;
            self.warped = Some(warped);
        }

        // The branch above always populates the cache on the first lookup,
        // so the fallback closure never runs.
        self.warped.get_or_insert_with(|| source.clone())
    }

    /// The coefficient bundle from the most recent lookup.
    pub fn coefficients(&self) -> &TpsCoefficients<T> {
        &self.coefficients
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Drop all cached values; the next lookup recomputes everything.
    pub fn invalidate(&mut self) {
        self.inputs = None;
        self.coefficients = TpsCoefficients::identity();
        self.source_mesh = None;
        self.warped = None;
    }
}

impl<T: FloatingPoint> Default for ResultCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentSide;
    use nalgebra::Point3;

    fn quad_mesh() -> TriangleMesh<f64> {
        TriangleMesh::try_new(
            vec![
                Point3::new(0., 0., 0.),
                Point3::new(1., 0., 0.),
                Point3::new(1., 1., 0.),
                Point3::new(0., 1., 0.),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        )
        .unwrap()
    }

    fn document_with_landmarks() -> Document<f64> {
        let mut doc = Document::new(quad_mesh(), quad_mesh());
        for (k, (src, dst)) in [
            (Point3::new(0., 0., 0.), Point3::new(0., 0., 0.5)),
            (Point3::new(1., 0., 0.), Point3::new(1., 0., 0.)),
            (Point3::new(1., 1., 0.), Point3::new(1., 1., 0.)),
            (Point3::new(0., 1., 0.), Point3::new(0., 1., 0.)),
        ]
        .into_iter()
        .enumerate()
        {
            doc.set_landmark(DocumentSide::Source, k, src);
            doc.set_landmark(DocumentSide::Destination, k, dst);
        }
        doc.set_blend(0.5);
        doc
    }

    #[test]
    fn test_repeated_lookup_solves_once() {
        let doc = document_with_landmarks();
        let mut cache = ResultCache::new();
        let first = cache.lookup(&doc).clone();
        let second = cache.lookup(&doc).clone();
        assert_eq!(first, second);
        assert_eq!(cache.stats().solves, 1);
        assert_eq!(cache.stats().warps, 1);
        assert_eq!(cache.stats().lookups, 2);
    }

    #[test]
    fn test_blend_change_invalidates() {
        let mut doc = document_with_landmarks();
        let mut cache = ResultCache::new();
        cache.lookup(&doc);
        doc.set_blend(0.6);
        cache.lookup(&doc);
        assert_eq!(cache.stats().solves, 2);
        assert_eq!(cache.stats().warps, 2);
    }

    #[test]
    fn test_unpaired_landmark_edit_skips_resolve() {
        let mut doc = document_with_landmarks();
        let mut cache = ResultCache::new();
        cache.lookup(&doc);
        // A landmark with no counterpart never reaches the solver.
        doc.set_landmark(DocumentSide::Source, 99, Point3::new(0.5, 0.5, 0.));
        cache.lookup(&doc);
        assert_eq!(cache.stats().solves, 1);
        assert_eq!(cache.stats().warps, 1);
    }

    #[test]
    fn test_mesh_swap_rewarps_without_resolve() {
        let mut doc = document_with_landmarks();
        let mut cache = ResultCache::new();
        cache.lookup(&doc);

        let shifted = quad_mesh().with_transformed_vertices(|v| v * 2.);
        doc.input_mut(DocumentSide::Source).set_mesh(shifted);
        cache.lookup(&doc);
        assert_eq!(cache.stats().solves, 1);
        assert_eq!(cache.stats().warps, 2);
    }

    #[test]
    fn test_landmark_drag_resolves_and_rewarps() {
        let mut doc = document_with_landmarks();
        let mut cache = ResultCache::new();
        cache.lookup(&doc);
        doc.set_landmark(DocumentSide::Destination, 0, Point3::new(0., 0., 1.));
        cache.lookup(&doc);
        assert_eq!(cache.stats().solves, 2);
        assert_eq!(cache.stats().warps, 2);
    }

    #[test]
    fn test_empty_pairs_yield_source_vertices() {
        let doc = Document::new(quad_mesh(), quad_mesh());
        let mut cache = ResultCache::new();
        let warped = cache.lookup(&doc);
        assert_eq!(warped.vertices(), doc.source().mesh().vertices());
    }

    #[test]
    fn test_invalidate_forces_recompute() {
        let doc = document_with_landmarks();
        let mut cache = ResultCache::new();
        cache.lookup(&doc);
        cache.invalidate();
        cache.lookup(&doc);
        assert_eq!(cache.stats().solves, 2);
        assert_eq!(cache.stats().warps, 2);
    }
}
