use crate::cache::ResultCache;
use crate::document::Document;
use crate::mesh::TriangleMesh;
use crate::misc::FloatingPoint;
use crate::store::{CommitId, StoreOptions, UndoRedoStore};

/// Ties the undo/redo store and the result cache together for an
/// interactive driver: mutate the scratch document, commit at gesture
/// boundaries, and pull the warped mesh once per frame.
///
/// # Examples
/// ```
/// use nalgebra::Point3;
/// use warpo::prelude::{Document, DocumentSide, TriangleMesh, WarpSession};
///
/// let mesh = TriangleMesh::try_new(
///     vec![Point3::new(0., 0., 0.), Point3::new(1., 0., 0.), Point3::new(0., 1., 0.)],
///     vec![[0, 1, 2]],
/// )
/// .unwrap();
/// let mut session = WarpSession::new(Document::new(mesh.clone(), mesh));
///
/// let k = session.document_mut().place_landmark(DocumentSide::Source, Point3::origin());
/// session
///     .document_mut()
///     .set_landmark(DocumentSide::Destination, k, Point3::new(0., 0., 1.));
/// session.commit("placed landmark pair");
///
/// let warped = session.warped_mesh().clone();
/// assert_eq!(warped.vertex_count(), 3);
/// session.undo();
/// assert!(session.document().landmark_pairs().is_empty());
/// ```
#[derive(Debug)]
pub struct WarpSession<T: FloatingPoint> {
    store: UndoRedoStore<Document<T>>,
    cache: ResultCache<T>,
}

impl<T: FloatingPoint> WarpSession<T> {
    pub fn new(document: Document<T>) -> Self {
        Self {
            store: UndoRedoStore::new(document),
            cache: ResultCache::new(),
        }
    }

    pub fn with_store_options(document: Document<T>, options: StoreOptions) -> Self {
        Self {
            store: UndoRedoStore::with_options(document, options),
            cache: ResultCache::new(),
        }
    }

    /// The scratch document.
    pub fn document(&self) -> &Document<T> {
        self.store.scratch()
    }

    /// Mutable access to the scratch document. Changes are untracked until
    /// [`commit`](Self::commit).
    pub fn document_mut(&mut self) -> &mut Document<T> {
        self.store.scratch_mut()
    }

    /// The warped source mesh for the current scratch state, recomputed
    /// only where inputs changed.
    pub fn warped_mesh(&mut self) -> &TriangleMesh<T> {
        self.cache.lookup(self.store.scratch())
    }

    pub fn commit(&mut self, message: impl Into<String>) -> CommitId {
        self.store.commit_scratch(message)
    }

    pub fn undo(&mut self) {
        self.store.undo();
    }

    pub fn redo(&mut self) {
        self.store.redo();
    }

    pub fn can_undo(&self) -> bool {
        self.store.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.store.can_redo()
    }

    /// The underlying history store, for presentation and history jumps.
    pub fn store(&self) -> &UndoRedoStore<Document<T>> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut UndoRedoStore<Document<T>> {
        &mut self.store
    }

    /// Cache activity counters.
    pub fn cache_stats(&self) -> &crate::cache::CacheStats {
        self.cache.stats()
    }
}
