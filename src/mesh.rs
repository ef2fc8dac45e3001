use std::hash::{Hash, Hasher};
use std::sync::Arc;

use nalgebra::Point3;
use rayon::prelude::*;

use crate::bounding_box::BoundingBox;
use crate::error::{WarpError, WarpResult};
use crate::misc::{FloatingPoint, PARALLEL_THRESHOLD};

/// An immutable triangular mesh: vertex positions, triangle faces and
/// axis-aligned bounds.
///
/// Meshes have value semantics. Two meshes compare equal iff their vertex
/// and face sequences are elementwise equal; a content hash computed at
/// construction short-circuits most unequal comparisons. Faces are stored
/// behind an [`Arc`] so that clones and vertex-transformed copies share
/// index storage.
#[derive(Clone, Debug)]
pub struct TriangleMesh<T: FloatingPoint> {
    vertices: Vec<Point3<T>>,
    faces: Arc<Vec<[usize; 3]>>,
    bounds: BoundingBox<T>,
    content_hash: u64,
}

impl<T: FloatingPoint> TriangleMesh<T> {
    /// Create a mesh from vertices and triangle faces.
    ///
    /// # Errors
    ///
    /// Returns [`WarpError::InvalidMeshData`] if a face references a vertex
    /// index out of range.
    ///
    /// # Examples
    /// ```
    /// use nalgebra::Point3;
    /// use warpo::prelude::TriangleMesh;
    ///
    /// let mesh = TriangleMesh::try_new(
    ///     vec![
    ///         Point3::new(0., 0., 0.),
    ///         Point3::new(1., 0., 0.),
    ///         Point3::new(0., 1., 0.),
    ///     ],
    ///     vec![[0, 1, 2]],
    /// )
    /// .unwrap();
    /// assert_eq!(mesh.vertex_count(), 3);
    /// assert_eq!(mesh.face_count(), 1);
    ///
    /// assert!(TriangleMesh::try_new(vec![Point3::<f64>::origin()], vec![[0, 0, 1]]).is_err());
    /// ```
    pub fn try_new(vertices: Vec<Point3<T>>, faces: Vec<[usize; 3]>) -> WarpResult<Self> {
        for face in &faces {
            for &index in face {
                if index >= vertices.len() {
                    return Err(WarpError::InvalidMeshData {
                        reason: format!(
                            "face index {} out of range ({} vertices)",
                            index,
                            vertices.len()
                        ),
                    });
                }
            }
        }
        Ok(Self::from_parts(vertices, Arc::new(faces)))
    }

    /// Create a mesh from vertices and a flat index sequence.
    ///
    /// # Errors
    ///
    /// Returns [`WarpError::InvalidMeshData`] if the index count is not a
    /// multiple of 3, or an index is out of range.
    pub fn try_from_flat_indices(
        vertices: Vec<Point3<T>>,
        indices: Vec<usize>,
    ) -> WarpResult<Self> {
        if indices.len() % 3 != 0 {
            return Err(WarpError::InvalidMeshData {
                reason: format!("index count {} is not a multiple of 3", indices.len()),
            });
        }
        let faces = indices
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();
        Self::try_new(vertices, faces)
    }

    /// An empty mesh with no vertices and no faces.
    pub fn empty() -> Self {
        Self::from_parts(vec![], Arc::new(vec![]))
    }

    fn from_parts(vertices: Vec<Point3<T>>, faces: Arc<Vec<[usize; 3]>>) -> Self {
        let bounds = BoundingBox::new_with_points(vertices.iter().copied());
        let content_hash = content_hash(&vertices, &faces);
        Self {
            vertices,
            faces,
            bounds,
            content_hash,
        }
    }

    pub fn vertices(&self) -> &[Point3<T>] {
        &self.vertices
    }

    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    /// Vertex indices flattened into triangle order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.faces.iter().flatten().copied()
    }

    /// Axis-aligned bounds over the vertices.
    pub fn bounds(&self) -> &BoundingBox<T> {
        &self.bounds
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The corner positions of each face.
    pub fn triangles(&self) -> impl Iterator<Item = [Point3<T>; 3]> + '_ {
        self.faces
            .iter()
            .map(|[a, b, c]| [self.vertices[*a], self.vertices[*b], self.vertices[*c]])
    }

    /// Create a new mesh by applying `f` independently to each vertex.
    ///
    /// The returned mesh shares face storage with the original and has its
    /// bounds recomputed. `f` must be pure with respect to its input vertex;
    /// large meshes are transformed in parallel.
    ///
    /// # Examples
    /// ```
    /// use nalgebra::{Point3, Vector3};
    /// use warpo::prelude::TriangleMesh;
    ///
    /// let mesh = TriangleMesh::try_new(
    ///     vec![Point3::new(0., 0., 0.), Point3::new(1., 0., 0.), Point3::new(0., 1., 0.)],
    ///     vec![[0, 1, 2]],
    /// )
    /// .unwrap();
    /// let shifted = mesh.with_transformed_vertices(|v| v + Vector3::new(0., 0., 1.));
    /// assert_eq!(shifted.vertices()[0], Point3::new(0., 0., 1.));
    /// assert_eq!(shifted.faces(), mesh.faces());
    /// ```
    pub fn with_transformed_vertices<F>(&self, f: F) -> Self
    where
        F: Fn(&Point3<T>) -> Point3<T> + Sync,
    {
        let vertices: Vec<_> = if self.vertices.len() >= PARALLEL_THRESHOLD {
            self.vertices.par_iter().map(&f).collect()
        } else {
            self.vertices.iter().map(&f).collect()
        };
        Self::from_parts(vertices, Arc::clone(&self.faces))
    }
}

impl<T: FloatingPoint> PartialEq for TriangleMesh<T> {
    fn eq(&self, other: &Self) -> bool {
        self.content_hash == other.content_hash
            && self.vertices == other.vertices
            && self.faces == other.faces
    }
}

/// Hash the vertex coordinates and face indices.
///
/// Coordinates are hashed by their f64 bit patterns with negative zero
/// normalized, so elementwise-equal meshes never hash differently.
fn content_hash<T: FloatingPoint>(vertices: &[Point3<T>], faces: &[[usize; 3]]) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    for v in vertices {
        for i in 0..3 {
            let c = v[i].to_f64().unwrap_or(f64::NAN);
            let bits = if c == 0.0 { 0 } else { c.to_bits() };
            bits.hash(&mut hasher);
        }
    }
    faces.hash(&mut hasher);
    hasher.finish()
}
