//! Flat-buffer triangle mesh.

use crate::Aabb;
use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A triangle mesh stored as flat attribute buffers.
///
/// This is the primary mesh type for meshview. Positions, normals and
/// (optionally) colors are interleaved per vertex as `[x, y, z]` triples in
/// flat `f32` buffers, and faces are `u32` index triples into those buffers.
/// The layout matches what the renderer uploads verbatim.
///
/// The buffers are exclusively owned by the mesh and only mutated through
/// [`Mesh::clear`] and the loader, which builds a complete replacement via
/// [`Mesh::from_parts`]. A dropped or cleared mesh releases its buffers; no
/// manual bookkeeping is involved.
///
/// # Invariants
///
/// - `positions.len() == 3 * vertex_count`, likewise `normals` and (when
///   present) `colors`.
/// - `indices.len() == 3 * face_count`, every index `< vertex_count`.
/// - `bounds` is the tight per-axis min/max over all vertex positions, or
///   [`Aabb::empty`] for a mesh without vertices.
///
/// # Example
///
/// ```
/// use meshview_types::Mesh;
///
/// let mut mesh = Mesh::new();
/// assert!(mesh.is_empty());
/// assert!(mesh.bounds().is_empty());
///
/// mesh.clear(); // idempotent on an already-empty mesh
/// assert_eq!(mesh.vertex_count(), 0);
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Mesh {
    /// Vertex positions, three `f32` per vertex.
    positions: Vec<f32>,

    /// Unit vertex normals, three `f32` per vertex. Read from the file or
    /// synthesized from face geometry, depending on the import mode.
    normals: Vec<f32>,

    /// Vertex colors in `[0, 1]`, three `f32` per vertex. Present only when
    /// the file carried color attributes.
    colors: Option<Vec<f32>>,

    /// Triangle faces, three indices per face.
    indices: Vec<u32>,

    /// Tight axis-aligned bounding box over all vertex positions.
    bounds: Aabb,
}

impl Mesh {
    /// Create a new empty mesh.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            colors: None,
            indices: Vec::new(),
            bounds: Aabb::empty(),
        }
    }

    /// Assemble a mesh from complete attribute buffers.
    ///
    /// This is the constructor the loader uses once a file has been fully
    /// parsed and validated. Callers must uphold the invariants documented
    /// on [`Mesh`]: matching buffer lengths and in-range indices. Lengths
    /// are checked in debug builds.
    #[must_use]
    pub fn from_parts(
        positions: Vec<f32>,
        normals: Vec<f32>,
        colors: Option<Vec<f32>>,
        indices: Vec<u32>,
        bounds: Aabb,
    ) -> Self {
        debug_assert_eq!(positions.len() % 3, 0);
        debug_assert_eq!(normals.len(), positions.len());
        debug_assert!(colors.as_ref().is_none_or(|c| c.len() == positions.len()));
        debug_assert_eq!(indices.len() % 3, 0);

        Self {
            positions,
            normals,
            colors,
            indices,
            bounds,
        }
    }

    /// Get the number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get the number of faces (triangles).
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if the mesh has no vertices or no faces.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.indices.is_empty()
    }

    /// The flat position buffer, `3 * vertex_count` floats.
    #[inline]
    #[must_use]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// The flat normal buffer, `3 * vertex_count` floats.
    #[inline]
    #[must_use]
    pub fn normals(&self) -> &[f32] {
        &self.normals
    }

    /// The flat color buffer, if the mesh was loaded with colors.
    #[inline]
    #[must_use]
    pub fn colors(&self) -> Option<&[f32]> {
        self.colors.as_deref()
    }

    /// The flat triangle index buffer, `3 * face_count` indices.
    #[inline]
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// The axis-aligned bounding box over all vertex positions.
    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// The minimum corner of the bounding box.
    #[inline]
    #[must_use]
    pub const fn min_bounds(&self) -> Point3<f32> {
        self.bounds.min
    }

    /// The maximum corner of the bounding box.
    #[inline]
    #[must_use]
    pub const fn max_bounds(&self) -> Point3<f32> {
        self.bounds.max
    }

    /// Get a vertex position by index.
    ///
    /// Returns `None` if the index is out of bounds.
    #[must_use]
    pub fn position(&self, index: usize) -> Option<Point3<f32>> {
        self.positions
            .get(3 * index..3 * index + 3)
            .map(|p| Point3::new(p[0], p[1], p[2]))
    }

    /// Get a vertex normal by index.
    ///
    /// Returns `None` if the index is out of bounds.
    #[must_use]
    pub fn normal(&self, index: usize) -> Option<Vector3<f32>> {
        self.normals
            .get(3 * index..3 * index + 3)
            .map(|n| Vector3::new(n[0], n[1], n[2]))
    }

    /// Get a face by index as a vertex index triple.
    ///
    /// Returns `None` if the face index is out of bounds.
    #[must_use]
    pub fn face(&self, index: usize) -> Option<[u32; 3]> {
        self.indices
            .get(3 * index..3 * index + 3)
            .map(|f| [f[0], f[1], f[2]])
    }

    /// Release all buffers and reset the bounding box.
    ///
    /// Idempotent; safe to call on an already-empty mesh. Every load entry
    /// point clears its destination first, so a failed load leaves the mesh
    /// in this state rather than partially populated.
    pub fn clear(&mut self) {
        self.positions = Vec::new();
        self.normals = Vec::new();
        self.colors = None;
        self.indices = Vec::new();
        self.bounds = Aabb::empty();
    }
}
