//! # Mesh Data Structure
//!
//! Triangle mesh handed to the renderer/exporter: a vertex array (array
//! index is the vertex id) and a list of index triples. Faces follow the
//! right-hand rule relative to the outward normal.
//!
//! Builders assemble the raw buffers themselves and wrap them with
//! [`Mesh::from_parts`]; the mesh only answers questions about the solid
//! (extent, volume, closure) and flattens itself for export.

use std::collections::HashMap;

use config::constants::VERTEX_MERGE_EPSILON;
use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::ops::cleanup::is_sliver;

/// An indexed triangle mesh.
///
/// Coordinates stay `f64` throughout the kernel; `f32` only appears in the
/// flat export buffers.
///
/// # Example
///
/// ```rust
/// use solid_kernel::Mesh;
/// use glam::DVec3;
///
/// let mesh = Mesh::from_parts(
///     vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z],
///     vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]],
/// );
/// assert!(mesh.is_closed_manifold());
/// assert!(mesh.signed_volume() > 0.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    vertices: Vec<DVec3>,
    triangles: Vec<[u32; 3]>,
}

impl Mesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps vertex and triangle buffers built elsewhere.
    pub fn from_parts(vertices: Vec<DVec3>, triangles: Vec<[u32; 3]>) -> Self {
        Self {
            vertices,
            triangles,
        }
    }

    /// Splits the mesh into its vertex and triangle buffers.
    pub fn into_parts(self) -> (Vec<DVec3>, Vec<[u32; 3]>) {
        (self.vertices, self.triangles)
    }

    /// Number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// True for a mesh with no triangles, such as the result of meshing
    /// blank text.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Vertex positions; the slice index is the vertex id.
    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Faces as vertex id triples.
    #[inline]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Axis-aligned `(min, max)` corners. An empty mesh reports the origin.
    pub fn bounding_box(&self) -> (DVec3, DVec3) {
        let Some((first, rest)) = self.vertices.split_first() else {
            return (DVec3::ZERO, DVec3::ZERO);
        };

        rest.iter()
            .fold((*first, *first), |(min, max), v| (min.min(*v), max.max(*v)))
    }

    /// Appends the disjoint solid `other`, shifting its vertex ids past ours.
    pub fn merge(&mut self, other: &Mesh) {
        let offset = self.vertices.len() as u32;

        self.vertices.extend_from_slice(&other.vertices);
        self.triangles.extend(
            other
                .triangles
                .iter()
                .map(|tri| tri.map(|i| i + offset)),
        );
    }

    fn corners(&self, tri: &[u32; 3]) -> [DVec3; 3] {
        tri.map(|i| self.vertices[i as usize])
    }

    /// Signed volume enclosed by the mesh.
    ///
    /// Positive when faces wind outward (right-hand rule).
    pub fn signed_volume(&self) -> f64 {
        self.triangles
            .iter()
            .map(|tri| {
                let [v0, v1, v2] = self.corners(tri);
                v0.dot(v1.cross(v2))
            })
            .sum::<f64>()
            / 6.0
    }

    /// Total area of all faces.
    pub fn surface_area(&self) -> f64 {
        self.triangles
            .iter()
            .map(|tri| {
                let [v0, v1, v2] = self.corners(tri);
                (v1 - v0).cross(v2 - v0).length() * 0.5
            })
            .sum()
    }

    /// How often each directed edge `(from, to)` is traversed by a face.
    fn directed_edges(&self) -> HashMap<(u32, u32), u32> {
        let mut edges = HashMap::with_capacity(self.triangles.len() * 3);
        for tri in &self.triangles {
            for k in 0..3 {
                *edges.entry((tri[k], tri[(k + 1) % 3])).or_insert(0) += 1;
            }
        }
        edges
    }

    /// Directed edges that no face traverses in the opposite direction.
    ///
    /// Empty for a watertight solid; otherwise these are the rims of the
    /// holes, sorted for stable reporting.
    pub fn boundary_edges(&self) -> Vec<(u32, u32)> {
        let edges = self.directed_edges();
        let mut open: Vec<(u32, u32)> = edges
            .keys()
            .filter(|&&(a, b)| !edges.contains_key(&(b, a)))
            .copied()
            .collect();
        open.sort_unstable();
        open
    }

    /// Returns true if every edge is shared by exactly two faces that
    /// traverse it in opposite directions.
    pub fn is_closed_manifold(&self) -> bool {
        if self.triangles.is_empty() {
            return false;
        }

        let edges = self.directed_edges();
        edges
            .iter()
            .all(|(&(a, b), &count)| count == 1 && edges.get(&(b, a)) == Some(&1))
    }

    /// Checks that every index is in range and no face is degenerate.
    ///
    /// A face is degenerate when it repeats a vertex id or is a sliver under
    /// the cleanup pass's altitude rule.
    pub fn validate(&self) -> bool {
        let vertex_count = self.vertices.len() as u32;

        self.triangles.iter().all(|tri| {
            if tri.iter().any(|&i| i >= vertex_count) {
                return false;
            }
            if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
                return false;
            }
            let [v0, v1, v2] = self.corners(tri);
            !is_sliver(v0, v1, v2, VERTEX_MERGE_EPSILON)
        })
    }

    /// Flat `[x, y, z, ...]` positions for a GPU buffer.
    pub fn vertices_f32(&self) -> Vec<f32> {
        self.vertices
            .iter()
            .flat_map(|v| [v.x as f32, v.y as f32, v.z as f32])
            .collect()
    }

    /// Flat index buffer, three ids per face.
    pub fn indices_u32(&self) -> Vec<u32> {
        self.triangles.iter().flatten().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tetrahedron() -> Mesh {
        Mesh::from_parts(
            vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z],
            vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]],
        )
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = Mesh::new();
        assert!(mesh.is_empty());
        assert!(!mesh.is_closed_manifold());
        assert_eq!(mesh.bounding_box(), (DVec3::ZERO, DVec3::ZERO));
    }

    #[test]
    fn test_bounding_box_spans_vertices() {
        let mesh = Mesh::from_parts(
            vec![DVec3::new(-1.0, -2.0, -3.0), DVec3::new(4.0, 5.0, 6.0)],
            vec![],
        );
        let (min, max) = mesh.bounding_box();
        assert_eq!(min, DVec3::new(-1.0, -2.0, -3.0));
        assert_eq!(max, DVec3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_tetrahedron_is_closed_with_positive_volume() {
        let mesh = tetrahedron();
        assert!(mesh.is_closed_manifold());
        assert!(mesh.boundary_edges().is_empty());
        assert!(mesh.validate());
        assert_relative_eq!(mesh.signed_volume(), 1.0 / 6.0, epsilon = 1e-12);
        assert_relative_eq!(
            mesh.surface_area(),
            1.5 + 3f64.sqrt() / 2.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_missing_face_leaves_its_rim_open() {
        let (vertices, mut triangles) = tetrahedron().into_parts();
        triangles.pop();
        let mesh = Mesh::from_parts(vertices, triangles);
        assert!(!mesh.is_closed_manifold());
        // The dropped face [2, 0, 3] leaves its three reversed edges open.
        assert_eq!(mesh.boundary_edges(), vec![(0, 2), (2, 3), (3, 0)]);
    }

    #[test]
    fn test_doubled_face_is_not_manifold() {
        let (vertices, mut triangles) = tetrahedron().into_parts();
        triangles.push(triangles[0]);
        let mesh = Mesh::from_parts(vertices, triangles);
        assert!(mesh.boundary_edges().is_empty());
        assert!(!mesh.is_closed_manifold());
    }

    #[test]
    fn test_validate_rejects_bad_faces() {
        let out_of_range = Mesh::from_parts(vec![DVec3::ZERO], vec![[0, 1, 2]]);
        assert!(!out_of_range.validate());

        let repeated = Mesh::from_parts(vec![DVec3::ZERO, DVec3::X], vec![[0, 1, 1]]);
        assert!(!repeated.validate());

        let needle = Mesh::from_parts(
            vec![DVec3::ZERO, DVec3::X, DVec3::new(0.5, 1e-12, 0.0)],
            vec![[0, 1, 2]],
        );
        assert!(!needle.validate());
    }

    #[test]
    fn test_validate_accepts_small_faces() {
        let small = Mesh::from_parts(
            vec![DVec3::ZERO, DVec3::new(1e-4, 0.0, 0.0), DVec3::new(0.0, 5e-5, 0.0)],
            vec![[0, 1, 2]],
        );
        assert!(small.validate());
    }

    #[test]
    fn test_merge_offsets_indices() {
        let mut a = tetrahedron();
        a.merge(&tetrahedron());
        assert_eq!(a.vertex_count(), 8);
        assert_eq!(a.triangle_count(), 8);
        assert_eq!(a.triangles()[4], [4, 6, 5]);
        assert!(a.is_closed_manifold());
        assert_relative_eq!(a.signed_volume(), 2.0 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_flat_exports() {
        let mesh = tetrahedron();
        assert_eq!(mesh.vertices_f32().len(), 12);
        assert_eq!(&mesh.indices_u32()[..3], &[0, 2, 1]);
    }
}
