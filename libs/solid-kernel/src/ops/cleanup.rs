//! # Mesh Cleanup
//!
//! Final pass applied to every builder's output:
//!
//! 1. **Weld**: vertices closer than `epsilon` collapse onto the first one
//!    seen (spatial hash, neighbouring cells checked).
//! 2. **Degenerate faces**: faces with a repeated vertex id, or whose
//!    smallest altitude is below `epsilon`, are dropped. The altitude is a
//!    length, so it compares against the same `epsilon` as the weld.
//! 3. **Unreferenced vertices**: vertices no face uses are removed and the
//!    remaining ids compacted, preserving order.

use std::collections::HashMap;

use glam::DVec3;
use serde::Serialize;

use crate::mesh::Mesh;

/// What one cleanup pass removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    /// Vertices merged into an earlier vertex.
    pub welded_vertices: usize,
    /// Faces dropped as degenerate.
    pub degenerate_faces: usize,
    /// Vertices dropped because no face referenced them.
    pub unreferenced_vertices: usize,
}

impl CleanupReport {
    /// Returns true if the pass changed nothing.
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

/// Runs weld, degenerate-face removal and unreferenced-vertex removal.
///
/// # Example
///
/// ```rust
/// use glam::DVec3;
/// use solid_kernel::ops::cleanup;
/// use solid_kernel::Mesh;
///
/// let mesh = Mesh::from_parts(
///     vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z],
///     vec![[0, 1, 2]],
/// );
/// let (mesh, report) = cleanup(mesh, 1e-8);
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(report.unreferenced_vertices, 1);
/// ```
pub fn cleanup(mesh: Mesh, epsilon: f64) -> (Mesh, CleanupReport) {
    let (vertices, triangles) = mesh.into_parts();

    let (vertices, triangles, welded_vertices) = weld_vertices(vertices, triangles, epsilon);
    let (triangles, degenerate_faces) = remove_degenerate_faces(&vertices, triangles, epsilon);
    let (vertices, triangles, unreferenced_vertices) =
        remove_unreferenced_vertices(vertices, triangles);

    let report = CleanupReport {
        welded_vertices,
        degenerate_faces,
        unreferenced_vertices,
    };
    (Mesh::from_parts(vertices, triangles), report)
}

type CellKey = (i64, i64, i64);

fn cell_of(p: DVec3, cell: f64) -> CellKey {
    (
        (p.x / cell).floor() as i64,
        (p.y / cell).floor() as i64,
        (p.z / cell).floor() as i64,
    )
}

/// Merges vertices within `epsilon` of an earlier vertex.
///
/// Returns the surviving vertices, remapped faces and the merge count.
/// Vertex order of the survivors is preserved.
pub fn weld_vertices(
    vertices: Vec<DVec3>,
    triangles: Vec<[u32; 3]>,
    epsilon: f64,
) -> (Vec<DVec3>, Vec<[u32; 3]>, usize) {
    let mut grid: HashMap<CellKey, Vec<u32>> = HashMap::new();
    let mut kept: Vec<DVec3> = Vec::with_capacity(vertices.len());
    let mut remap: Vec<u32> = Vec::with_capacity(vertices.len());

    for v in &vertices {
        let (cx, cy, cz) = cell_of(*v, epsilon);
        let mut found = None;
        'search: for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(bucket) = grid.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    if let Some(&id) = bucket
                        .iter()
                        .find(|&&id| kept[id as usize].distance(*v) <= epsilon)
                    {
                        found = Some(id);
                        break 'search;
                    }
                }
            }
        }

        let id = match found {
            Some(id) => id,
            None => {
                let id = kept.len() as u32;
                kept.push(*v);
                grid.entry((cx, cy, cz)).or_default().push(id);
                id
            }
        };
        remap.push(id);
    }

    let merged = vertices.len() - kept.len();
    let triangles = triangles
        .into_iter()
        .map(|[a, b, c]| [remap[a as usize], remap[b as usize], remap[c as usize]])
        .collect();
    (kept, triangles, merged)
}

/// Returns true if the triangle's smallest altitude is below `epsilon`.
///
/// Twice the area divided by the longest edge is the altitude onto that
/// edge, the smallest of the three.
pub(crate) fn is_sliver(p0: DVec3, p1: DVec3, p2: DVec3, epsilon: f64) -> bool {
    let longest = (p1 - p0)
        .length()
        .max((p2 - p1).length())
        .max((p0 - p2).length());
    if longest <= epsilon {
        return true;
    }
    (p1 - p0).cross(p2 - p0).length() / longest < epsilon
}

/// Drops faces with repeated ids or an altitude below `epsilon`.
pub fn remove_degenerate_faces(
    vertices: &[DVec3],
    triangles: Vec<[u32; 3]>,
    epsilon: f64,
) -> (Vec<[u32; 3]>, usize) {
    let before = triangles.len();
    let kept: Vec<[u32; 3]> = triangles
        .into_iter()
        .filter(|&[a, b, c]| {
            if a == b || b == c || a == c {
                return false;
            }
            !is_sliver(
                vertices[a as usize],
                vertices[b as usize],
                vertices[c as usize],
                epsilon,
            )
        })
        .collect();
    let removed = before - kept.len();
    (kept, removed)
}

/// Removes vertices no face references and compacts ids.
pub fn remove_unreferenced_vertices(
    vertices: Vec<DVec3>,
    triangles: Vec<[u32; 3]>,
) -> (Vec<DVec3>, Vec<[u32; 3]>, usize) {
    let mut used = vec![false; vertices.len()];
    for tri in &triangles {
        for &i in tri {
            used[i as usize] = true;
        }
    }

    let mut remap = vec![u32::MAX; vertices.len()];
    let mut kept = Vec::with_capacity(vertices.len());
    for (i, v) in vertices.iter().enumerate() {
        if used[i] {
            remap[i] = kept.len() as u32;
            kept.push(*v);
        }
    }

    let removed = vertices.len() - kept.len();
    let triangles = triangles
        .into_iter()
        .map(|[a, b, c]| [remap[a as usize], remap[b as usize], remap[c as usize]])
        .collect();
    (kept, triangles, removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-8;

    #[test]
    fn test_weld_merges_close_vertices() {
        let vertices = vec![DVec3::ZERO, DVec3::X, DVec3::new(1e-10, 0.0, 0.0), DVec3::Y];
        let (kept, tris, merged) = weld_vertices(vertices, vec![[2, 1, 3]], EPS);
        assert_eq!(merged, 1);
        assert_eq!(kept.len(), 3);
        assert_eq!(tris, vec![[0, 1, 2]]);
    }

    #[test]
    fn test_weld_across_cell_boundary() {
        // Straddles the cell boundary at x = 0.
        let vertices = vec![DVec3::new(-1e-9, 0.0, 0.0), DVec3::new(1e-9, 0.0, 0.0)];
        let (kept, _, merged) = weld_vertices(vertices, vec![], EPS);
        assert_eq!(merged, 1);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_degenerate_faces_removed() {
        let vertices = vec![DVec3::ZERO, DVec3::X, DVec3::new(2.0, 0.0, 0.0), DVec3::Y];
        let tris = vec![[0, 1, 3], [0, 0, 1], [0, 1, 2]];
        let (kept, removed) = remove_degenerate_faces(&vertices, tris, EPS);
        assert_eq!(kept, vec![[0, 1, 3]]);
        assert_eq!(removed, 2);
    }

    #[test]
    fn test_small_faces_are_not_degenerate() {
        // Area far below epsilon, altitude far above it.
        let vertices = vec![DVec3::ZERO, DVec3::new(1e-4, 0.0, 0.0), DVec3::new(0.0, 5e-5, 0.0)];
        let (kept, removed) = remove_degenerate_faces(&vertices, vec![[0, 1, 2]], EPS);
        assert_eq!(removed, 0);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_needle_face_is_degenerate() {
        let vertices = vec![DVec3::ZERO, DVec3::X, DVec3::new(0.5, 1e-10, 0.0)];
        let (kept, removed) = remove_degenerate_faces(&vertices, vec![[0, 1, 2]], EPS);
        assert!(kept.is_empty());
        assert_eq!(removed, 1);
    }

    #[test]
    fn test_unreferenced_vertices_compacted() {
        let vertices = vec![DVec3::Z, DVec3::ZERO, DVec3::X, DVec3::Y];
        let (kept, tris, removed) = remove_unreferenced_vertices(vertices, vec![[1, 2, 3]]);
        assert_eq!(removed, 1);
        assert_eq!(kept, vec![DVec3::ZERO, DVec3::X, DVec3::Y]);
        assert_eq!(tris, vec![[0, 1, 2]]);
    }

    #[test]
    fn test_cleanup_of_clean_mesh_is_noop() {
        let mesh = Mesh::from_parts(
            vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z],
            vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]],
        );
        let (cleaned, report) = cleanup(mesh.clone(), EPS);
        assert!(report.is_clean());
        assert_eq!(cleaned, mesh);
    }
}
