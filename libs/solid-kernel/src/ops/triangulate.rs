//! # Profile Triangulation
//!
//! Thin adapter over `earcutr`, which the kernel treats as a black box
//! returning `(vertices2D, faces)` for a profile interior.
//!
//! The adapter canonicalizes earcut's output in two ways:
//!
//! - **Winding**: every returned face winds clockwise in the XY plane, so
//!   that used as-is at the bottom of a solid it faces down (outward).
//! - **T-junctions**: when earcut bridges a hole along collinear points it
//!   can emit a face edge that runs straight across a ring vertex. Such a
//!   face is split at that vertex, so every boundary edge of the face set is
//!   exactly one ring edge and the walls meet the caps edge for edge.

use std::collections::HashSet;

use config::constants::{COLLINEAR_TOLERANCE, EPSILON};
use glam::DVec2;
use tracing::debug;

use crate::error::{KernelError, Result};
use crate::geometry::Profile;

/// Triangulated profile interior.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangulation {
    /// Flat 2D vertex set. Order is the triangulator's choice.
    pub vertices: Vec<DVec2>,
    /// Faces as indices into `vertices`, wound clockwise.
    pub faces: Vec<[usize; 3]>,
}

impl Triangulation {
    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }
}

/// Triangulates the interior of a profile, holes respected.
///
/// # Example
///
/// ```rust
/// use glam::DVec2;
/// use solid_kernel::geometry::Profile;
/// use solid_kernel::ops::triangulate::triangulate;
///
/// let tri = Profile::from_points(vec![DVec2::ZERO, DVec2::X, DVec2::Y]).unwrap();
/// let t = triangulate(&tri).unwrap();
/// assert_eq!(t.vertex_count(), 3);
/// assert_eq!(t.face_count(), 1);
/// ```
pub fn triangulate(profile: &Profile) -> Result<Triangulation> {
    let mut coords = Vec::with_capacity(profile.point_count() * 2);
    let mut hole_indices = Vec::with_capacity(profile.holes().len());
    let mut ring_edges = HashSet::with_capacity(profile.point_count());

    for (i, ring) in profile.rings().enumerate() {
        let start = coords.len() / 2;
        if i > 0 {
            hole_indices.push(start);
        }
        for p in ring.points() {
            coords.push(p.x);
            coords.push(p.y);
        }
        let n = ring.len();
        for k in 0..n {
            ring_edges.insert(undirected(start + k, start + (k + 1) % n));
        }
    }

    let indices = earcutr::earcut(&coords, &hole_indices, 2)
        .map_err(|e| KernelError::geometry(format!("triangulation failed: {e:?}")))?;

    let vertices: Vec<DVec2> = coords
        .chunks_exact(2)
        .map(|c| DVec2::new(c[0], c[1]))
        .collect();

    let faces: Vec<[usize; 3]> = indices
        .chunks_exact(3)
        .filter(|tri| !is_flat(&vertices, [tri[0], tri[1], tri[2]]))
        .map(|tri| {
            let [a, b, c] = [tri[0], tri[1], tri[2]];
            if cross(vertices[a], vertices[b], vertices[c]) > 0.0 {
                [a, c, b]
            } else {
                [a, b, c]
            }
        })
        .collect();

    let raw = faces.len();
    let faces = split_t_junctions(&vertices, faces, &ring_edges);
    if faces.len() != raw {
        debug!(split = faces.len() - raw, "split faces at ring vertices");
    }

    if faces.is_empty() {
        return Err(KernelError::geometry(
            "triangulation produced no faces for a non-empty profile",
        ));
    }

    debug!(
        vertices = vertices.len(),
        faces = faces.len(),
        "triangulated profile"
    );

    Ok(Triangulation { vertices, faces })
}

#[inline]
fn cross(a: DVec2, b: DVec2, c: DVec2) -> f64 {
    (b - a).perp_dot(c - a)
}

/// Face whose altitude over its longest edge is within the collinear
/// tolerance. Dropping it leaves its long edge open, which the T-junction
/// pass then splits at the middle vertex.
fn is_flat(vertices: &[DVec2], [a, b, c]: [usize; 3]) -> bool {
    let (pa, pb, pc) = (vertices[a], vertices[b], vertices[c]);
    let longest = pa.distance(pb).max(pb.distance(pc)).max(pc.distance(pa));
    longest <= EPSILON || cross(pa, pb, pc).abs() / longest <= COLLINEAR_TOLERANCE
}

#[inline]
fn undirected(a: usize, b: usize) -> (usize, usize) {
    (a.min(b), a.max(b))
}

/// Splits faces whose open edges pass through a vertex until every edge is
/// either shared by two faces or a ring edge.
fn split_t_junctions(
    vertices: &[DVec2],
    mut faces: Vec<[usize; 3]>,
    ring_edges: &HashSet<(usize, usize)>,
) -> Vec<[usize; 3]> {
    // Each split consumes one vertex on one edge; bounded by V per edge.
    for _ in 0..=vertices.len() {
        let directed: HashSet<(usize, usize)> = faces
            .iter()
            .flat_map(|f| [(f[0], f[1]), (f[1], f[2]), (f[2], f[0])])
            .collect();

        let mut changed = false;
        let mut next = Vec::with_capacity(faces.len() + 4);
        for face in faces {
            match find_split(vertices, face, &directed, ring_edges) {
                Some((k, w)) => {
                    let [a, b, c] = [face[k], face[(k + 1) % 3], face[(k + 2) % 3]];
                    next.push([a, w, c]);
                    next.push([w, b, c]);
                    changed = true;
                }
                None => next.push(face),
            }
        }
        faces = next;
        if !changed {
            break;
        }
    }
    faces
}

/// First open, non-ring edge of `face` with a vertex strictly inside it.
///
/// Returns the edge's position in the face and the vertex nearest its start.
fn find_split(
    vertices: &[DVec2],
    face: [usize; 3],
    directed: &HashSet<(usize, usize)>,
    ring_edges: &HashSet<(usize, usize)>,
) -> Option<(usize, usize)> {
    (0..3).find_map(|k| {
        let (u, v) = (face[k], face[(k + 1) % 3]);
        if directed.contains(&(v, u)) || ring_edges.contains(&undirected(u, v)) {
            return None;
        }
        vertex_on_segment(vertices, u, v).map(|w| (k, w))
    })
}

/// Vertex lying strictly between `u` and `v`, nearest to `u`.
fn vertex_on_segment(vertices: &[DVec2], u: usize, v: usize) -> Option<usize> {
    let (a, b) = (vertices[u], vertices[v]);
    let edge = b - a;
    let len2 = edge.length_squared();
    if len2 <= EPSILON * EPSILON {
        return None;
    }
    let len = len2.sqrt();

    vertices
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != u && i != v)
        .filter_map(|(i, &p)| {
            let t = (p - a).dot(edge) / len2;
            let off_line = edge.perp_dot(p - a).abs() / len;
            let inside = t * len > COLLINEAR_TOLERANCE && (1.0 - t) * len > COLLINEAR_TOLERANCE;
            (inside && off_line <= COLLINEAR_TOLERANCE).then_some((i, t))
        })
        .min_by(|x, y| x.1.total_cmp(&y.1))
        .map(|(i, _)| i)
}

/// Total unsigned area covered by the faces.
pub fn covered_area(triangulation: &Triangulation) -> f64 {
    triangulation
        .faces
        .iter()
        .map(|&[a, b, c]| {
            let v = &triangulation.vertices;
            cross(v[a], v[b], v[c]).abs() * 0.5
        })
        .filter(|area| *area > EPSILON)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::shapes::{annulus, rectangle};
    use approx::assert_relative_eq;

    #[test]
    fn test_faces_wind_clockwise() {
        let square = rectangle(2.0, 2.0, false).unwrap();
        let t = triangulate(&square).unwrap();
        assert_eq!(t.face_count(), 2);
        for &[a, b, c] in &t.faces {
            assert!(cross(t.vertices[a], t.vertices[b], t.vertices[c]) < 0.0);
        }
    }

    #[test]
    fn test_edge_across_vertex_is_split() {
        // Outer square with a vertex in the middle of its bottom edge, and a
        // face set that skips it: (0,0)-(2,0) runs across vertex 4.
        let vertices = vec![
            DVec2::ZERO,
            DVec2::new(2.0, 0.0),
            DVec2::new(2.0, 2.0),
            DVec2::new(0.0, 2.0),
            DVec2::new(1.0, 0.0),
        ];
        let ring_edges: HashSet<_> = [(0, 4), (1, 4), (1, 2), (2, 3), (0, 3)].into_iter().collect();
        let faces = vec![[0, 2, 1], [0, 3, 2]];
        let split = split_t_junctions(&vertices, faces, &ring_edges);
        assert_eq!(split.len(), 3);

        // Compare with each face rotated to start at its smallest index.
        let canonical: Vec<[usize; 3]> = split
            .iter()
            .map(|f| {
                let k = (0..3).min_by_key(|&k| f[k]).unwrap_or(0);
                [f[k], f[(k + 1) % 3], f[(k + 2) % 3]]
            })
            .collect();
        assert!(canonical.contains(&[0, 2, 4]));
        assert!(canonical.contains(&[1, 4, 2]));
        assert!(canonical.contains(&[0, 3, 2]));
        for &[a, b, c] in &split {
            assert!(cross(vertices[a], vertices[b], vertices[c]) < 0.0);
        }
    }

    #[test]
    fn test_flat_face_is_replaced_by_split() {
        // Same square, but the skipped vertex sits in a zero-area face.
        let vertices = vec![
            DVec2::ZERO,
            DVec2::new(2.0, 0.0),
            DVec2::new(2.0, 2.0),
            DVec2::new(0.0, 2.0),
            DVec2::new(1.0, 0.0),
        ];
        assert!(is_flat(&vertices, [0, 4, 1]));
        assert!(!is_flat(&vertices, [0, 2, 1]));

        let ring_edges: HashSet<_> = [(0, 4), (1, 4), (1, 2), (2, 3), (0, 3)].into_iter().collect();
        let faces: Vec<[usize; 3]> = [[0, 4, 1], [0, 2, 1], [0, 3, 2]]
            .into_iter()
            .filter(|&f| !is_flat(&vertices, f))
            .collect();
        let split = split_t_junctions(&vertices, faces, &ring_edges);
        assert_eq!(split.len(), 3);
        assert_relative_eq!(
            split
                .iter()
                .map(|&[a, b, c]| cross(vertices[a], vertices[b], vertices[c]).abs() * 0.5)
                .sum::<f64>(),
            4.0
        );
    }

    #[test]
    fn test_boundary_edges_are_ring_edges() {
        // A hole bridged along a horizontal line of collinear vertices.
        let profile = Profile::new(
            vec![
                DVec2::ZERO,
                DVec2::new(6.0, 0.0),
                DVec2::new(6.0, 1.0),
                DVec2::new(5.0, 1.0),
                DVec2::new(4.0, 1.0),
                DVec2::new(6.0, 2.0),
                DVec2::new(6.0, 4.0),
                DVec2::new(0.0, 4.0),
                DVec2::new(0.0, 1.0),
            ],
            vec![vec![
                DVec2::new(1.0, 1.0),
                DVec2::new(2.0, 1.0),
                DVec2::new(3.0, 1.0),
                DVec2::new(3.0, 3.0),
                DVec2::new(1.0, 3.0),
            ]],
        )
        .unwrap();
        let t = triangulate(&profile).unwrap();

        let directed: HashSet<(usize, usize)> = t
            .faces
            .iter()
            .flat_map(|f| [(f[0], f[1]), (f[1], f[2]), (f[2], f[0])])
            .collect();
        let boundary: HashSet<(usize, usize)> = directed
            .iter()
            .filter(|&&(a, b)| !directed.contains(&(b, a)))
            .map(|&(a, b)| undirected(a, b))
            .collect();
        assert_eq!(boundary.len(), profile.point_count());
        assert_relative_eq!(covered_area(&t), profile.area(), epsilon = 1e-9);
    }

    #[test]
    fn test_holes_are_excluded_from_area() {
        let ring = annulus(2.0, 1.0, 32).unwrap();
        let t = triangulate(&ring).unwrap();
        assert_eq!(t.vertex_count(), 64);
        assert_relative_eq!(covered_area(&t), ring.area(), epsilon = 1e-9);
    }
}
