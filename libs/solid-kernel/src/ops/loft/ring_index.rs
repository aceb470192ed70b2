//! # Ring Index Mapper
//!
//! Maps every ring point back onto the triangulation's vertex set. The
//! triangulator is free to reorder or deduplicate points, so each point is
//! matched by nearest neighbour. The output keeps each ring's point order
//! exactly, which is what lets the wall stitcher walk consecutive indices as
//! boundary edges.

use glam::DVec2;

use crate::error::{KernelError, Result};
use crate::geometry::Profile;

/// For every ring of `profile` (exterior first, then holes), the ordered
/// triangulation-vertex indices of its points.
///
/// # Errors
///
/// `Geometry` if a ring point has no vertex within `tolerance`.
pub fn map_ring_indices(
    vertices: &[DVec2],
    profile: &Profile,
    tolerance: f64,
) -> Result<Vec<Vec<usize>>> {
    profile
        .rings()
        .map(|ring| {
            ring.points()
                .iter()
                .map(|&p| nearest_vertex(vertices, p, tolerance))
                .collect()
        })
        .collect()
}

fn nearest_vertex(vertices: &[DVec2], p: DVec2, tolerance: f64) -> Result<usize> {
    let nearest = vertices
        .iter()
        .enumerate()
        .map(|(i, v)| (i, v.distance_squared(p)))
        .min_by(|a, b| a.1.total_cmp(&b.1));

    match nearest {
        Some((index, d2)) if d2.sqrt() <= tolerance => Ok(index),
        Some((_, d2)) => Err(KernelError::geometry(format!(
            "ring point ({}, {}) has no triangulation vertex within {tolerance} (nearest {})",
            p.x,
            p.y,
            d2.sqrt()
        ))),
        None => Err(KernelError::geometry("triangulation has no vertices")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::shapes::annulus;

    #[test]
    fn test_maps_reordered_vertices() {
        let profile = Profile::from_points(vec![DVec2::ZERO, DVec2::X, DVec2::Y]).unwrap();
        // Triangulator returned the points rotated.
        let vertices = vec![DVec2::Y, DVec2::ZERO, DVec2::X];
        let rings = map_ring_indices(&vertices, &profile, 1e-6).unwrap();
        assert_eq!(rings, vec![vec![1, 2, 0]]);
    }

    #[test]
    fn test_preserves_ring_order_with_holes() {
        let profile = annulus(2.0, 1.0, 8).unwrap();
        let vertices: Vec<DVec2> = profile
            .rings()
            .flat_map(|r| r.points().iter().copied())
            .collect();
        let rings = map_ring_indices(&vertices, &profile, 1e-6).unwrap();
        assert_eq!(rings.len(), 2);
        assert_eq!(rings[0], (0..8).collect::<Vec<_>>());
        assert_eq!(rings[1], (8..16).collect::<Vec<_>>());
    }

    #[test]
    fn test_missing_point_is_geometry_error() {
        let profile = Profile::from_points(vec![DVec2::ZERO, DVec2::X, DVec2::Y]).unwrap();
        let vertices = vec![DVec2::ZERO, DVec2::X];
        let err = map_ring_indices(&vertices, &profile, 1e-6).unwrap_err();
        assert!(err.is_geometry());
    }
}
