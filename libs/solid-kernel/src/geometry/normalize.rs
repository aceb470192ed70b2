//! # Polygon Normalizer
//!
//! Canonicalizes ring winding and repairs minor invalidity.
//!
//! ## Algorithm
//!
//! 1. If any ring is not simple, run one repair pass: a self-union of the
//!    polygon (zero-width buffer). Still invalid afterwards ⇒ `Geometry` error.
//! 2. Reverse the exterior if its shoelace area is negative.
//! 3. Reverse every hole whose shoelace area is positive.
//!
//! Normalizing an already normalized profile returns it unchanged.

use geo::BooleanOps;
use glam::DVec2;
use robust::{orient2d, Coord};
use tracing::warn;

use super::{Profile, Ring};
use crate::error::{KernelError, Result};

/// Returns a normalized copy of the profile.
///
/// # Example
///
/// ```rust
/// use glam::DVec2;
/// use solid_kernel::geometry::{normalize, Profile};
///
/// let square = Profile::from_points(vec![
///     DVec2::ZERO, DVec2::X, DVec2::ONE, DVec2::Y,
/// ]).unwrap();
/// assert_eq!(normalize(&square).unwrap(), square);
/// ```
pub fn normalize(profile: &Profile) -> Result<Profile> {
    normalize_rings(profile.exterior.clone(), profile.holes.clone())
}

/// Normalizes loose rings into a profile.
pub(crate) fn normalize_rings(exterior: Ring, holes: Vec<Ring>) -> Result<Profile> {
    let valid = exterior.is_simple() && holes.iter().all(Ring::is_simple);

    let (exterior, holes) = if valid {
        (exterior, holes)
    } else {
        warn!(
            points = exterior.len(),
            holes = holes.len(),
            "profile is not simple, attempting self-union repair"
        );
        let (exterior, holes) = repair(&exterior, &holes)?;
        if !exterior.is_simple() || !holes.iter().all(Ring::is_simple) {
            return Err(KernelError::geometry(
                "profile is self-intersecting and could not be repaired",
            ));
        }
        (exterior, holes)
    };

    let exterior = if exterior.signed_area() < 0.0 {
        exterior.reversed()
    } else {
        exterior
    };
    let holes = holes
        .into_iter()
        .map(|hole| {
            if hole.signed_area() > 0.0 {
                hole.reversed()
            } else {
                hole
            }
        })
        .collect();

    Ok(Profile::from_normalized(exterior, holes))
}

/// Single repair pass: union the polygon with itself.
fn repair(exterior: &Ring, holes: &[Ring]) -> Result<(Ring, Vec<Ring>)> {
    let polygon = Profile::from_normalized(exterior.clone(), holes.to_vec()).to_geo();
    let repaired = polygon.union(&polygon);

    let mut parts = repaired.0.into_iter();
    let (Some(part), None) = (parts.next(), parts.next()) else {
        return Err(KernelError::geometry(
            "profile repair did not yield exactly one region",
        ));
    };

    let (outer, inners) = part.into_inner();
    let to_ring = |line: geo::LineString<f64>| {
        Ring::new(line.0.into_iter().map(|c| DVec2::new(c.x, c.y)).collect())
    };

    let exterior = to_ring(outer)?;
    let holes = inners
        .into_iter()
        .map(to_ring)
        .collect::<Result<Vec<_>>>()?;
    Ok((exterior, holes))
}

/// Returns true if no pair of edges intersects other than adjacent edges at
/// their shared vertex.
pub(crate) fn ring_is_simple(points: &[DVec2]) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }

    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];

        // Adjacent edge folding back over this one.
        let c = points[(i + 2) % n];
        if orientation(a, b, c) == 0.0 && (b - a).dot(c - b) < 0.0 {
            return false;
        }

        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            let p = points[j];
            let q = points[(j + 1) % n];
            if segments_intersect(a, b, p, q) {
                return false;
            }
        }
    }

    true
}

#[inline]
fn orientation(a: DVec2, b: DVec2, c: DVec2) -> f64 {
    orient2d(
        Coord { x: a.x, y: a.y },
        Coord { x: b.x, y: b.y },
        Coord { x: c.x, y: c.y },
    )
}

fn on_segment(a: DVec2, b: DVec2, p: DVec2) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Exact segment intersection test, touching included.
fn segments_intersect(a: DVec2, b: DVec2, p: DVec2, q: DVec2) -> bool {
    let o1 = orientation(a, b, p);
    let o2 = orientation(a, b, q);
    let o3 = orientation(p, q, a);
    let o4 = orientation(p, q, b);

    if o1 * o2 < 0.0 && o3 * o4 < 0.0 {
        return true;
    }

    (o1 == 0.0 && on_segment(a, b, p))
        || (o2 == 0.0 && on_segment(a, b, q))
        || (o3 == 0.0 && on_segment(p, q, a))
        || (o4 == 0.0 && on_segment(p, q, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_is_simple() {
        let square = [DVec2::ZERO, DVec2::X, DVec2::ONE, DVec2::Y];
        assert!(ring_is_simple(&square));
    }

    #[test]
    fn test_bowtie_is_not_simple() {
        let bowtie = [DVec2::ZERO, DVec2::ONE, DVec2::X, DVec2::Y];
        assert!(!ring_is_simple(&bowtie));
    }

    #[test]
    fn test_spike_is_not_simple() {
        let spike = [
            DVec2::ZERO,
            DVec2::new(2.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(1.0, 1.0),
        ];
        assert!(!ring_is_simple(&spike));
    }

    #[test]
    fn test_touching_vertex_is_not_simple() {
        // Vertex (1, 0) touches the edge (0,0)-(2,0) from above.
        let ring = [
            DVec2::ZERO,
            DVec2::new(2.0, 0.0),
            DVec2::new(2.0, 2.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(0.0, 2.0),
        ];
        assert!(!ring_is_simple(&ring));
    }

    #[test]
    fn test_segments_intersect_cross() {
        assert!(segments_intersect(
            DVec2::ZERO,
            DVec2::ONE,
            DVec2::X,
            DVec2::Y
        ));
        assert!(!segments_intersect(
            DVec2::ZERO,
            DVec2::X,
            DVec2::Y,
            DVec2::ONE
        ));
    }
}
