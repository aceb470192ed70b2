//! # Planar Geometry
//!
//! Rings and profiles: the 2D inputs every solid builder starts from.
//!
//! - [`Ring`]: an implicitly closed sequence of 2D points (first point is not
//!   repeated at the end)
//! - [`Profile`]: one exterior ring plus hole rings, always normalized
//!   (exterior counter-clockwise, holes clockwise)
//!
//! `Profile::new` is the only way to obtain a profile. It validates and
//! normalizes once, so downstream code can rely on the winding invariant.

pub mod normalize;
pub mod shapes;


use config::constants::EPSILON;
use geo::{Centroid, Coord, LineString, Polygon};
use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::error::{KernelError, Result};

pub use normalize::normalize;

/// An ordered, implicitly closed sequence of 2D points.
///
/// Invariants: at least three points, finite coordinates, no two consecutive
/// points equal (including last → first).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<DVec2>", into = "Vec<DVec2>")]
pub struct Ring {
    points: Vec<DVec2>,
}

impl Ring {
    /// Creates a ring from points.
    ///
    /// A trailing point equal to the first is dropped, as are consecutive
    /// duplicates.
    ///
    /// # Errors
    ///
    /// `Geometry` if a coordinate is not finite or fewer than three distinct
    /// points remain.
    pub fn new(points: Vec<DVec2>) -> Result<Self> {
        if points.iter().any(|p| !p.is_finite()) {
            return Err(KernelError::geometry("ring contains a non-finite coordinate"));
        }

        let mut cleaned: Vec<DVec2> = Vec::with_capacity(points.len());
        for p in points {
            if cleaned.last().map_or(true, |last| last.distance(p) > EPSILON) {
                cleaned.push(p);
            }
        }
        while cleaned.len() > 1 && cleaned[0].distance(cleaned[cleaned.len() - 1]) <= EPSILON {
            cleaned.pop();
        }

        if cleaned.len() < 3 {
            return Err(KernelError::geometry(format!(
                "ring needs at least 3 distinct points, got {}",
                cleaned.len()
            )));
        }

        Ok(Self { points: cleaned })
    }

    /// Returns the ring's points in order.
    #[inline]
    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    /// Returns the number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; rings hold at least three points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the first point, used as the ring's representative point.
    #[inline]
    pub fn first(&self) -> DVec2 {
        self.points[0]
    }

    /// Iterates over edges `(p[i], p[i+1])`, wrapping at the end.
    pub fn edges(&self) -> impl Iterator<Item = (DVec2, DVec2)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Signed area by the shoelace formula; positive for counter-clockwise.
    pub fn signed_area(&self) -> f64 {
        self.edges()
            .map(|(a, b)| a.x * b.y - b.x * a.y)
            .sum::<f64>()
            * 0.5
    }

    /// Returns true if the ring winds counter-clockwise.
    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Returns the ring with its point order reversed.
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self { points }
    }

    /// Even-odd point-in-polygon test.
    ///
    /// Points exactly on the boundary may be reported either way.
    pub fn contains_point(&self, p: DVec2) -> bool {
        let mut inside = false;
        for (a, b) in self.edges() {
            if (a.y > p.y) != (b.y > p.y) {
                let x_cross = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if p.x < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Axis-aligned bounds as (min, max).
    pub fn bounds(&self) -> (DVec2, DVec2) {
        self.points[1..].iter().fold(
            (self.points[0], self.points[0]),
            |(min, max), p| (min.min(*p), max.max(*p)),
        )
    }

    /// Returns true if no two edges cross or overlap.
    pub fn is_simple(&self) -> bool {
        normalize::ring_is_simple(&self.points)
    }

    fn to_line_string(&self) -> LineString<f64> {
        LineString::new(
            self.points
                .iter()
                .map(|p| Coord { x: p.x, y: p.y })
                .collect(),
        )
    }
}

impl TryFrom<Vec<DVec2>> for Ring {
    type Error = KernelError;

    fn try_from(points: Vec<DVec2>) -> Result<Self> {
        Self::new(points)
    }
}

impl From<Ring> for Vec<DVec2> {
    fn from(ring: Ring) -> Self {
        ring.points
    }
}

/// A planar region: one exterior ring and zero or more hole rings.
///
/// Invariants: exterior winds counter-clockwise, every hole winds clockwise,
/// all rings are simple, the exterior has non-zero span and area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProfileData")]
pub struct Profile {
    exterior: Ring,
    holes: Vec<Ring>,
}

/// Unvalidated profile as it arrives over serde.
#[derive(Deserialize)]
struct ProfileData {
    exterior: Vec<DVec2>,
    #[serde(default)]
    holes: Vec<Vec<DVec2>>,
}

impl TryFrom<ProfileData> for Profile {
    type Error = KernelError;

    fn try_from(data: ProfileData) -> Result<Self> {
        Self::new(data.exterior, data.holes)
    }
}

impl Profile {
    /// Creates a validated, normalized profile.
    ///
    /// # Example
    ///
    /// ```rust
    /// use glam::DVec2;
    /// use solid_kernel::geometry::Profile;
    ///
    /// // Clockwise input is reversed to counter-clockwise.
    /// let profile = Profile::new(
    ///     vec![DVec2::ZERO, DVec2::Y, DVec2::ONE, DVec2::X],
    ///     vec![],
    /// ).unwrap();
    /// assert!(profile.exterior().is_ccw());
    /// ```
    pub fn new(exterior: Vec<DVec2>, holes: Vec<Vec<DVec2>>) -> Result<Self> {
        let exterior = Ring::new(exterior)?;
        let holes = holes
            .into_iter()
            .map(Ring::new)
            .collect::<Result<Vec<_>>>()?;
        Self::from_rings(exterior, holes)
    }

    /// Creates a profile from already constructed rings.
    pub fn from_rings(exterior: Ring, holes: Vec<Ring>) -> Result<Self> {
        let (min, max) = exterior.bounds();
        let span = max - min;
        if span.x <= EPSILON || span.y <= EPSILON {
            return Err(KernelError::geometry(format!(
                "profile has zero span ({} x {})",
                span.x, span.y
            )));
        }
        if exterior.signed_area().abs() <= EPSILON {
            return Err(KernelError::geometry("profile exterior has zero area"));
        }

        normalize::normalize_rings(exterior, holes)
    }

    /// Converts a raw point list (no holes) into a profile.
    pub fn from_points(points: Vec<DVec2>) -> Result<Self> {
        Self::new(points, Vec::new())
    }

    /// Flattens 3D points onto the XY plane and builds a profile.
    ///
    /// Only orthographic projection is supported; z is discarded.
    pub fn from_points_3d(points: &[DVec3]) -> Result<Self> {
        Self::from_points(points.iter().map(|p| p.truncate()).collect())
    }

    /// Builds a profile without validation. Callers guarantee the invariants.
    pub(crate) fn from_normalized(exterior: Ring, holes: Vec<Ring>) -> Self {
        Self { exterior, holes }
    }

    /// The counter-clockwise exterior ring.
    #[inline]
    pub fn exterior(&self) -> &Ring {
        &self.exterior
    }

    /// The clockwise hole rings.
    #[inline]
    pub fn holes(&self) -> &[Ring] {
        &self.holes
    }

    /// Returns true if the profile has holes.
    pub fn has_holes(&self) -> bool {
        !self.holes.is_empty()
    }

    /// Iterates over the exterior followed by every hole.
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        std::iter::once(&self.exterior).chain(self.holes.iter())
    }

    /// Total number of ring points.
    pub fn point_count(&self) -> usize {
        self.rings().map(Ring::len).sum()
    }

    /// Net area (exterior minus holes).
    pub fn area(&self) -> f64 {
        self.rings().map(Ring::signed_area).sum()
    }

    /// Axis-aligned bounds of the exterior.
    pub fn bounds(&self) -> (DVec2, DVec2) {
        self.exterior.bounds()
    }

    /// Area centroid of the region, holes included.
    ///
    /// This is the pivot for layer scaling and twisting.
    pub fn centroid(&self) -> DVec2 {
        match self.to_geo().centroid() {
            Some(point) => DVec2::new(point.x(), point.y()),
            None => {
                let (min, max) = self.bounds();
                (min + max) * 0.5
            }
        }
    }

    pub(crate) fn to_geo(&self) -> Polygon<f64> {
        Polygon::new(
            self.exterior.to_line_string(),
            self.holes.iter().map(Ring::to_line_string).collect(),
        )
    }
}
