//! # Profile Constructors
//!
//! Common planar shapes, all returned as normalized [`Profile`]s.
//!
//! Parameter validation follows the kernel taxonomy: sizes that are not
//! strictly positive are `Configuration` errors, impossible constructions
//! (a tangent from a point inside its circle) are `Geometry` errors.

use std::f64::consts::{PI, TAU};

use config::constants::{EPSILON, MIN_CIRCLE_SEGMENTS};
use glam::DVec2;

use super::Profile;
use crate::error::{KernelError, Result};

fn check_positive(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(KernelError::configuration(format!(
            "{name} must be positive, got {value}"
        )));
    }
    Ok(())
}

fn check_segments(segments: u32) -> Result<()> {
    if segments < MIN_CIRCLE_SEGMENTS {
        return Err(KernelError::configuration(format!(
            "segment count must be at least {MIN_CIRCLE_SEGMENTS}, got {segments}"
        )));
    }
    Ok(())
}

fn circle_points(center: DVec2, radius: f64, segments: u32) -> Vec<DVec2> {
    (0..segments)
        .map(|i| {
            let angle = TAU * f64::from(i) / f64::from(segments);
            center + radius * DVec2::from_angle(angle)
        })
        .collect()
}

/// Axis-aligned rectangle of `width` (x) by `depth` (y).
///
/// With `center` the rectangle is centered on the origin, otherwise its
/// minimum corner sits at the origin.
///
/// # Example
///
/// ```rust
/// use solid_kernel::geometry::shapes::rectangle;
///
/// let r = rectangle(10.0, 20.0, false).unwrap();
/// assert_eq!(r.area(), 200.0);
/// assert!(rectangle(0.0, 1.0, false).is_err());
/// ```
pub fn rectangle(width: f64, depth: f64, center: bool) -> Result<Profile> {
    check_positive("width", width)?;
    check_positive("depth", depth)?;

    let origin = if center {
        DVec2::new(-width / 2.0, -depth / 2.0)
    } else {
        DVec2::ZERO
    };

    Profile::from_points(vec![
        origin,
        origin + DVec2::new(width, 0.0),
        origin + DVec2::new(width, depth),
        origin + DVec2::new(0.0, depth),
    ])
}

/// Circle approximated by `segments` points, centered on the origin.
pub fn circle(radius: f64, segments: u32) -> Result<Profile> {
    check_positive("radius", radius)?;
    check_segments(segments)?;
    Profile::from_points(circle_points(DVec2::ZERO, radius, segments))
}

/// Regular polygon with `sides` vertices on a circle of `radius`.
pub fn regular_polygon(sides: u32, radius: f64) -> Result<Profile> {
    circle(radius, sides)
}

/// Ring between two concentric circles.
pub fn annulus(outer_radius: f64, inner_radius: f64, segments: u32) -> Result<Profile> {
    check_positive("outer radius", outer_radius)?;
    check_positive("inner radius", inner_radius)?;
    check_segments(segments)?;
    if inner_radius >= outer_radius {
        return Err(KernelError::configuration(format!(
            "inner radius {inner_radius} must be smaller than outer radius {outer_radius}"
        )));
    }

    Profile::new(
        circle_points(DVec2::ZERO, outer_radius, segments),
        vec![circle_points(DVec2::ZERO, inner_radius, segments)],
    )
}

/// Points where the two tangent lines from `point` touch the circle.
///
/// Returns `(left, right)` as seen from `point` looking at the center.
///
/// # Errors
///
/// `Geometry` if `point` lies on or inside the circle.
pub fn tangent_points(point: DVec2, center: DVec2, radius: f64) -> Result<(DVec2, DVec2)> {
    check_positive("radius", radius)?;

    let offset = point - center;
    let distance = offset.length();
    if distance - radius <= EPSILON {
        return Err(KernelError::geometry(format!(
            "tangent point must lie strictly outside the circle (distance {distance}, radius {radius})"
        )));
    }

    let base = offset.y.atan2(offset.x);
    let spread = (radius / distance).acos();
    Ok((
        center + radius * DVec2::from_angle(base + spread),
        center + radius * DVec2::from_angle(base - spread),
    ))
}

/// Teardrop region bounded by a circle and the two tangent lines from an
/// external point.
///
/// `segments` is the point count used for the far arc.
pub fn tangent_hull(center: DVec2, radius: f64, point: DVec2, segments: u32) -> Result<Profile> {
    check_segments(segments)?;
    // Validates radius and the point position.
    tangent_points(point, center, radius)?;

    let offset = point - center;
    let base = offset.y.atan2(offset.x);
    let spread = (radius / offset.length()).acos();

    // Arc from the first tangency counter-clockwise around the far side.
    let start = base + spread;
    let sweep = 2.0 * (PI - spread);
    let mut points = Vec::with_capacity(segments as usize + 2);
    points.push(point);
    for i in 0..=segments {
        let angle = start + sweep * f64::from(i) / f64::from(segments);
        points.push(center + radius * DVec2::from_angle(angle));
    }

    Profile::from_points(points)
}
