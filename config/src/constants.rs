//! # Configuration Constants
//!
//! Tolerances, tessellation defaults and safety limits for the kernel.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **Lofting**: Default slice counts and glyph extrusion parameters
//! - **Limits**: Maximum values for safety bounds

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// Used for determining if two floating-point values are "equal" within
/// numerical tolerance.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-10;

/// Epsilon for vertex deduplication.
///
/// Vertices closer than this distance are welded into one id during mesh
/// cleanup, and faces with a smaller cross-product magnitude count as
/// degenerate.
///
/// # Example
///
/// ```rust
/// use config::constants::VERTEX_MERGE_EPSILON;
///
/// fn vertices_should_merge(v1: [f64; 3], v2: [f64; 3]) -> bool {
///     let dx = v1[0] - v2[0];
///     let dy = v1[1] - v2[1];
///     let dz = v1[2] - v2[2];
///     (dx * dx + dy * dy + dz * dz).sqrt() < VERTEX_MERGE_EPSILON
/// }
/// ```
pub const VERTEX_MERGE_EPSILON: f64 = 1e-8;

/// Maximum distance between a ring point and the triangulation vertex it is
/// mapped onto.
///
/// The triangulator may reorder points, so ring points are matched back by
/// nearest neighbour. A match further away than this means the triangulator
/// moved or dropped the point.
pub const RING_MATCH_TOLERANCE: f64 = 1e-6;

/// Maximum distance from a vertex to a cap edge for the vertex to count as
/// lying on that edge.
///
/// Cap edges that run across a ring vertex are split there, so the cap
/// boundary matches the wall edges one to one.
pub const COLLINEAR_TOLERANCE: f64 = 1e-9;

// =============================================================================
// LOFTING CONSTANTS
// =============================================================================

/// Default number of slices for a lofted extrusion.
///
/// Used when neither the call nor the kernel configuration supplies a
/// slice count.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_EXTRUDE_SLICES;
///
/// let requested: Option<u32> = None;
/// assert_eq!(requested.unwrap_or(DEFAULT_EXTRUDE_SLICES), 20);
/// ```
pub const DEFAULT_EXTRUDE_SLICES: u32 = 20;

/// Extrusion height for text meshes.
///
/// Glyph profiles are lofted with this fixed height in a single slice.
pub const GLYPH_EXTRUDE_HEIGHT: f64 = 0.1;

/// Line segments emitted per quadratic or cubic Bézier segment when
/// flattening glyph outlines.
pub const GLYPH_CURVE_STEPS: usize = 8;

/// Advance used for characters the font has no glyph for, as a fraction of
/// the em size.
pub const MISSING_GLYPH_ADVANCE_EM: f64 = 0.3;

/// Default segment count for circular profile constructors.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_CIRCLE_SEGMENTS;
/// assert!(DEFAULT_CIRCLE_SEGMENTS >= 3);
/// ```
pub const DEFAULT_CIRCLE_SEGMENTS: u32 = 32;

/// Minimum number of segments for any circular profile.
pub const MIN_CIRCLE_SEGMENTS: u32 = 3;

// =============================================================================
// LIMIT CONSTANTS
// =============================================================================

/// Maximum number of vertices in a single mesh.
///
/// Safety limit to prevent memory exhaustion from extremely fine slicing.
///
/// # Example
///
/// ```rust
/// use config::constants::MAX_VERTICES;
///
/// let vertex_count = 1000;
/// assert!(vertex_count < MAX_VERTICES);
/// ```
pub const MAX_VERTICES: usize = 10_000_000;

/// Maximum slice count accepted for a single extrusion.
pub const MAX_EXTRUDE_SLICES: u32 = 100_000;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Checks if two f64 values are approximately equal within EPSILON.
///
/// # Example
///
/// ```rust
/// use config::constants::approx_equal;
///
/// assert!(approx_equal(1.0, 1.0 + 1e-11));
/// assert!(!approx_equal(1.0, 1.1));
/// ```
#[inline]
pub fn approx_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Checks if a f64 value is approximately zero within EPSILON.
///
/// # Example
///
/// ```rust
/// use config::constants::approx_zero;
///
/// assert!(approx_zero(1e-11));
/// assert!(!approx_zero(0.1));
/// ```
#[inline]
pub fn approx_zero(value: f64) -> bool {
    value.abs() < EPSILON
}
