//! Kernel settings snapshot.
//!
//! A `KernelConfig` is built once by the host application and handed to the
//! kernel by reference. There is no process-wide mutable configuration.

use std::fmt;

use crate::constants::{
    DEFAULT_EXTRUDE_SLICES, GLYPH_CURVE_STEPS, GLYPH_EXTRUDE_HEIGHT, MAX_EXTRUDE_SLICES,
    RING_MATCH_TOLERANCE, VERTEX_MERGE_EPSILON,
};

/// Immutable snapshot of kernel settings.
///
/// # Examples
/// ```
/// use config::KernelConfig;
/// let config = KernelConfig::default();
/// assert!(config.tolerance > 0.0);
/// assert_eq!(config.slice_override, None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelConfig {
    /// Tolerance for matching ring points against triangulation vertices.
    pub tolerance: f64,
    /// Distance under which mesh vertices are welded during cleanup.
    pub merge_epsilon: f64,
    /// Slice count used when a call does not specify one and no override is set.
    pub default_slices: u32,
    /// Externally supplied slice count that wins over `default_slices`.
    pub slice_override: Option<u32>,
    /// Fixed extrusion height for glyph meshes.
    pub glyph_height: f64,
    /// Segments per Bézier curve when flattening glyph outlines.
    pub curve_steps: usize,
}

impl KernelConfig {
    /// Builds a configuration enforcing strict validation of every field.
    ///
    /// # Examples
    /// ```
    /// use config::KernelConfig;
    /// let cfg = KernelConfig::new(1.0e-6, 1.0e-8, 24, None).expect("valid config");
    /// assert_eq!(cfg.default_slices, 24);
    /// ```
    pub fn new(
        tolerance: f64,
        merge_epsilon: f64,
        default_slices: u32,
        slice_override: Option<u32>,
    ) -> Result<Self, ConfigError> {
        if tolerance.is_nan() || tolerance <= 0.0 {
            return Err(ConfigError::InvalidTolerance(tolerance));
        }
        if merge_epsilon.is_nan() || merge_epsilon <= 0.0 {
            return Err(ConfigError::InvalidTolerance(merge_epsilon));
        }
        check_slices(default_slices)?;
        if let Some(slices) = slice_override {
            check_slices(slices)?;
        }
        Ok(Self {
            tolerance,
            merge_epsilon,
            default_slices,
            slice_override,
            ..Self::default()
        })
    }

    /// Returns a copy with the given slice override installed.
    pub fn with_slice_override(mut self, slices: Option<u32>) -> Result<Self, ConfigError> {
        if let Some(value) = slices {
            check_slices(value)?;
        }
        self.slice_override = slices;
        Ok(self)
    }

    /// Returns a copy with a different glyph extrusion height.
    pub fn with_glyph_height(mut self, height: f64) -> Result<Self, ConfigError> {
        if !height.is_finite() || height <= 0.0 {
            return Err(ConfigError::InvalidGlyphHeight(height));
        }
        self.glyph_height = height;
        Ok(self)
    }

    /// Resolves the slice count for one extrusion call.
    ///
    /// Order: the explicit request, then `slice_override`, then
    /// `default_slices`.
    ///
    /// # Examples
    /// ```
    /// use config::KernelConfig;
    /// let cfg = KernelConfig::default().with_slice_override(Some(7)).unwrap();
    /// assert_eq!(cfg.resolve_slices(None).unwrap(), 7);
    /// assert_eq!(cfg.resolve_slices(Some(3)).unwrap(), 3);
    /// assert!(cfg.resolve_slices(Some(0)).is_err());
    /// ```
    pub fn resolve_slices(&self, requested: Option<u32>) -> Result<u32, ConfigError> {
        let slices = requested
            .or(self.slice_override)
            .unwrap_or(self.default_slices);
        check_slices(slices)?;
        Ok(slices)
    }
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            tolerance: RING_MATCH_TOLERANCE,
            merge_epsilon: VERTEX_MERGE_EPSILON,
            default_slices: DEFAULT_EXTRUDE_SLICES,
            slice_override: None,
            glyph_height: GLYPH_EXTRUDE_HEIGHT,
            curve_steps: GLYPH_CURVE_STEPS,
        }
    }
}

fn check_slices(slices: u32) -> Result<(), ConfigError> {
    if slices == 0 || slices > MAX_EXTRUDE_SLICES {
        return Err(ConfigError::InvalidSlices(slices));
    }
    Ok(())
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Raised when a tolerance is zero, negative or NaN.
    InvalidTolerance(f64),
    /// Raised when a slice count is zero or above the safety limit.
    InvalidSlices(u32),
    /// Raised when the glyph extrusion height is not positive.
    InvalidGlyphHeight(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTolerance(value) => {
                write!(f, "tolerance must be positive: {value}")
            }
            ConfigError::InvalidSlices(value) => {
                write!(
                    f,
                    "slice count must be in 1..={MAX_EXTRUDE_SLICES}: {value}"
                )
            }
            ConfigError::InvalidGlyphHeight(value) => {
                write!(f, "glyph height must be positive: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
