//! # Text Meshes
//!
//! Turns a string into extruded glyph solids.
//!
//! ```text
//! text + TextParams
//!       ↓  GlyphOutliner (font lookup, layout, curve flattening)
//! outline loops
//!       ↓  assemble (containment toggle rule)
//! profiles
//!       ↓  LoftedSolidBuilder (fixed glyph height)
//! Mesh
//! ```

pub mod assemble;
pub mod font;
pub mod layout;


use std::fmt;
use std::str::FromStr;

use config::KernelConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{KernelError, Result};
use crate::geometry::Ring;
use crate::mesh::Mesh;
use crate::ops::{LoftParams, LoftedSolidBuilder};

pub use assemble::{assemble_loops, assemble_profiles, GlyphCluster};
pub use font::{FontFace, FontLibrary};
pub use layout::{layout_text, FontMetrics, GlyphOutline, GlyphSource};

/// Horizontal alignment of the text's advance box against `x = 0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HAlign {
    /// Box starts at `x = 0` (left).
    #[default]
    Leading,
    /// Box centered on `x = 0`.
    Center,
    /// Box ends at `x = 0` (right).
    Trailing,
}

impl FromStr for HAlign {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "leading" | "left" => Ok(HAlign::Leading),
            "center" => Ok(HAlign::Center),
            "trailing" | "right" => Ok(HAlign::Trailing),
            other => Err(KernelError::configuration(format!(
                "unknown horizontal alignment '{other}'"
            ))),
        }
    }
}

/// Vertical alignment against `y = 0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VAlign {
    /// Baseline at `y = 0`.
    #[default]
    Baseline,
    /// Ascender line at `y = 0`.
    Top,
    /// Descender line at `y = 0`.
    Bottom,
    /// Midpoint of ascender and descender at `y = 0`.
    Center,
}

impl FromStr for VAlign {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "baseline" => Ok(VAlign::Baseline),
            "top" => Ok(VAlign::Top),
            "bottom" => Ok(VAlign::Bottom),
            "center" => Ok(VAlign::Center),
            other => Err(KernelError::configuration(format!(
                "unknown vertical alignment '{other}'"
            ))),
        }
    }
}

/// Reading direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Left to right.
    #[default]
    Ltr,
    /// Right to left.
    Rtl,
}

impl FromStr for Direction {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ltr" => Ok(Direction::Ltr),
            "rtl" => Ok(Direction::Rtl),
            other => Err(KernelError::configuration(format!(
                "unknown text direction '{other}', expected 'ltr' or 'rtl'"
            ))),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        })
    }
}

/// Font selection and layout for one string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextParams {
    /// Font family selector; `None` uses the library default.
    pub font: Option<String>,
    /// Em size in model units.
    pub size: f64,
    /// Horizontal alignment.
    pub halign: HAlign,
    /// Vertical alignment.
    pub valign: VAlign,
    /// Reading direction.
    pub direction: Direction,
}

impl Default for TextParams {
    fn default() -> Self {
        Self {
            font: None,
            size: 10.0,
            halign: HAlign::default(),
            valign: VAlign::default(),
            direction: Direction::default(),
        }
    }
}

/// A string to mesh and how to lay it out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRequest {
    /// The text; control characters are ignored.
    pub text: String,
    /// Layout parameters.
    #[serde(default)]
    pub params: TextParams,
}

impl TextRequest {
    /// Request with default parameters.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: TextParams::default(),
        }
    }
}

/// Produces positioned outline loops for a string.
///
/// Implemented by [`FontLibrary`]; tests supply their own outliners.
pub trait GlyphOutliner {
    /// Outline loops for `text`, already scaled, aligned and flattened with
    /// `curve_steps` segments per curve.
    fn outline(&self, text: &str, params: &TextParams, curve_steps: usize) -> Result<Vec<Ring>>;
}

/// Meshes a string as glyph solids of the configured glyph height.
///
/// Empty or whitespace-only text yields an empty mesh.
///
/// # Errors
///
/// `Configuration` for a non-positive size, `Resource` if the outliner has
/// no font at all.
#[instrument(skip_all, fields(chars = request.text.chars().count()))]
pub fn mesh_text(
    outliner: &dyn GlyphOutliner,
    request: &TextRequest,
    config: &KernelConfig,
) -> Result<Mesh> {
    let params = &request.params;
    if !params.size.is_finite() || params.size <= 0.0 {
        return Err(KernelError::configuration(format!(
            "text size must be positive, got {}",
            params.size
        )));
    }
    if request.text.trim().is_empty() {
        return Ok(Mesh::new());
    }

    let loops = outliner.outline(&request.text, params, config.curve_steps)?;
    let profiles = assemble_profiles(&loops);
    debug!(
        loops = loops.len(),
        profiles = profiles.len(),
        "assembled glyph outlines"
    );

    let loft = LoftParams {
        height: config.glyph_height,
        slices: Some(1),
        ..LoftParams::default()
    };
    LoftedSolidBuilder::new(config).extrude_all(&profiles, &loft)
}
