//! # Lofted Solid Builder
//!
//! The generic "extrude a profile" operation: stacks transformed copies of a
//! profile's triangulation along Z and stitches them into a closed solid.
//!
//! ## Pipeline
//!
//! ```text
//! Profile (normalized) → triangulate → map ring indices
//!       → layer stack → bottom/top caps + walls → cleanup → Mesh
//! ```
//!
//! Every text and explicit-profile solid goes through [`LoftedSolidBuilder`];
//! the heightfield builder reuses [`caps`] and [`walls`] with its own grid
//! triangulation.

pub mod caps;
pub mod layers;
pub mod ring_index;
pub mod walls;


use config::KernelConfig;
use glam::DVec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use self::caps::{bottom_cap, top_cap};
use self::layers::{build_layers, layer_vertices};
use self::ring_index::map_ring_indices;
use self::walls::stitch_walls;
use super::cleanup::cleanup;
use super::triangulate::triangulate;
use crate::error::{KernelError, Result};
use crate::geometry::Profile;
use crate::mesh::Mesh;

/// Final scale reached at the top of a loft.
///
/// Deserializes from either a number or a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scale {
    /// Same factor on both axes.
    Uniform(f64),
    /// Separate `(x, y)` factors.
    Axes(f64, f64),
}

impl Scale {
    /// Returns the `(sx, sy)` factors.
    pub fn factors(&self) -> (f64, f64) {
        match *self {
            Scale::Uniform(s) => (s, s),
            Scale::Axes(sx, sy) => (sx, sy),
        }
    }

    /// Returns the factors, rejecting negative or non-finite values.
    pub fn validated(&self) -> Result<(f64, f64)> {
        let (sx, sy) = self.factors();
        for value in [sx, sy] {
            if !value.is_finite() || value < 0.0 {
                return Err(KernelError::configuration(format!(
                    "scale factors must be finite and non-negative, got {value}"
                )));
            }
        }
        Ok((sx, sy))
    }
}

impl Default for Scale {
    fn default() -> Self {
        Scale::Uniform(1.0)
    }
}

impl From<f64> for Scale {
    fn from(s: f64) -> Self {
        Scale::Uniform(s)
    }
}

impl From<(f64, f64)> for Scale {
    fn from((sx, sy): (f64, f64)) -> Self {
        Scale::Axes(sx, sy)
    }
}

/// Parameters for one lofted extrusion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoftParams {
    /// Total extrusion height, must be positive.
    pub height: f64,
    /// Center the solid around `z = 0`.
    pub center: bool,
    /// Total rotation in degrees reached at the top.
    pub twist: f64,
    /// Slice count. `None` defers to the kernel configuration.
    pub slices: Option<u32>,
    /// Final scale reached at the top.
    pub scale: Scale,
}

impl Default for LoftParams {
    fn default() -> Self {
        Self {
            height: 1.0,
            center: false,
            twist: 0.0,
            slices: None,
            scale: Scale::default(),
        }
    }
}

impl LoftParams {
    /// Parameters for a plain extrusion of the given height.
    pub fn with_height(height: f64) -> Self {
        Self {
            height,
            ..Self::default()
        }
    }
}

/// Lofts profiles into closed meshes.
///
/// Holds a borrowed [`KernelConfig`]; construct one per call site or keep it
/// next to the configuration.
#[derive(Debug, Clone, Copy)]
pub struct LoftedSolidBuilder<'a> {
    config: &'a KernelConfig,
}

impl<'a> LoftedSolidBuilder<'a> {
    /// Creates a builder over the given configuration.
    pub fn new(config: &'a KernelConfig) -> Self {
        Self { config }
    }

    /// Extrudes one profile and cleans up the result.
    ///
    /// # Example
    ///
    /// ```rust
    /// use config::KernelConfig;
    /// use solid_kernel::geometry::shapes::rectangle;
    /// use solid_kernel::ops::{LoftParams, LoftedSolidBuilder};
    ///
    /// let config = KernelConfig::default();
    /// let square = rectangle(2.0, 2.0, true).unwrap();
    /// let params = LoftParams { height: 5.0, slices: Some(1), ..Default::default() };
    /// let mesh = LoftedSolidBuilder::new(&config).extrude(&square, &params).unwrap();
    /// assert!(mesh.is_closed_manifold());
    /// ```
    #[instrument(skip_all, fields(points = profile.point_count(), holes = profile.holes().len()))]
    pub fn extrude(&self, profile: &Profile, params: &LoftParams) -> Result<Mesh> {
        let mesh = self.loft(profile, params)?;
        Ok(self.finish(mesh))
    }

    /// Converts a raw point list into a profile and extrudes it.
    pub fn extrude_points(&self, points: Vec<DVec2>, params: &LoftParams) -> Result<Mesh> {
        let profile = Profile::from_points(points)?;
        self.extrude(&profile, params)
    }

    /// Extrudes several profiles with the same parameters into one mesh.
    ///
    /// An empty slice yields an empty mesh.
    #[instrument(skip_all, fields(profiles = profiles.len()))]
    pub fn extrude_all(&self, profiles: &[Profile], params: &LoftParams) -> Result<Mesh> {
        let mut merged = Mesh::new();
        for profile in profiles {
            merged.merge(&self.loft(profile, params)?);
        }
        Ok(self.finish(merged))
    }

    /// Builds the raw lofted buffers without cleanup.
    fn loft(&self, profile: &Profile, params: &LoftParams) -> Result<Mesh> {
        if !params.height.is_finite() || params.height <= 0.0 {
            return Err(KernelError::configuration(format!(
                "extrusion height must be positive, got {}",
                params.height
            )));
        }
        if !params.twist.is_finite() {
            return Err(KernelError::configuration("twist angle must be finite"));
        }
        let scale = params.scale.validated()?;
        let slices = self.config.resolve_slices(params.slices)?;

        let triangulation = triangulate(profile)?;
        let rings = map_ring_indices(&triangulation.vertices, profile, self.config.tolerance)?;
        let pivot = profile.centroid();

        let layers = build_layers(params.height, params.center, slices, params.twist, scale);
        let vertices = layer_vertices(&layers, &triangulation.vertices, pivot);

        let block = triangulation.vertex_count();
        let top = (layers.len() - 1) * block;

        let mut triangles = bottom_cap(&triangulation.faces, 0);
        triangles.extend(top_cap(&triangulation.faces, top));
        triangles.extend(stitch_walls(&rings, block, layers.len()));

        debug!(
            slices,
            layers = layers.len(),
            vertices = vertices.len(),
            triangles = triangles.len(),
            "lofted profile"
        );

        Ok(Mesh::from_parts(vertices, triangles))
    }

    fn finish(&self, mesh: Mesh) -> Mesh {
        let (mesh, report) = cleanup(mesh, self.config.merge_epsilon);
        debug!(?report, "cleaned lofted mesh");
        mesh
    }
}

/// Extrudes a profile with the given configuration.
///
/// Shorthand for `LoftedSolidBuilder::new(config).extrude(profile, params)`.
pub fn extrude_profile(profile: &Profile, params: &LoftParams, config: &KernelConfig) -> Result<Mesh> {
    LoftedSolidBuilder::new(config).extrude(profile, params)
}
