//! # Kernel Registry
//!
//! [`Kernel`] bundles the configuration snapshot and the font library. The
//! host application builds it once at startup and passes it by reference;
//! every entry point goes through it.

use config::KernelConfig;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::geometry::Profile;
use crate::mesh::Mesh;
use crate::ops::heightfield::{mesh_heightfield, HeightGrid, HeightfieldParams};
use crate::ops::loft::{LoftParams, LoftedSolidBuilder};
use crate::text::{mesh_text, FontLibrary, TextRequest};

/// Where a solid's cross-section comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProfileSource {
    /// A caller-supplied profile lofted with explicit parameters.
    Explicit {
        /// The profile.
        profile: Profile,
        /// Loft parameters.
        #[serde(default)]
        params: LoftParams,
    },
    /// Text outlines extruded to the configured glyph height.
    Glyphs(TextRequest),
    /// A height grid meshed as a heightfield solid.
    Grid {
        /// Height samples.
        grid: HeightGrid,
        /// Heightfield parameters.
        #[serde(default)]
        params: HeightfieldParams,
    },
}

/// Configuration and fonts shared by every build.
#[derive(Debug, Clone, Default)]
pub struct Kernel {
    config: KernelConfig,
    fonts: FontLibrary,
}

impl Kernel {
    /// Creates a kernel from its parts.
    pub fn new(config: KernelConfig, fonts: FontLibrary) -> Self {
        Self { config, fonts }
    }

    /// The configuration snapshot.
    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// The font library.
    pub fn fonts(&self) -> &FontLibrary {
        &self.fonts
    }

    /// Mutable access to the font library, for explicit loads and refreshes.
    pub fn fonts_mut(&mut self) -> &mut FontLibrary {
        &mut self.fonts
    }

    /// Builds a mesh from any profile source.
    #[instrument(skip_all)]
    pub fn build(&self, source: &ProfileSource) -> Result<Mesh> {
        match source {
            ProfileSource::Explicit { profile, params } => self.extrude(profile, params),
            ProfileSource::Glyphs(request) => self.mesh_text(request),
            ProfileSource::Grid { grid, params } => self.mesh_heightfield(grid, params),
        }
    }

    /// Lofts a profile.
    pub fn extrude(&self, profile: &Profile, params: &LoftParams) -> Result<Mesh> {
        LoftedSolidBuilder::new(&self.config).extrude(profile, params)
    }

    /// Meshes text with the kernel's font library.
    pub fn mesh_text(&self, request: &TextRequest) -> Result<Mesh> {
        mesh_text(&self.fonts, request, &self.config)
    }

    /// Meshes a height grid.
    pub fn mesh_heightfield(&self, grid: &HeightGrid, params: &HeightfieldParams) -> Result<Mesh> {
        mesh_heightfield(grid, params, &self.config)
    }
}
