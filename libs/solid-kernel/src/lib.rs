//! # Solid Kernel
//!
//! Generative solid modeling: turns planar descriptions into watertight
//! triangle meshes.
//!
//! ## Architecture
//!
//! ```text
//! Profile ─────────────┐
//! text ─→ glyph loops ─┼─→ triangulate → layers → caps + walls ─┐
//!                      │                                        ├─→ cleanup → Mesh
//! height grid ─────────┴─→ grid faces + perimeter ring ─────────┘
//! ```
//!
//! Every operation is a pure function of its inputs. Configuration and
//! fonts live in a [`Kernel`] the host application builds once.
//!
//! ## Usage
//!
//! ```rust
//! use solid_kernel::geometry::shapes::rectangle;
//! use solid_kernel::{Kernel, LoftParams};
//!
//! let kernel = Kernel::default();
//! let square = rectangle(10.0, 10.0, true).unwrap();
//! let params = LoftParams { height: 20.0, twist: 90.0, slices: Some(8), ..Default::default() };
//! let mesh = kernel.extrude(&square, &params).unwrap();
//! assert!(mesh.is_closed_manifold());
//! ```

pub mod error;
pub mod geometry;
pub mod kernel;
pub mod mesh;
pub mod ops;
pub mod text;

pub use config::KernelConfig;
pub use error::{KernelError, Result};
pub use geometry::{normalize, Profile, Ring};
pub use kernel::{Kernel, ProfileSource};
pub use mesh::Mesh;
pub use ops::{
    extrude_profile, mesh_heightfield, HeightGrid, HeightfieldParams, Invert, LoftParams,
    LoftedSolidBuilder, Scale,
};
pub use text::{mesh_text, Direction, FontLibrary, HAlign, TextParams, TextRequest, VAlign};
