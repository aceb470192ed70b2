//! # Mesh Operations
//!
//! The algorithms that turn planar input into closed meshes:
//! - **triangulate**: profile interior → `(vertices2D, faces)` via earcut
//! - **loft**: layered extrusion with twist and taper, caps and walls
//! - **heightfield**: two-layer solid from a height grid
//! - **cleanup**: vertex welding and degenerate face removal

pub mod cleanup;
pub mod heightfield;
pub mod loft;
pub mod triangulate;

pub use cleanup::{cleanup, CleanupReport};
pub use heightfield::{mesh_heightfield, HeightGrid, HeightfieldParams, Invert};
pub use loft::{extrude_profile, LoftParams, LoftedSolidBuilder, Scale};
pub use triangulate::{triangulate, Triangulation};
