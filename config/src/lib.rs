//! # Config Crate
//!
//! Centralized configuration for the solid modeling kernel. All tolerances,
//! default slice counts and glyph parameters live here so the kernel crates
//! never scatter literals.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{EPSILON, DEFAULT_EXTRUDE_SLICES};
//! use config::KernelConfig;
//!
//! let value: f64 = 0.00000000001; // 1e-11, smaller than EPSILON (1e-10)
//! assert!(value.abs() < EPSILON);
//!
//! let cfg = KernelConfig::default();
//! assert_eq!(cfg.resolve_slices(None).unwrap(), DEFAULT_EXTRUDE_SLICES);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Explicit Lifetime**: `KernelConfig` is built once and passed by reference
//! - **Validated**: invalid settings are rejected at construction time

pub mod constants;
pub mod settings;

pub use settings::{ConfigError, KernelConfig};
