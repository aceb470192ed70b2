//! # Kernel Errors
//!
//! Error types for solid construction.
//!
//! Three categories exist:
//! - **Configuration**: a parameter is out of range or an enum string is unknown
//! - **Geometry**: the input shape is invalid and could not be repaired
//! - **Resource**: a font or other resource is unavailable and no fallback exists

use config::ConfigError;
use thiserror::Error;

/// Errors that can occur while building a mesh.
#[derive(Debug, Error)]
pub enum KernelError {
    /// Bad parameter (non-positive height, unknown alignment, zero slices, ...)
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Invalid or degenerate geometry
    #[error("Geometry error: {message}")]
    Geometry { message: String },

    /// Requested resource unavailable and no default to fall back to
    #[error("Resource error: {message}")]
    Resource { message: String },
}

impl KernelError {
    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a geometry error.
    pub fn geometry(message: impl Into<String>) -> Self {
        Self::Geometry {
            message: message.into(),
        }
    }

    /// Creates a resource error.
    pub fn resource(message: impl Into<String>) -> Self {
        Self::Resource {
            message: message.into(),
        }
    }

    /// Returns true for configuration errors.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    /// Returns true for geometry errors.
    pub fn is_geometry(&self) -> bool {
        matches!(self, Self::Geometry { .. })
    }

    /// Returns true for resource errors.
    pub fn is_resource(&self) -> bool {
        matches!(self, Self::Resource { .. })
    }
}

impl From<ConfigError> for KernelError {
    fn from(err: ConfigError) -> Self {
        Self::configuration(err.to_string())
    }
}

/// Result alias used throughout the kernel.
pub type Result<T> = std::result::Result<T, KernelError>;
