//! Error types for contouring.

use projection::ProjectionError;
use thiserror::Error;

/// Errors that can occur while validating input or configuration.
///
/// Degenerate input (tiny grids, no levels, flat fields) is not an error;
/// it produces empty results.
#[derive(Error, Debug)]
pub enum ContourError {
    /// Data length or coordinate lengths do not match.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// A coordinate axis is not strictly monotonic.
    #[error("{axis} axis is not strictly monotonic at index {index}")]
    NotMonotonic { axis: &'static str, index: usize },

    /// A coordinate or level value was not usable.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    InvalidConfig(String),

    /// Projection error while mapping coordinates.
    #[error(transparent)]
    Projection(#[from] ProjectionError),
}

impl ContourError {
    /// Create a ShapeMismatch error.
    pub fn shape_mismatch(msg: impl Into<String>) -> Self {
        Self::ShapeMismatch(msg.into())
    }

    /// Create an InvalidValue error.
    pub fn invalid_value(msg: impl Into<String>) -> Self {
        Self::InvalidValue(msg.into())
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

/// Result type for contour operations.
pub type Result<T> = std::result::Result<T, ContourError>;
