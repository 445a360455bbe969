//! Error types for projection operations.

use thiserror::Error;

/// Errors raised by projection setup and forward/inverse transforms.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    /// The point lies outside the mathematical domain of the projection
    /// (pole singularity, far hemisphere, outside the cone, ...).
    #[error("{projection}: point outside projection domain: {message}")]
    Domain {
        projection: &'static str,
        message: String,
    },

    /// A coordinate value was not usable (NaN, infinite).
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// An iterative solver failed to converge.
    #[error("{projection}: {solver} did not converge")]
    NonConvergent {
        projection: &'static str,
        solver: &'static str,
    },

    /// The projection has no inverse formula.
    #[error("projection {0} has no inverse")]
    NoInverse(&'static str),

    /// A construction parameter was out of range.
    #[error("invalid parameter '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    /// Unknown projection or ellipsoid name.
    #[error("unsupported: {0}")]
    Unsupported(String),
}

impl ProjectionError {
    /// Create a Domain error.
    pub fn domain(projection: &'static str, message: impl Into<String>) -> Self {
        Self::Domain {
            projection,
            message: message.into(),
        }
    }

    /// Create an InvalidValue error.
    pub fn invalid_value(msg: impl Into<String>) -> Self {
        Self::InvalidValue(msg.into())
    }

    /// Create an InvalidParameter error.
    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Create a NonConvergent error.
    pub fn non_convergent(projection: &'static str, solver: &'static str) -> Self {
        Self::NonConvergent { projection, solver }
    }
}

/// Result type for projection operations.
pub type Result<T> = std::result::Result<T, ProjectionError>;
