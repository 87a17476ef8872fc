//! Error types for contour extraction.

use thiserror::Error;

/// Errors that can occur before or around contour extraction.
///
/// Geometric degeneracies are never reported here; they are resolved per
/// triangle by the configured [`DegeneratePolicy`](crate::DegeneratePolicy).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContourError {
    /// A configuration value is out of its legal range.
    #[error("invalid value for '{param}': {message}")]
    InvalidConfig { param: String, message: String },

    /// The TIN contains a NaN or infinite coordinate.
    #[error("triangle {triangle} vertex {vertex} has a non-finite coordinate")]
    NonFiniteVertex { triangle: usize, vertex: usize },

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// Input or output JSON was malformed.
    #[error("JSON error: {0}")]
    Json(String),
}

impl ContourError {
    /// Create an InvalidConfig error.
    pub fn invalid_config(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Whether the error was caused by the caller's parameters rather than
    /// the input data.
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::InvalidConfig { .. })
    }
}

impl From<std::io::Error> for ContourError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ContourError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type for contour operations.
pub type Result<T> = std::result::Result<T, ContourError>;
