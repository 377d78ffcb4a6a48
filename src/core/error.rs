//! Error types for the road generator

use thiserror::Error;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    /// A generated segment had a non-positive or non-finite length
    #[error("degenerate segment: length {length} must be finite and > 0")]
    DegenerateSegment { length: f64 },

    /// A generated segment bent harder than the configured bound
    #[error("curvature {curvature} outside [-{max}, {max}]")]
    CurvatureOutOfRange { curvature: f64, max: f64 },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
