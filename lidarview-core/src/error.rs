//! Error types for lidarview

use thiserror::Error;

/// Main error type for lidarview operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Degenerate transform: {0}")]
    DegenerateTransform(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for lidarview operations
pub type Result<T> = std::result::Result<T, Error>;
