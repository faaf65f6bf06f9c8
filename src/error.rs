//! Error types for colored-regions

use thiserror::Error;

/// Result type alias for colored-regions operations
pub type Result<T> = std::result::Result<T, RegionError>;

/// Errors raised outside the scanner itself
///
/// Scanning is total; these only surface from settings files and the CLI.
#[derive(Error, Debug)]
pub enum RegionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{0}")]
    Message(String),
}
