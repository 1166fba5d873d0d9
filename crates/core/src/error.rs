//! Error types for wfb-core (WASM-compatible)

use thiserror::Error;

/// Result type alias for wfb-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that work in both native and WASM environments
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unexpected payload shape: {0}")]
    Shape(String),

    #[error("Malformed markdown table at row {row}: {reason}")]
    Markdown { row: usize, reason: String },

    #[error("Invalid commit date '{date}' for revision {sha}")]
    Date { sha: String, date: String },

    #[error("Failed to read file: {path}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}
