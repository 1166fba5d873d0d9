//! Error types for the wfb CLI (native-only errors)

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// CLI-specific error types (includes native dependencies)
#[derive(Error, Debug)]
pub enum Error {
    #[error("Core error: {0}")]
    Core(#[from] wfb_core::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("HTTP error: {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Invalid header value: {0}")]
    Header(String),

    #[error("Expected a {expected} payload, found the {found} feed")]
    Feed {
        expected: &'static str,
        found: &'static str,
    },
}
