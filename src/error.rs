//! Error types for rustscholar.
//!
//! Every fallible operation returns `Result<T, ScholarError>`; nothing is
//! retried internally and per-article enrichment failures never surface here.

use thiserror::Error;

/// Main error type for rustscholar operations.
#[derive(Debug, Error)]
pub enum ScholarError {
    /// Query did not have a suitable set of arguments
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// A query argument or setting produced a malformed URL
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Transport failure reported by the fetch capability
    #[error("Network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Response could not be decoded or parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// CAPTCHA detected - Scholar is refusing automated traffic
    #[error("Google Scholar is asking for a CAPTCHA, try again later or from a different IP")]
    Captcha,

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

/// Result type alias using `ScholarError`
pub type Result<T> = std::result::Result<T, ScholarError>;
