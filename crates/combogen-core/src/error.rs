use thiserror::Error;

/// Core error type shared across combogen crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The request violates a shape or size limit.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// A payload could not be encoded.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results returned by combogen crates.
pub type Result<T> = std::result::Result<T, Error>;
