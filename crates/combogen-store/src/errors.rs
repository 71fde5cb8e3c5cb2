use thiserror::Error;

use crate::memory::FailPoint;

/// Errors raised by storage adapters.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A connection or transaction could not be acquired.
    #[error("connection error: {0}")]
    Connection(String),
    #[error("query error: {0}")]
    Query(#[from] sqlx::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// A request or response payload could not be encoded.
    #[error("payload error: {0}")]
    Payload(#[from] combogen_core::Error),
    /// Failure forced by a configured fail point.
    #[error("injected failure at {0}")]
    Injected(FailPoint),
    #[error("store error: {0}")]
    Other(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
