use thiserror::Error;

use combogen_store::StoreError;

/// Errors emitted by the generation engine.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// More slots were requested than there are distinct item types.
    #[error("cannot create combinations of length {length} with only {distinct_types} item types")]
    UnsatisfiableLength { length: usize, distinct_types: usize },
    /// The persistence transaction failed and was rolled back.
    #[error("storage failure: {0}")]
    StorageFailure(#[source] StoreError),
    /// No unit of work could be acquired.
    #[error("connection failure: {0}")]
    ConnectionFailure(#[source] StoreError),
}

impl GenerationError {
    /// True when a different request could succeed.
    pub fn is_client_error(&self) -> bool {
        matches!(self, GenerationError::UnsatisfiableLength { .. })
    }
}
