use std::time::Instant;

use tracing::{info, warn};

use combogen_core::{GenerationRecord, GenerationRequest};
use combogen_store::Store;

use crate::enumerate::enumerate;
use crate::errors::GenerationError;
use crate::expand::{distinct_types, expand};
use crate::persist::PersistenceCoordinator;

/// Entry point for generating and storing selection sets.
#[derive(Debug, Clone)]
pub struct GenerationEngine<S> {
    store: S,
}

impl<S: Store> GenerationEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn run(
        &self,
        counts: &[u32],
        length: usize,
    ) -> Result<GenerationRecord, GenerationError> {
        generate_and_store(&self.store, counts, length).await
    }
}

/// Expand `counts`, enumerate selections of `length`, and persist them.
///
/// The unit of work is acquired before anything else so connection problems
/// surface first. Errors are returned as-is; nothing is retried.
pub async fn generate_and_store<S>(
    store: &S,
    counts: &[u32],
    length: usize,
) -> Result<GenerationRecord, GenerationError>
where
    S: Store + ?Sized,
{
    let start = Instant::now();
    let outcome = generate(store, counts, length).await;

    match &outcome {
        Ok(record) => info!(
            event = "generation_finished",
            engine = store.engine(),
            generation_id = record.id,
            selections = record.selections.len(),
            duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "generated and stored {} combinations",
            record.selections.len()
        ),
        Err(err) => warn!(
            event = "generation_failed",
            engine = store.engine(),
            client_error = err.is_client_error(),
            error = %err
        ),
    }

    outcome
}

async fn generate<S>(
    store: &S,
    counts: &[u32],
    length: usize,
) -> Result<GenerationRecord, GenerationError>
where
    S: Store + ?Sized,
{
    let coordinator = PersistenceCoordinator::open(store).await?;

    let items = expand(counts);
    let distinct = distinct_types(&items);
    if length > distinct {
        coordinator.release().await;
        return Err(GenerationError::UnsatisfiableLength {
            length,
            distinct_types: distinct,
        });
    }

    info!(
        event = "generation_started",
        pools = counts.len(),
        items = items.len(),
        length
    );

    let selections = enumerate(&items, length);
    let request = GenerationRequest::new(counts.to_vec(), length);
    coordinator.persist(&items, selections, &request).await
}
