use async_trait::async_trait;
use serde_json::Value;

use combogen_core::{GenerationId, Item, SelectionSet};

use crate::errors::StoreResult;

/// Trait implemented by storage engines that can open units of work.
#[async_trait]
pub trait Store: Send + Sync {
    /// Returns the engine identifier (e.g. `postgres`).
    fn engine(&self) -> &'static str;

    /// Acquire a connection and open a transaction on it.
    async fn begin(&self) -> StoreResult<Box<dyn UnitOfWork>>;
}

/// A single transaction. Dropping it without `commit` discards every write.
#[async_trait]
pub trait UnitOfWork: Send {
    /// Record an item identity; a known item name is a no-op.
    async fn upsert_item(&mut self, item: &Item) -> StoreResult<()>;

    /// Store a selection set and return the id assigned by the engine.
    async fn insert_generation(&mut self, selections: &SelectionSet) -> StoreResult<GenerationId>;

    async fn insert_audit(
        &mut self,
        generation_id: GenerationId,
        request: &Value,
        response: &Value,
    ) -> StoreResult<()>;

    async fn commit(self: Box<Self>) -> StoreResult<()>;

    async fn rollback(self: Box<Self>) -> StoreResult<()>;
}
