use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};

use combogen_core::{GenerationId, Item, SelectionSet};

use crate::adapter::{Store, UnitOfWork};
use crate::errors::{StoreError, StoreResult};
use crate::options::StoreConfig;

mod queries;
mod schema;

pub use queries::{count_item, fetch_audit, fetch_generation};
pub use schema::ensure_schema;

/// Adapter for PostgreSQL databases.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Build a lazily connecting pool from `config`.
    ///
    /// No connection is opened here; failures surface from `begin`.
    pub fn from_config(config: &StoreConfig) -> StoreResult<Self> {
        let url = config
            .url
            .as_deref()
            .ok_or_else(|| StoreError::Connection("database url is not configured".to_string()))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_lazy(url)
            .map_err(|err| StoreError::Connection(err.to_string()))?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PostgresStore {
    fn engine(&self) -> &'static str {
        "postgres"
    }

    async fn begin(&self) -> StoreResult<Box<dyn UnitOfWork>> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|err| StoreError::Connection(err.to_string()))?;
        Ok(Box::new(PostgresUnitOfWork { tx }))
    }
}

/// Open Postgres transaction. sqlx rolls it back if dropped uncommitted.
struct PostgresUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl UnitOfWork for PostgresUnitOfWork {
    async fn upsert_item(&mut self, item: &Item) -> StoreResult<()> {
        queries::upsert_item(&mut self.tx, item).await
    }

    async fn insert_generation(&mut self, selections: &SelectionSet) -> StoreResult<GenerationId> {
        queries::insert_generation(&mut self.tx, selections).await
    }

    async fn insert_audit(
        &mut self,
        generation_id: GenerationId,
        request: &Value,
        response: &Value,
    ) -> StoreResult<()> {
        queries::insert_audit(&mut self.tx, generation_id, request, response).await
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> StoreResult<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}
