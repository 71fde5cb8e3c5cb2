//! Storage adapters for generated catalogs, selection sets, and audit records.

pub mod adapter;
pub mod errors;
pub mod memory;
pub mod options;
pub mod postgres;

pub use adapter::{Store, UnitOfWork};
pub use errors::{StoreError, StoreResult};
pub use memory::{AuditRow, FailPoint, MemoryState, MemoryStore, StoredItem};
pub use options::StoreConfig;
pub use postgres::{PostgresStore, ensure_schema};
