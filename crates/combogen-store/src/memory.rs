use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;

use combogen_core::{GenerationId, Item, SelectionSet, TypeLabel};

use crate::adapter::{Store, UnitOfWork};
use crate::errors::{StoreError, StoreResult};

/// Step at which a `MemoryStore` can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    Begin,
    UpsertItem,
    InsertGeneration,
    InsertAudit,
    Commit,
}

impl fmt::Display for FailPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailPoint::Begin => "begin",
            FailPoint::UpsertItem => "upsert_item",
            FailPoint::InsertGeneration => "insert_generation",
            FailPoint::InsertAudit => "insert_audit",
            FailPoint::Commit => "commit",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredItem {
    pub type_label: TypeLabel,
    pub index: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuditRow {
    pub request: Value,
    pub response: Value,
}

/// Committed contents of a `MemoryStore`.
#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    pub items: BTreeMap<String, StoredItem>,
    pub generations: BTreeMap<GenerationId, SelectionSet>,
    pub audits: BTreeMap<GenerationId, AuditRow>,
}

#[derive(Debug, Default)]
struct Shared {
    state: Mutex<MemoryState>,
    next_id: Mutex<GenerationId>,
    open_units: AtomicUsize,
}

/// Transactional in-memory store used by tests and local runs.
///
/// Writes are staged per unit of work and applied on commit. Ids are drawn
/// from a shared sequence that, like a database sequence, is not rolled back.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    shared: Arc<Shared>,
    fail_point: Option<FailPoint>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle over the same tables that fails at `point`.
    pub fn failing_at(&self, point: FailPoint) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            fail_point: Some(point),
        }
    }

    pub fn snapshot(&self) -> StoreResult<MemoryState> {
        Ok(lock(&self.shared.state)?.clone())
    }

    /// Units of work begun and not yet committed, rolled back, or dropped.
    pub fn open_units(&self) -> usize {
        self.shared.open_units.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn engine(&self) -> &'static str {
        "memory"
    }

    async fn begin(&self) -> StoreResult<Box<dyn UnitOfWork>> {
        if self.fail_point == Some(FailPoint::Begin) {
            return Err(StoreError::Connection(format!(
                "injected failure at {}",
                FailPoint::Begin
            )));
        }
        self.shared.open_units.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryUnitOfWork {
            shared: Arc::clone(&self.shared),
            fail_point: self.fail_point,
            staged: MemoryState::default(),
        }))
    }
}

struct MemoryUnitOfWork {
    shared: Arc<Shared>,
    fail_point: Option<FailPoint>,
    staged: MemoryState,
}

impl MemoryUnitOfWork {
    fn check(&self, point: FailPoint) -> StoreResult<()> {
        if self.fail_point == Some(point) {
            return Err(StoreError::Injected(point));
        }
        Ok(())
    }
}

impl Drop for MemoryUnitOfWork {
    fn drop(&mut self) {
        self.shared.open_units.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn upsert_item(&mut self, item: &Item) -> StoreResult<()> {
        self.check(FailPoint::UpsertItem)?;
        self.staged
            .items
            .entry(item.name.clone())
            .or_insert_with(|| StoredItem {
                type_label: item.type_label,
                index: item.index,
            });
        Ok(())
    }

    async fn insert_generation(&mut self, selections: &SelectionSet) -> StoreResult<GenerationId> {
        self.check(FailPoint::InsertGeneration)?;
        let id = {
            let mut next_id = lock(&self.shared.next_id)?;
            *next_id += 1;
            *next_id
        };
        self.staged.generations.insert(id, selections.clone());
        Ok(id)
    }

    async fn insert_audit(
        &mut self,
        generation_id: GenerationId,
        request: &Value,
        response: &Value,
    ) -> StoreResult<()> {
        self.check(FailPoint::InsertAudit)?;
        if !self.staged.generations.contains_key(&generation_id) {
            return Err(StoreError::Other(format!(
                "audit references unknown generation {generation_id}"
            )));
        }
        if self.staged.audits.contains_key(&generation_id) {
            return Err(StoreError::Other(format!(
                "duplicate audit for generation {generation_id}"
            )));
        }
        self.staged.audits.insert(
            generation_id,
            AuditRow {
                request: request.clone(),
                response: response.clone(),
            },
        );
        Ok(())
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.check(FailPoint::Commit)?;
        let mut unit = self;
        let staged = std::mem::take(&mut unit.staged);
        let mut state = lock(&unit.shared.state)?;
        for (name, item) in staged.items {
            state.items.entry(name).or_insert(item);
        }
        state.generations.extend(staged.generations);
        state.audits.extend(staged.audits);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> StoreResult<()> {
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> StoreResult<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| StoreError::Other("memory store lock poisoned".to_string()))
}
