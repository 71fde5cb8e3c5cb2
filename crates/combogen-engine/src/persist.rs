use tracing::warn;

use combogen_core::{GenerationRecord, GenerationRequest, Item, SelectionSet};
use combogen_store::{Store, StoreResult, UnitOfWork};

use crate::errors::GenerationError;

/// Owns one unit of work and writes a generation into it atomically.
///
/// The unit is released on every path: committed by `persist` on success,
/// rolled back on any failure or by `release`, and discarded by the adapter
/// if the coordinator is dropped.
pub struct PersistenceCoordinator {
    unit: Box<dyn UnitOfWork>,
}

impl PersistenceCoordinator {
    /// Acquire a unit of work from `store`.
    pub async fn open<S>(store: &S) -> Result<Self, GenerationError>
    where
        S: Store + ?Sized,
    {
        let unit = store
            .begin()
            .await
            .map_err(GenerationError::ConnectionFailure)?;
        Ok(Self { unit })
    }

    /// Upsert the item catalog, insert the selection set, then the audit
    /// record, and commit. Any failure rolls the whole unit back.
    pub async fn persist(
        self,
        items: &[Item],
        selections: SelectionSet,
        request: &GenerationRequest,
    ) -> Result<GenerationRecord, GenerationError> {
        let mut unit = self.unit;
        match write_records(unit.as_mut(), items, selections, request).await {
            Ok(record) => {
                unit.commit()
                    .await
                    .map_err(GenerationError::StorageFailure)?;
                Ok(record)
            }
            Err(err) => {
                rollback(unit).await;
                Err(GenerationError::StorageFailure(err))
            }
        }
    }

    /// Give the unit of work back without writing anything.
    pub async fn release(self) {
        rollback(self.unit).await;
    }
}

async fn write_records(
    unit: &mut dyn UnitOfWork,
    items: &[Item],
    selections: SelectionSet,
    request: &GenerationRequest,
) -> StoreResult<GenerationRecord> {
    for item in items {
        unit.upsert_item(item).await?;
    }

    let id = unit.insert_generation(&selections).await?;
    let record = GenerationRecord { id, selections };

    let request_payload = request.to_json()?;
    let response_payload = record.to_json()?;
    unit.insert_audit(id, &request_payload, &response_payload)
        .await?;

    Ok(record)
}

async fn rollback(unit: Box<dyn UnitOfWork>) {
    if let Err(err) = unit.rollback().await {
        warn!(event = "rollback_failed", error = %err);
    }
}
