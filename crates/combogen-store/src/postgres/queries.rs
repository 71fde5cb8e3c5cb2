use serde_json::Value;
use sqlx::{PgConnection, PgPool};

use combogen_core::{GenerationId, Item, SelectionSet};

use crate::errors::{StoreError, StoreResult};

pub async fn upsert_item(conn: &mut PgConnection, item: &Item) -> StoreResult<()> {
    let sequence_number = i32::try_from(item.index)
        .map_err(|_| StoreError::Other(format!("item index out of range: {}", item.name)))?;

    sqlx::query(
        r#"
        insert into items (item_name, prefix_letter, sequence_number)
        values ($1, $2, $3)
        on conflict (item_name) do nothing
        "#,
    )
    .bind(&item.name)
    .bind(item.type_label.to_string())
    .bind(sequence_number)
    .execute(conn)
    .await?;

    Ok(())
}

pub async fn insert_generation(
    conn: &mut PgConnection,
    selections: &SelectionSet,
) -> StoreResult<GenerationId> {
    let data = serde_json::to_value(selections)?;
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        insert into combinations (combination_data)
        values ($1)
        returning id
        "#,
    )
    .bind(data)
    .fetch_one(conn)
    .await?;

    Ok(id)
}

pub async fn insert_audit(
    conn: &mut PgConnection,
    generation_id: GenerationId,
    request: &Value,
    response: &Value,
) -> StoreResult<()> {
    sqlx::query(
        r#"
        insert into responses (combination_id, request_data, response_data)
        values ($1, $2, $3)
        "#,
    )
    .bind(generation_id)
    .bind(request)
    .bind(response)
    .execute(conn)
    .await?;

    Ok(())
}

/// Load a committed selection set by id.
pub async fn fetch_generation(
    pool: &PgPool,
    generation_id: GenerationId,
) -> StoreResult<Option<SelectionSet>> {
    let data = sqlx::query_scalar::<_, Value>(
        r#"
        select combination_data
        from combinations
        where id = $1
        "#,
    )
    .bind(generation_id)
    .fetch_optional(pool)
    .await?;

    match data {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

/// Load the request/response pair recorded for a generation.
pub async fn fetch_audit(
    pool: &PgPool,
    generation_id: GenerationId,
) -> StoreResult<Option<(Value, Value)>> {
    let row = sqlx::query_as::<_, (Value, Value)>(
        r#"
        select request_data, response_data
        from responses
        where combination_id = $1
        "#,
    )
    .bind(generation_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Number of catalog rows stored under `item_name` (0 or 1).
pub async fn count_item(pool: &PgPool, item_name: &str) -> StoreResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        select count(*)
        from items
        where item_name = $1
        "#,
    )
    .bind(item_name)
    .fetch_one(pool)
    .await?;
    Ok(count)
}
