use sqlx::PgPool;
use tracing::info;

use crate::errors::StoreResult;

const SCHEMA_STATEMENTS: &[&str] = &[
    r#"
    create table if not exists items (
      item_name text primary key,
      prefix_letter char(1) not null,
      sequence_number integer not null
    )
    "#,
    r#"
    create table if not exists combinations (
      id bigserial primary key,
      combination_data jsonb not null,
      created_at timestamptz not null default now()
    )
    "#,
    r#"
    create table if not exists responses (
      id bigserial primary key,
      combination_id bigint not null unique references combinations (id),
      request_data jsonb not null,
      response_data jsonb not null,
      created_at timestamptz not null default now()
    )
    "#,
];

/// Create the items, combinations, and responses tables if they are missing.
pub async fn ensure_schema(pool: &PgPool) -> StoreResult<()> {
    for statement in SCHEMA_STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }
    info!(event = "schema_ready", tables = SCHEMA_STATEMENTS.len());
    Ok(())
}
