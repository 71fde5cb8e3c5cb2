use anyhow::{Context, Result, anyhow};
use combogen_core::{Item, TypeLabel};
use combogen_store::postgres::{count_item, fetch_audit, fetch_generation};
use combogen_store::{PostgresStore, Store, StoreConfig, ensure_schema};
use serde_json::json;
use std::env;
use std::time::{SystemTime, UNIX_EPOCH};

const NEEDS_DATABASE: &str = "requires TEST_DATABASE_URL or DATABASE_URL";

fn database_url() -> Result<String> {
    env::var("TEST_DATABASE_URL")
        .or_else(|_| env::var("DATABASE_URL"))
        .context("set TEST_DATABASE_URL or DATABASE_URL for integration tests")
}

async fn connect() -> Result<PostgresStore> {
    let config = StoreConfig {
        url: Some(database_url()?),
        ..StoreConfig::default()
    };
    let store = PostgresStore::from_config(&config).context("building Postgres pool")?;
    ensure_schema(store.pool())
        .await
        .context("creating tables")?;
    Ok(store)
}

fn item(label: usize, index: u32) -> Result<Item> {
    let label = TypeLabel::from_index(label).ok_or_else(|| anyhow!("bad label {label}"))?;
    Ok(Item::new(label, index))
}

/// An item name no other test run has used.
fn fresh_item(label: usize) -> Result<Item> {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("reading clock")?
        .subsec_nanos();
    item(label, 1_000_000_000 + nanos % 1_000_000_000)
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL or DATABASE_URL"]
async fn committed_unit_is_visible() -> Result<()> {
    let store = connect().await.context(NEEDS_DATABASE)?;

    let selections = vec![vec!["A1".to_string(), "B1".to_string()]];
    let mut unit = store.begin().await?;
    unit.upsert_item(&item(0, 1)?).await?;
    unit.upsert_item(&item(1, 1)?).await?;
    let id = unit.insert_generation(&selections).await?;
    let request = json!({ "items": [1, 1], "length": 2 });
    let response = json!({ "id": id, "combination": selections });
    unit.insert_audit(id, &request, &response).await?;
    unit.commit().await?;

    let stored = fetch_generation(store.pool(), id)
        .await?
        .ok_or_else(|| anyhow!("generation {id} missing"))?;
    assert_eq!(stored, selections);

    let (stored_request, stored_response) = fetch_audit(store.pool(), id)
        .await?
        .ok_or_else(|| anyhow!("audit for {id} missing"))?;
    assert_eq!(stored_request, request);
    assert_eq!(stored_response, response);
    assert_eq!(count_item(store.pool(), "A1").await?, 1);

    Ok(())
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL or DATABASE_URL"]
async fn repeated_item_upsert_does_not_duplicate() -> Result<()> {
    let store = connect().await.context(NEEDS_DATABASE)?;
    let item = fresh_item(25)?;

    for _ in 0..2 {
        let mut unit = store.begin().await?;
        unit.upsert_item(&item).await?;
        unit.upsert_item(&item).await?;
        unit.commit().await?;
    }

    assert_eq!(count_item(store.pool(), &item.name).await?, 1);
    Ok(())
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL or DATABASE_URL"]
async fn rollback_discards_catalog_and_generation() -> Result<()> {
    let store = connect().await.context(NEEDS_DATABASE)?;
    let item = fresh_item(24)?;

    let mut unit = store.begin().await?;
    unit.upsert_item(&item).await?;
    let id = unit
        .insert_generation(&vec![vec![item.name.clone()]])
        .await?;
    unit.rollback().await?;

    assert_eq!(count_item(store.pool(), &item.name).await?, 0);
    assert!(fetch_generation(store.pool(), id).await?.is_none());
    assert!(fetch_audit(store.pool(), id).await?.is_none());
    Ok(())
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL or DATABASE_URL"]
async fn dropped_unit_discards_catalog_and_generation() -> Result<()> {
    let store = connect().await.context(NEEDS_DATABASE)?;
    let item = fresh_item(23)?;

    let id = {
        let mut unit = store.begin().await?;
        unit.upsert_item(&item).await?;
        unit.insert_generation(&vec![vec![item.name.clone()]])
            .await?
    };

    assert_eq!(count_item(store.pool(), &item.name).await?, 0);
    assert!(fetch_generation(store.pool(), id).await?.is_none());
    Ok(())
}
