use combogen_engine::{GenerationEngine, GenerationError, generate_and_store};
use combogen_store::{FailPoint, MemoryStore, StoreError};
use serde_json::json;

fn selection(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

#[tokio::test]
async fn stores_catalog_selections_and_audit() {
    let store = MemoryStore::new();
    let engine = GenerationEngine::new(store.clone());

    let record = engine.run(&[1, 2, 1], 2).await.expect("run generation");

    let expected = vec![
        selection(&["A1", "B1"]),
        selection(&["A1", "B2"]),
        selection(&["A1", "C1"]),
        selection(&["B1", "C1"]),
        selection(&["B2", "C1"]),
    ];
    assert_eq!(record.selections, expected);

    let state = store.snapshot().expect("snapshot");
    let item_names: Vec<&str> = state.items.keys().map(String::as_str).collect();
    assert_eq!(item_names, vec!["A1", "B1", "B2", "C1"]);
    assert_eq!(state.items["B2"].index, 2);
    assert_eq!(state.generations.get(&record.id), Some(&expected));

    let audit = state.audits.get(&record.id).expect("audit row");
    assert_eq!(audit.request, json!({ "items": [1, 2, 1], "length": 2 }));
    assert_eq!(
        audit.response,
        json!({ "id": record.id, "combination": expected })
    );
    assert_eq!(store.open_units(), 0);
}

#[tokio::test]
async fn single_pool_yields_one_selection_per_item() {
    let store = MemoryStore::new();
    let record = generate_and_store(&store, &[3], 1)
        .await
        .expect("run generation");

    assert_eq!(
        record.selections,
        vec![selection(&["A1"]), selection(&["A2"]), selection(&["A3"])]
    );
}

#[tokio::test]
async fn length_beyond_distinct_types_is_unsatisfiable() {
    let store = MemoryStore::new();
    let err = generate_and_store(&store, &[1, 1], 3)
        .await
        .expect_err("length 3 with two types");

    assert!(matches!(
        err,
        GenerationError::UnsatisfiableLength {
            length: 3,
            distinct_types: 2
        }
    ));
    assert!(err.is_client_error());

    let state = store.snapshot().expect("snapshot");
    assert!(state.items.is_empty());
    assert!(state.generations.is_empty());
    assert!(state.audits.is_empty());
    assert_eq!(store.open_units(), 0);
}

#[tokio::test]
async fn many_items_in_one_pool_still_need_distinct_types() {
    let store = MemoryStore::new();
    let err = generate_and_store(&store, &[5], 2)
        .await
        .expect_err("one pool cannot fill two slots");
    assert!(matches!(err, GenerationError::UnsatisfiableLength { .. }));
}

#[tokio::test]
async fn repeated_requests_share_item_identities() {
    let store = MemoryStore::new();
    let engine = GenerationEngine::new(store.clone());

    let first = engine.run(&[1, 2, 1], 2).await.expect("first run");
    let second = engine.run(&[1, 2, 1], 2).await.expect("second run");

    assert_ne!(first.id, second.id);
    assert_eq!(first.selections, second.selections);

    let state = store.snapshot().expect("snapshot");
    assert_eq!(state.items.len(), 4);
    assert_eq!(state.generations.len(), 2);
    assert_eq!(state.audits.len(), 2);
}

#[tokio::test]
async fn audit_failure_rolls_back_everything() {
    let store = MemoryStore::new();
    let failing = store.failing_at(FailPoint::InsertAudit);

    let err = generate_and_store(&failing, &[1, 2, 1], 2)
        .await
        .expect_err("audit insert should fail");

    assert!(matches!(
        err,
        GenerationError::StorageFailure(StoreError::Injected(FailPoint::InsertAudit))
    ));
    assert!(!err.is_client_error());

    let state = store.snapshot().expect("snapshot");
    assert!(state.items.is_empty());
    assert!(state.generations.is_empty());
    assert!(state.audits.is_empty());
    assert_eq!(store.open_units(), 0);
}

#[tokio::test]
async fn failures_at_each_write_step_are_storage_failures() {
    for point in [
        FailPoint::UpsertItem,
        FailPoint::InsertGeneration,
        FailPoint::Commit,
    ] {
        let store = MemoryStore::new();
        let err = generate_and_store(&store.failing_at(point), &[2, 2], 2)
            .await
            .expect_err("write step should fail");

        assert!(
            matches!(err, GenerationError::StorageFailure(_)),
            "unexpected error at {point}: {err}"
        );
        let state = store.snapshot().expect("snapshot");
        assert!(state.items.is_empty(), "items leaked at {point}");
        assert!(state.generations.is_empty(), "generation leaked at {point}");
        assert_eq!(store.open_units(), 0);
    }
}

#[tokio::test]
async fn unavailable_store_is_a_connection_failure() {
    let store = MemoryStore::new().failing_at(FailPoint::Begin);
    let err = generate_and_store(&store, &[1, 1], 3)
        .await
        .expect_err("begin should fail");

    // Connection problems win over input problems.
    assert!(matches!(err, GenerationError::ConnectionFailure(_)));
    assert!(!err.is_client_error());
}

#[tokio::test]
async fn failed_attempt_does_not_block_later_success() {
    let store = MemoryStore::new();
    generate_and_store(&store.failing_at(FailPoint::InsertAudit), &[1, 1], 2)
        .await
        .expect_err("first attempt fails");

    let record = generate_and_store(&store, &[1, 1], 2)
        .await
        .expect("second attempt succeeds");

    assert_eq!(record.selections, vec![selection(&["A1", "B1"])]);
    let state = store.snapshot().expect("snapshot");
    assert_eq!(state.generations.len(), 1);
    assert!(state.audits.contains_key(&record.id));
}
