use warden_core::PolicyModel;
use warden_storage::PolicyAdapter;

use crate::helpers::{memory_store, raw_entries, rule, seed_sample, text_lines};

#[tokio::test]
async fn test_append_then_load() {
    let store = memory_store();
    store.append("p", &["alice", "data1", "read"]).await.unwrap();

    let loaded: Vec<_> = store.load_all().await.unwrap().collect();
    assert_eq!(loaded, vec![rule("p", &["alice", "data1", "read"])]);
}

#[tokio::test]
async fn test_append_grows_by_one() {
    let store = memory_store();
    seed_sample(&store).await;
    assert_eq!(store.len().await.unwrap(), 3);
    store.append("g", &["alice", "admin"]).await.unwrap();
    assert_eq!(store.len().await.unwrap(), 4);
}

#[tokio::test]
async fn test_duplicates_are_kept() {
    let store = memory_store();
    store.append("p", &["alice", "data1", "read"]).await.unwrap();
    store.append("p", &["alice", "data1", "read"]).await.unwrap();

    let entries = raw_entries(&store).await;
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0], entries[1]);
}

#[tokio::test]
async fn test_exact_removal_with_duplicates() {
    let store = memory_store();
    store.append("p", &["alice", "data1", "read"]).await.unwrap();
    store.append("p", &["alice", "data1", "read"]).await.unwrap();

    let removed = store
        .remove_exact("p", &["alice", "data1", "read"], false)
        .await
        .unwrap();
    assert_eq!(removed, 1);
    assert_eq!(text_lines(&store).await, vec!["p, alice, data1, read"]);

    store.append("p", &["alice", "data1", "read"]).await.unwrap();
    let removed = store
        .remove_exact("p", &["alice", "data1", "read"], true)
        .await
        .unwrap();
    assert_eq!(removed, 2);
    assert!(text_lines(&store).await.is_empty());
}

#[tokio::test]
async fn test_exact_removal_needs_identical_fields() {
    let store = memory_store();
    seed_sample(&store).await;

    // A prefix of a stored rule is a different rule.
    let removed = store
        .remove_exact("p", &["admin", "data1"], true)
        .await
        .unwrap();
    assert_eq!(removed, 0);
    assert_eq!(store.len().await.unwrap(), 3);
}

#[tokio::test]
async fn test_save_and_load_policy_model() {
    let store = memory_store();
    seed_sample(&store).await;

    let mut model = PolicyModel::new();
    store.load_policy(&mut model).await.unwrap();
    assert_eq!(model.rules("p", "p").len(), 3);

    model.load_policy_line("g, bob, admin").unwrap();
    store.save_policy(&model).await.unwrap();

    assert_eq!(
        text_lines(&store).await,
        vec![
            "p, admin, data1, read",
            "p, admin, data1, write",
            "p, bob, data2, read",
            "g, bob, admin",
        ]
    );
}

#[tokio::test]
async fn test_save_empty_model_clears_store() {
    let store = memory_store();
    seed_sample(&store).await;
    store.save_policy(&PolicyModel::new()).await.unwrap();
    assert!(store.is_empty().await.unwrap());
}

#[tokio::test]
async fn test_stores_with_different_keys_are_isolated() {
    let store = memory_store();
    let other = warden_storage::RuleStore::new(store.backend().clone(), "other_rules");
    seed_sample(&store).await;
    other.append("p", &["eve", "data9", "read"]).await.unwrap();

    store.clear().await.unwrap();
    assert!(store.is_empty().await.unwrap());
    assert_eq!(text_lines(&other).await, vec!["p, eve, data9, read"]);
}
