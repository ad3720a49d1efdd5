//! The same properties against a live Redis server. The filtered removal
//! here runs through the server-side script rather than the in-process lock.

use warden_core::PolicyModel;
use warden_storage::{ListBackend, PolicyAdapter, StoreError};

use crate::helpers::{raw_entries, redis_store, rule, seed_sample, text_lines};

#[ignore]
#[tokio::test]
async fn test_redis_append_and_load() {
    let store = redis_store().await;
    store.ping().await.unwrap();
    store.append("p", &["alice", "data1", "read"]).await.unwrap();

    let loaded: Vec<_> = store.load_all().await.unwrap().collect();
    assert_eq!(loaded, vec![rule("p", &["alice", "data1", "read"])]);
    store.clear().await.unwrap();
}

#[ignore]
#[tokio::test]
async fn test_redis_filtered_removal() {
    let store = redis_store().await;
    seed_sample(&store).await;

    let removed = store.remove_filtered("p", 1, &["data1"]).await.unwrap();
    assert_eq!(removed, 2);
    assert_eq!(text_lines(&store).await, vec!["p, bob, data2, read"]);
    store.clear().await.unwrap();
}

#[ignore]
#[tokio::test]
async fn test_redis_filter_wildcard_and_no_match() {
    let store = redis_store().await;
    seed_sample(&store).await;
    let before = raw_entries(&store).await;

    assert_eq!(store.remove_filtered("p", 0, &["nobody"]).await.unwrap(), 0);
    assert_eq!(raw_entries(&store).await, before);

    let removed = store
        .remove_filtered("p", 0, &["", "", "read"])
        .await
        .unwrap();
    assert_eq!(removed, 2);
    assert_eq!(text_lines(&store).await, vec!["p, admin, data1, write"]);
    store.clear().await.unwrap();
}

#[ignore]
#[tokio::test]
async fn test_redis_filter_rejects_bad_window() {
    let store = redis_store().await;
    seed_sample(&store).await;

    let err = store
        .remove_filtered("p", 4, &["a", "b", "c"])
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidArgument(_)));
    assert_eq!(store.len().await.unwrap(), 3);
    store.clear().await.unwrap();
}

#[ignore]
#[tokio::test]
async fn test_redis_filter_skips_malformed_entries() {
    let store = redis_store().await;
    seed_sample(&store).await;
    store
        .backend()
        .push(store.key(), &["{broken".to_string()])
        .await
        .unwrap();

    assert_eq!(store.remove_filtered("p", 0, &[""]).await.unwrap(), 3);
    assert_eq!(raw_entries(&store).await, vec!["{broken".to_string()]);
    store.clear().await.unwrap();
}

#[ignore]
#[tokio::test]
async fn test_redis_filter_leaves_entries_with_non_string_values() {
    let store = redis_store().await;
    seed_sample(&store).await;
    let odd = vec![
        r#"{"ptype":"p","v0":"admin","v1":7}"#.to_string(),
        r#"{"ptype":1,"v0":"admin"}"#.to_string(),
        r#"{"ptype":"p","v0":"admin","v1":null}"#.to_string(),
    ];
    store.backend().push(store.key(), &odd).await.unwrap();

    let removed = store.remove_filtered("p", 0, &["admin"]).await.unwrap();
    assert_eq!(removed, 3);
    assert_eq!(
        raw_entries(&store).await,
        vec![
            r#"{"ptype":"p","v0":"bob","v1":"data2","v2":"read"}"#.to_string(),
            odd[0].clone(),
            odd[1].clone(),
        ]
    );
    store.clear().await.unwrap();
}

#[ignore]
#[tokio::test]
async fn test_redis_exact_removal_and_save() {
    let store = redis_store().await;
    store.append("p", &["alice", "data1", "read"]).await.unwrap();
    store.append("p", &["alice", "data1", "read"]).await.unwrap();

    let removed = store
        .remove_exact("p", &["alice", "data1", "read"], false)
        .await
        .unwrap();
    assert_eq!(removed, 1);

    let mut model = PolicyModel::new();
    store.load_policy(&mut model).await.unwrap();
    model.load_policy_line("g, alice, admin").unwrap();
    store.save_policy(&model).await.unwrap();

    assert_eq!(
        text_lines(&store).await,
        vec!["p, alice, data1, read", "g, alice, admin"]
    );
    store.clear().await.unwrap();
}
