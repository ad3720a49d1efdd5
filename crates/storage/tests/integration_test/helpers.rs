use std::sync::Arc;

use uuid::Uuid;

use warden_core::Rule;
use warden_storage::{ListBackend, MemoryBackend, RedisBackend, RuleStore};

/// The three-rule collection used across filtered-removal tests.
pub const SAMPLE: [[&str; 3]; 3] = [
    ["admin", "data1", "read"],
    ["admin", "data1", "write"],
    ["bob", "data2", "read"],
];

/// Fresh in-memory store with a unique key.
pub fn memory_store() -> RuleStore {
    RuleStore::new(Arc::new(MemoryBackend::new()), unique_key())
}

/// Store on the test Redis server with a unique key.
pub async fn redis_store() -> RuleStore {
    let url = std::env::var("WARDEN_TEST_REDIS_URL")
        .unwrap_or_else(|_| "redis://127.0.0.1:6379/15".to_string());
    let client = redis::Client::open(url).expect("invalid redis url");
    let conn = client
        .get_multiplexed_async_connection()
        .await
        .expect("failed to reach redis");
    let backend: Arc<dyn ListBackend> = Arc::new(RedisBackend::from_connection(conn));
    RuleStore::new(backend, unique_key())
}

pub fn unique_key() -> String {
    format!("warden_test_{}", Uuid::new_v4())
}

/// Append the sample `p` rules in order.
pub async fn seed_sample(store: &RuleStore) {
    for values in SAMPLE {
        store.append("p", &values).await.unwrap();
    }
}

/// Stored rules as text lines, in list order.
pub async fn text_lines(store: &RuleStore) -> Vec<String> {
    store
        .load_all()
        .await
        .unwrap()
        .map(|rule| rule.to_text_line())
        .collect()
}

/// Raw stored entries, exactly as the backend holds them.
pub async fn raw_entries(store: &RuleStore) -> Vec<String> {
    store.backend().range(store.key()).await.unwrap()
}

pub fn rule(ptype: &str, values: &[&str]) -> Rule {
    Rule::new(ptype, values).unwrap()
}
