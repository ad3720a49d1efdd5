//! Integration tests for the rule store covering filtered removal, exact
//! removal, bulk save/load, and concurrent readers during filtered removal.
//!
//! Tests marked with `#[ignore]` need a running Redis server
//! (`WARDEN_TEST_REDIS_URL`, default `redis://127.0.0.1:6379/15`) and must be
//! run explicitly: `cargo test -p warden-storage -- --ignored`.

mod helpers;
mod redis_store;
mod store_ops;
