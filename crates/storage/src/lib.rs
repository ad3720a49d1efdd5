//! Rule persistence over an ordered-list store.
//!
//! [`RuleStore`] keeps a policy rule collection under one list key and
//! implements [`PolicyAdapter`], the contract the policy engine uses to load
//! and save its rules. Storage goes through [`ListBackend`]: Redis in
//! production, [`MemoryBackend`] for tests and offline tooling.

pub mod adapter;
pub mod backend;
pub mod error;
pub mod memory;
pub mod redis_backend;
pub mod store;

pub use adapter::PolicyAdapter;
pub use backend::{mark_and_compact, ListBackend};
pub use error::StoreError;
pub use memory::MemoryBackend;
pub use redis_backend::RedisBackend;
pub use store::RuleStore;
