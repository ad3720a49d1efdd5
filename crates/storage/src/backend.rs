use async_trait::async_trait;

use warden_core::{RuleFilter, SENTINEL};

use crate::error::Result;

/// Ordered-list store holding serialized rule lines under a key.
///
/// Every method is atomic with respect to the key it touches. In particular
/// [`ListBackend::remove_matching`] must never let a concurrent reader see
/// the tombstones it writes during its mark phase.
#[async_trait]
pub trait ListBackend: Send + Sync {
    /// Append `values` to the tail of the list. Returns the new length.
    async fn push(&self, key: &str, values: &[String]) -> Result<usize>;

    /// Whole list, head to tail, in one read.
    async fn range(&self, key: &str) -> Result<Vec<String>>;

    async fn len(&self, key: &str) -> Result<usize>;

    /// Remove entries equal to `value`: the first `count` of them, or all
    /// when `count` is 0. Returns how many were removed.
    async fn remove(&self, key: &str, count: usize, value: &str) -> Result<usize>;

    async fn delete(&self, key: &str) -> Result<()>;

    /// Delete the list and write `values` in its place as one unit.
    async fn replace(&self, key: &str, values: &[String]) -> Result<()>;

    /// Remove every entry matching `filter`, keeping survivors in order.
    /// Returns how many were removed.
    async fn remove_matching(&self, key: &str, filter: &RuleFilter) -> Result<usize>;

    /// Round-trip check against the store.
    async fn ping(&self) -> Result<()>;
}

/// Two-phase filtered removal over a list held in memory.
///
/// Pass one overwrites each matching slot with [`SENTINEL`] without moving
/// anything, so indices stay stable for the whole scan. Pass two drops every
/// sentinel slot in a single compaction. The caller must hold the
/// collection lock across both passes.
pub fn mark_and_compact(list: &mut Vec<String>, filter: &RuleFilter) -> usize {
    let mut marked = 0;
    for slot in list.iter_mut() {
        if filter.matches_line(slot) {
            *slot = SENTINEL.to_string();
            marked += 1;
        }
    }

    if marked > 0 {
        list.retain(|line| line != SENTINEL);
    }
    marked
}
