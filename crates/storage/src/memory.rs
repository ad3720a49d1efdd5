use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use warden_core::RuleFilter;

use crate::backend::{mark_and_compact, ListBackend};
use crate::error::Result;

/// Process-local list store. One lock guards every collection, so each
/// operation (filtered removal included) is observed all-or-nothing.
#[derive(Default)]
pub struct MemoryBackend {
    lists: Mutex<HashMap<String, Vec<String>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ListBackend for MemoryBackend {
    async fn push(&self, key: &str, values: &[String]) -> Result<usize> {
        let mut lists = self.lists.lock().await;
        let list = lists.entry(key.to_string()).or_default();
        list.extend_from_slice(values);
        Ok(list.len())
    }

    async fn range(&self, key: &str) -> Result<Vec<String>> {
        let lists = self.lists.lock().await;
        Ok(lists.get(key).cloned().unwrap_or_default())
    }

    async fn len(&self, key: &str) -> Result<usize> {
        let lists = self.lists.lock().await;
        Ok(lists.get(key).map_or(0, Vec::len))
    }

    async fn remove(&self, key: &str, count: usize, value: &str) -> Result<usize> {
        let mut lists = self.lists.lock().await;
        let Some(list) = lists.get_mut(key) else {
            return Ok(0);
        };

        let limit = if count == 0 { usize::MAX } else { count };
        let mut removed = 0;
        list.retain(|line| {
            if removed < limit && line == value {
                removed += 1;
                false
            } else {
                true
            }
        });
        if list.is_empty() {
            lists.remove(key);
        }
        Ok(removed)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.lists.lock().await.remove(key);
        Ok(())
    }

    async fn replace(&self, key: &str, values: &[String]) -> Result<()> {
        let mut lists = self.lists.lock().await;
        if values.is_empty() {
            lists.remove(key);
        } else {
            lists.insert(key.to_string(), values.to_vec());
        }
        Ok(())
    }

    async fn remove_matching(&self, key: &str, filter: &RuleFilter) -> Result<usize> {
        let mut lists = self.lists.lock().await;
        let Some(list) = lists.get_mut(key) else {
            return Ok(0);
        };
        let removed = mark_and_compact(list, filter);
        if list.is_empty() {
            lists.remove(key);
        }
        Ok(removed)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
