//! [`RuleStore`]: the rule collection stored under one list key.
//!
//! Every call goes straight to the backend. Nothing is cached locally, so
//! concurrent writers never see a stale view through this type.

use std::sync::Arc;

use tracing::{debug, info, warn};

use warden_core::{RedisConfig, Rule, RuleFilter};

use crate::backend::ListBackend;
use crate::error::Result;
use crate::memory::MemoryBackend;
use crate::redis_backend::RedisBackend;

/// Ordered collection of encoded rules in a list backend.
#[derive(Clone)]
pub struct RuleStore {
    backend: Arc<dyn ListBackend>,
    key: String,
}

impl RuleStore {
    pub fn new(backend: Arc<dyn ListBackend>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// Connect to Redis using `config` and target `config.key`.
    pub async fn connect(config: &RedisConfig) -> Result<Self> {
        let backend = RedisBackend::connect(config).await?;
        Ok(Self::new(Arc::new(backend), config.key.clone()))
    }

    /// Store backed by a fresh [`MemoryBackend`].
    pub fn in_memory(key: impl Into<String>) -> Self {
        Self::new(Arc::new(MemoryBackend::new()), key)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &Arc<dyn ListBackend> {
        &self.backend
    }

    /// Read every stored rule in list order.
    ///
    /// The list is fetched in one read; decoding happens lazily as the
    /// iterator is consumed. Entries that do not decode (including entries
    /// without a ptype) are logged and skipped.
    pub async fn load_all(&self) -> Result<impl Iterator<Item = Rule> + Send> {
        let lines = self.backend.range(&self.key).await?;
        debug!(key = %self.key, entries = lines.len(), "fetched rule collection");

        let key = self.key.clone();
        Ok(lines
            .into_iter()
            .enumerate()
            .filter_map(move |(index, line)| match Rule::decode(&line) {
                Ok(rule) => Some(rule),
                Err(e) => {
                    warn!(key = %key, index, error = %e, "skipping malformed rule entry");
                    None
                }
            }))
    }

    /// Append one rule to the tail of the collection.
    pub async fn append<S: AsRef<str> + Sync>(&self, ptype: &str, values: &[S]) -> Result<()> {
        let line = Rule::new(ptype, values)?.encode()?;
        let len = self.backend.push(&self.key, &[line]).await?;
        debug!(key = %self.key, ptype, len, "appended rule");
        Ok(())
    }

    /// Append several rules of one ptype with a single push.
    pub async fn append_many(&self, ptype: &str, rules: &[Vec<String>]) -> Result<usize> {
        let lines = rules
            .iter()
            .map(|values| Rule::new(ptype, values.as_slice())?.encode())
            .collect::<std::result::Result<Vec<_>, _>>()?;
        if lines.is_empty() {
            return Ok(0);
        }
        let len = self.backend.push(&self.key, &lines).await?;
        debug!(key = %self.key, ptype, added = lines.len(), len, "appended rules");
        Ok(lines.len())
    }

    /// Remove stored entries identical to the given rule: the first one, or
    /// every one when `all_occurrences` is set. A rule with no values is a
    /// no-op, so an under-specified call can never wipe a whole ptype.
    pub async fn remove_exact<S: AsRef<str> + Sync>(
        &self,
        ptype: &str,
        values: &[S],
        all_occurrences: bool,
    ) -> Result<usize> {
        let rule = Rule::new(ptype, values)?;
        if rule.is_empty() {
            debug!(key = %self.key, ptype, "ignoring removal of rule without values");
            return Ok(0);
        }

        let line = rule.encode()?;
        let count = if all_occurrences { 0 } else { 1 };
        let removed = self.backend.remove(&self.key, count, &line).await?;
        debug!(key = %self.key, rule = %rule, removed, "removed rule");
        Ok(removed)
    }

    /// Remove every occurrence of each listed rule. Returns the total removed.
    pub async fn remove_many(&self, ptype: &str, rules: &[Vec<String>]) -> Result<usize> {
        let mut removed = 0;
        for values in rules {
            removed += self.remove_exact(ptype, values.as_slice(), true).await?;
        }
        Ok(removed)
    }

    /// Clear the collection and write `rules` in order, as one atomic step.
    pub async fn replace_all(&self, rules: &[Rule]) -> Result<()> {
        let lines = rules
            .iter()
            .map(Rule::encode)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        self.backend.replace(&self.key, &lines).await?;
        info!(key = %self.key, rules = lines.len(), "replaced rule collection");
        Ok(())
    }

    /// Remove every rule of `ptype` whose values starting at `field_index`
    /// match `values` (`""` matches anything). Survivors keep their order.
    ///
    /// A malformed window fails with `InvalidArgument` before the store is
    /// touched. Returns how many rules were removed, possibly zero.
    pub async fn remove_filtered<S: AsRef<str> + Sync>(
        &self,
        ptype: &str,
        field_index: usize,
        values: &[S],
    ) -> Result<usize> {
        let filter = RuleFilter::new(ptype, field_index, values)?;
        let removed = self.backend.remove_matching(&self.key, &filter).await?;
        info!(
            key = %self.key,
            ptype,
            field_index,
            values = ?filter.values(),
            removed,
            "filtered rule removal"
        );
        Ok(removed)
    }

    /// Drop the whole collection.
    pub async fn clear(&self) -> Result<()> {
        self.backend.delete(&self.key).await?;
        info!(key = %self.key, "cleared rule collection");
        Ok(())
    }

    pub async fn len(&self) -> Result<usize> {
        self.backend.len(&self.key).await
    }

    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    pub async fn ping(&self) -> Result<()> {
        self.backend.ping().await
    }
}
