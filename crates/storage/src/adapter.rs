//! Persistence contract between the policy engine and a rule store.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use warden_core::{PolicyModel, Rule};

use crate::error::{Result, StoreError};
use crate::store::RuleStore;

/// Operations the policy engine calls to load and persist its rules.
///
/// `sec` names the model section (`p` or `g`). Both sections share one
/// collection and are told apart by `ptype` alone, so `sec` only shows up
/// in logs.
#[async_trait]
pub trait PolicyAdapter: Send + Sync {
    /// Feed every stored rule to `model` through its text-line loader.
    ///
    /// The line format is lossy. Unset slots are dropped, so a rule with
    /// `v0` and `v2` set loads as two consecutive values, and a value that
    /// contains a comma is split into extra fields by the loader.
    async fn load_policy(&self, model: &mut PolicyModel) -> Result<()>;

    /// Replace the stored collection with every rule in `model`.
    async fn save_policy(&self, model: &PolicyModel) -> Result<bool>;

    async fn add_policy(&self, sec: &str, ptype: &str, rule: &[String]) -> Result<bool>;

    async fn add_policies(&self, sec: &str, ptype: &str, rules: &[Vec<String>]) -> Result<bool>;

    /// Remove every stored copy of `rule`. Returns whether anything was removed.
    async fn remove_policy(&self, sec: &str, ptype: &str, rule: &[String]) -> Result<bool>;

    async fn remove_policies(&self, sec: &str, ptype: &str, rules: &[Vec<String>])
        -> Result<bool>;

    /// Remove rules matching `field_values` from `field_index` onward.
    /// Returns `false` for a malformed window, `true` otherwise, whether or
    /// not any rule matched.
    async fn remove_filtered_policy(
        &self,
        sec: &str,
        ptype: &str,
        field_index: usize,
        field_values: &[String],
    ) -> Result<bool>;

    async fn clear_policy(&self) -> Result<()>;
}

#[async_trait]
impl PolicyAdapter for RuleStore {
    async fn load_policy(&self, model: &mut PolicyModel) -> Result<()> {
        let mut loaded = 0usize;
        for rule in self.load_all().await? {
            match model.load_policy_line(&rule.to_text_line()) {
                Ok(()) => loaded += 1,
                Err(e) => warn!(key = %self.key(), rule = %rule, error = %e, "model rejected stored rule"),
            }
        }
        info!(key = %self.key(), rules = loaded, "loaded policy");
        Ok(())
    }

    async fn save_policy(&self, model: &PolicyModel) -> Result<bool> {
        let rules = model
            .iter()
            .map(|(_, ptype, values)| Rule::new(ptype, values))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        self.replace_all(&rules).await?;
        Ok(true)
    }

    async fn add_policy(&self, sec: &str, ptype: &str, rule: &[String]) -> Result<bool> {
        debug!(sec, ptype, "add policy");
        self.append(ptype, rule).await?;
        Ok(true)
    }

    async fn add_policies(&self, sec: &str, ptype: &str, rules: &[Vec<String>]) -> Result<bool> {
        debug!(sec, ptype, count = rules.len(), "add policies");
        self.append_many(ptype, rules).await?;
        Ok(true)
    }

    async fn remove_policy(&self, sec: &str, ptype: &str, rule: &[String]) -> Result<bool> {
        debug!(sec, ptype, "remove policy");
        let removed = self.remove_exact(ptype, rule, true).await?;
        Ok(removed > 0)
    }

    async fn remove_policies(
        &self,
        sec: &str,
        ptype: &str,
        rules: &[Vec<String>],
    ) -> Result<bool> {
        debug!(sec, ptype, count = rules.len(), "remove policies");
        let removed = self.remove_many(ptype, rules).await?;
        Ok(removed > 0)
    }

    async fn remove_filtered_policy(
        &self,
        sec: &str,
        ptype: &str,
        field_index: usize,
        field_values: &[String],
    ) -> Result<bool> {
        debug!(sec, ptype, field_index, "remove filtered policy");
        match self.remove_filtered(ptype, field_index, field_values).await {
            Ok(_) => Ok(true),
            Err(StoreError::InvalidArgument(msg)) => {
                warn!(sec, ptype, field_index, error = %msg, "rejected filter");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    async fn clear_policy(&self) -> Result<()> {
        self.clear().await
    }
}
