//! Field-window predicate for filtered rule removal.
//!
//! A [`RuleFilter`] constrains a contiguous window of value slots starting
//! at `field_index`. Slots outside the window match anything, including
//! unset slots. An empty string inside the window is a wildcard.

use crate::error::{CoreError, Result};
use crate::rule::{Rule, MAX_FIELDS};

/// Tombstone written over matched entries before the bulk compaction step.
/// It is not valid JSON, so no canonical rule encoding can equal it.
pub const SENTINEL: &str = "__CASBIN_DELETED__";

/// Validated removal pattern: `ptype` plus values for slots
/// `field_index..field_index + values.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleFilter {
    ptype: String,
    field_index: usize,
    values: Vec<String>,
}

impl RuleFilter {
    /// Validate the window: `field_index <= 5` and
    /// `1 <= field_index + values.len() <= 6`.
    pub fn new<S: AsRef<str>>(ptype: &str, field_index: usize, values: &[S]) -> Result<Self> {
        if ptype.is_empty() {
            return Err(CoreError::InvalidArgument("ptype must not be empty".into()));
        }
        if field_index >= MAX_FIELDS {
            return Err(CoreError::InvalidArgument(format!(
                "field index {} out of range [0, {}]",
                field_index,
                MAX_FIELDS - 1
            )));
        }
        let end = field_index + values.len();
        if !(1..=MAX_FIELDS).contains(&end) {
            return Err(CoreError::InvalidArgument(format!(
                "field window [{}, {}) must end within [1, {}]",
                field_index, end, MAX_FIELDS
            )));
        }

        Ok(Self {
            ptype: ptype.to_string(),
            field_index,
            values: values.iter().map(|v| v.as_ref().to_string()).collect(),
        })
    }

    pub fn ptype(&self) -> &str {
        &self.ptype
    }

    pub fn field_index(&self) -> usize {
        self.field_index
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Structural match against a decoded rule.
    pub fn matches(&self, rule: &Rule) -> bool {
        if rule.ptype != self.ptype {
            return false;
        }
        self.values.iter().enumerate().all(|(offset, expected)| {
            expected.is_empty() || rule.field(self.field_index + offset) == Some(expected.as_str())
        })
    }

    /// Match a stored line. Lines that fail to decode never match.
    pub fn matches_line(&self, line: &str) -> bool {
        Rule::decode(line).map(|rule| self.matches(&rule)).unwrap_or(false)
    }
}
