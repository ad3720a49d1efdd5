//! In-memory policy set as the policy engine holds it.
//!
//! Rules are grouped by section (`p` for permissions, `g` for role
//! grouping) and then by ptype. Loading goes through the same flat text
//! line format the engine's file loader uses.

use std::collections::BTreeMap;

use crate::error::{CoreError, Result};
use crate::rule::MAX_FIELDS;

/// Sections persisted by the adapter, in save order.
pub const SECTIONS: [&str; 2] = ["p", "g"];

type Assertions = BTreeMap<String, Vec<Vec<String>>>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyModel {
    sections: BTreeMap<String, Assertions>,
}

impl PolicyModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one `ptype, v0, v1, ...` line and add it to the model.
    ///
    /// Blank lines and `#` comments are ignored. The section is the first
    /// character of the ptype.
    pub fn load_policy_line(&mut self, line: &str) -> Result<()> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }

        let mut tokens = line.split(',').map(str::trim);
        let ptype = tokens.next().unwrap_or_default();
        let values: Vec<String> = tokens.map(str::to_string).collect();
        let sec = section_of(ptype)?;
        self.add_rule(sec, ptype, values)
    }

    /// Append a rule to `sec`/`ptype`.
    pub fn add_rule(&mut self, sec: &str, ptype: &str, values: Vec<String>) -> Result<()> {
        if !SECTIONS.contains(&sec) {
            return Err(CoreError::InvalidArgument(format!("unknown section '{}'", sec)));
        }
        if ptype.is_empty() {
            return Err(CoreError::InvalidArgument("ptype must not be empty".into()));
        }
        if values.len() > MAX_FIELDS {
            return Err(CoreError::InvalidArgument(format!(
                "rule has {} values, at most {} are supported",
                values.len(),
                MAX_FIELDS
            )));
        }
        self.sections
            .entry(sec.to_string())
            .or_default()
            .entry(ptype.to_string())
            .or_default()
            .push(values);
        Ok(())
    }

    /// Rules stored for `sec`/`ptype`, in insertion order.
    pub fn rules(&self, sec: &str, ptype: &str) -> &[Vec<String>] {
        self.sections
            .get(sec)
            .and_then(|a| a.get(ptype))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every rule as `(sec, ptype, values)`: sections in [`SECTIONS`] order,
    /// ptypes sorted, rules in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &[String])> + '_ {
        SECTIONS.iter().flat_map(move |sec| {
            self.sections.get(*sec).into_iter().flat_map(move |assertions| {
                assertions.iter().flat_map(move |(ptype, rules)| {
                    rules
                        .iter()
                        .map(move |values| (*sec, ptype.as_str(), values.as_slice()))
                })
            })
        })
    }

    pub fn len(&self) -> usize {
        self.sections
            .values()
            .flat_map(BTreeMap::values)
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.sections.clear();
    }
}

fn section_of(ptype: &str) -> Result<&'static str> {
    match ptype.chars().next() {
        Some('p') => Ok("p"),
        Some('g') => Ok("g"),
        _ => Err(CoreError::InvalidArgument(format!(
            "cannot infer section from ptype '{}'",
            ptype
        ))),
    }
}
