use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Number of positional value slots a rule carries (`v0`..`v5`).
pub const MAX_FIELDS: usize = 6;

/// One policy rule: a policy type tag plus up to six positional values.
///
/// Unset slots are `None`. Position is significant: a rule with only `v2`
/// set is different from one with only `v0` set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule {
    pub ptype: String,
    pub fields: [Option<String>; MAX_FIELDS],
}

/// Wire shape of a stored rule. Key order is fixed by declaration order,
/// which makes the JSON text a deterministic function of the rule.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredRule {
    #[serde(default)]
    ptype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    v0: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    v1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    v2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    v3: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    v4: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    v5: Option<String>,
}

impl Rule {
    /// Build a rule from a policy type and its values, filling `v0` upward.
    pub fn new<S: AsRef<str>>(ptype: &str, values: &[S]) -> Result<Self> {
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

        let mut fields: [Option<String>; MAX_FIELDS] = Default::default();
        for (slot, value) in fields.iter_mut().zip(values) {
            *slot = Some(value.as_ref().to_string());
        }
        Ok(Self {
            ptype: ptype.to_string(),
            fields,
        })
    }

    /// Value at slot `index`, or `None` when unset or out of range.
    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).and_then(|f| f.as_deref())
    }

    /// Set slots in position order.
    pub fn present_fields(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.fields
            .iter()
            .enumerate()
            .filter_map(|(i, f)| f.as_deref().map(|v| (i, v)))
    }

    /// Set values in position order, as the engine sees them.
    pub fn values(&self) -> Vec<String> {
        self.present_fields().map(|(_, v)| v.to_string()).collect()
    }

    /// True when no slot is set.
    pub fn is_empty(&self) -> bool {
        self.fields.iter().all(Option::is_none)
    }

    /// Canonical JSON encoding used for storage and exact-match comparison.
    pub fn encode(&self) -> Result<String> {
        let [v0, v1, v2, v3, v4, v5] = self.fields.clone();
        let stored = StoredRule {
            ptype: Some(self.ptype.clone()),
            v0,
            v1,
            v2,
            v3,
            v4,
            v5,
        };
        Ok(serde_json::to_string(&stored)?)
    }

    /// Inverse of [`Rule::encode`]. Missing slots decode as unset.
    pub fn decode(line: &str) -> Result<Self> {
        let stored: StoredRule = serde_json::from_str(line)
            .map_err(|e| CoreError::MalformedLine(format!("{}: {}", e, truncate(line))))?;

        let ptype = match stored.ptype {
            Some(p) if !p.is_empty() => p,
            _ => {
                return Err(CoreError::MalformedLine(format!(
                    "missing ptype: {}",
                    truncate(line)
                )))
            }
        };

        Ok(Self {
            ptype,
            fields: [
                stored.v0, stored.v1, stored.v2, stored.v3, stored.v4, stored.v5,
            ],
        })
    }

    /// Flat `ptype, v0, v1, ...` line for the engine's text loader.
    pub fn to_text_line(&self) -> String {
        std::iter::once(self.ptype.as_str())
            .chain(self.present_fields().map(|(_, v)| v))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text_line())
    }
}

fn truncate(line: &str) -> String {
    const MAX: usize = 80;
    match line.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &line[..idx]),
        None => line.to_string(),
    }
}
