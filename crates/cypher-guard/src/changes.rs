//! Change log and rewrite outcome types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered, human-readable record of the transformations applied to a query.
///
/// Used for audit and reporting only; nothing branches on its contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeLog(Vec<String>);

impl ChangeLog {
    /// Create an empty change log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry
    pub fn record(&mut self, entry: impl Into<String>) {
        self.0.push(entry.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    /// Whether any entry mentions `needle`
    pub fn mentions(&self, needle: &str) -> bool {
        self.0.iter().any(|entry| entry.contains(needle))
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl<'a> IntoIterator for &'a ChangeLog {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ChangeLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "- {}", entry)?;
        }
        Ok(())
    }
}

/// Successful rewrite: the approved query text plus its change log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteOutcome {
    /// Query text safe to hand to the execution layer
    pub query: String,
    /// Transformations applied, in order
    pub changes: ChangeLog,
}

impl RewriteOutcome {
    /// Whether any transformation was applied
    pub fn was_rewritten(&self) -> bool {
        !self.changes.is_empty()
    }
}
