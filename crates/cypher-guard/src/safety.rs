//! Final safety gate.
//!
//! A case-insensitive scan for mutating or administrative operations. It runs
//! for every version tier and cannot be relaxed by configuration. Keywords
//! match as whole words anywhere in the text, whatever follows them (`(`,
//! a comment, a newline), and the words of `call dbms` may be separated by
//! any mix of whitespace and comments. Keywords inside string literals or
//! comments are rejected as well.

use crate::error::{RewriteError, RewriteResult};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

/// Denylisted operations, lower-case, in scan order
const DENYLIST: &[&str] = &[
    "call dbms",
    "drop ",
    "delete ",
    "detach delete",
    "remove ",
    "set ",
    "create ",
    "merge ",
];

/// Whitespace or comments between the words of a keyword
const SEPARATOR: &str = r"(?:\s|/\*.*?\*/|//[^\n]*(?:\n|$))+";

/// One word-bounded pattern per denylist entry, same order
static DENYLIST_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    DENYLIST
        .iter()
        .map(|&keyword| {
            let words: Vec<String> = keyword.split_whitespace().map(regex::escape).collect();
            let pattern = format!(r"(?is)\b{}\b", words.join(SEPARATOR));
            (keyword, Regex::new(&pattern).unwrap())
        })
        .collect()
});

/// Stateless validator over the fixed denylist
#[derive(Debug, Clone, Copy, Default)]
pub struct SafetyValidator;

impl SafetyValidator {
    /// The keywords this validator rejects
    pub fn denylist() -> &'static [&'static str] {
        DENYLIST
    }

    /// Reject `query` if it contains any denylisted operation.
    pub fn validate(&self, query: &str) -> RewriteResult<()> {
        for &(keyword, ref pattern) in DENYLIST_PATTERNS.iter() {
            if pattern.is_match(query) {
                warn!("Rejected query containing forbidden operation '{}'", keyword.trim());
                return Err(RewriteError::ForbiddenOperation { keyword });
            }
        }
        Ok(())
    }
}

/// Validate with the default validator
pub fn validate(query: &str) -> RewriteResult<()> {
    SafetyValidator.validate(query)
}
