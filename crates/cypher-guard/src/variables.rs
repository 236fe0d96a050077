//! Identifier extraction from Cypher fragments.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// Identifier syntax: letters, digits and underscore, not leading digit
static VAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Za-z_][A-Za-z0-9_]*\b").unwrap());

/// Words that never name a variable (clause keywords, literals, cast functions).
/// Stored upper-case; lookups are case-insensitive.
const RESERVED_KEYWORDS: &[&str] = &[
    "MATCH", "OPTIONAL", "WITH", "RETURN", "WHERE", "ORDER", "BY", "SKIP", "LIMIT", "UNWIND",
    "CALL", "YIELD", "UNION", "COUNT", "DISTINCT", "AS", "AND", "OR", "XOR", "NOT", "IN", "IS",
    "STARTS", "ENDS", "CONTAINS", "CASE", "WHEN", "THEN", "ELSE", "END", "NULL", "TRUE", "FALSE",
    "ASC", "ASCENDING", "DESC", "DESCENDING", "EXISTS", "TOFLOAT", "TOINTEGER", "TOLONG",
    "TOSTRING", "TOBOOLEAN",
];

/// Check whether `word` is a reserved keyword (case-insensitive)
pub fn is_reserved(word: &str) -> bool {
    RESERVED_KEYWORDS
        .iter()
        .any(|kw| kw.eq_ignore_ascii_case(word))
}

/// Extract identifier names from a fragment, dropping reserved keywords.
///
/// This is deliberately lexical: property keys, labels and function names
/// are returned too. Callers needing read-only names use
/// [`crate::scope::consumed_names`].
pub fn extract_variables(fragment: &str) -> BTreeSet<String> {
    VAR_RE
        .find_iter(fragment)
        .map(|m| m.as_str())
        .filter(|word| !is_reserved(word))
        .map(str::to_string)
        .collect()
}
