//! APOC call handling.
//!
//! A small curated table maps APOC helpers onto native Cypher. Anything left
//! over after substitution is rejected unless extensions are allowed, in
//! which case the text is not touched at all.

use crate::changes::ChangeLog;
use crate::error::{RewriteError, RewriteResult};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, warn};

static APOC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bapoc\.").unwrap());

/// Full dotted name of an APOC call, e.g. `apoc.coll.toSet`
static APOC_CALL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bapoc(?:\.[A-Za-z_][A-Za-z0-9_]*)+").unwrap());

/// (pattern, native replacement) pairs, applied in order
static SUBSTITUTIONS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(r"(?i)apoc\.coll\.toSet\s*\(\s*([^)]+?)\s*\)").unwrap(),
            "collect(DISTINCT ${1})",
        ),
        (
            Regex::new(r"(?i)apoc\.coll\.contains\s*\(\s*([^,()]+?)\s*,\s*([^()]+?)\s*\)").unwrap(),
            "(${2} IN ${1})",
        ),
        (
            Regex::new(r"(?i)apoc\.node\.labels\s*\(\s*([^()]+?)\s*\)").unwrap(),
            "labels(${1})",
        ),
        (
            Regex::new(r"(?i)apoc\.date\.currentTimestamp\s*\(\s*\)").unwrap(),
            "timestamp()",
        ),
    ]
});

pub(super) fn detect(query: &str) -> bool {
    APOC_RE.is_match(query)
}

/// First APOC call name remaining in `query`, if any
fn first_apoc_call(query: &str) -> Option<&str> {
    APOC_CALL_RE.find(query).map(|m| m.as_str())
}

/// Apply the substitution table without any gating
fn substitute(query: &str) -> String {
    SUBSTITUTIONS
        .iter()
        .fold(query.to_string(), |acc, (pattern, replacement)| {
            pattern.replace_all(&acc, *replacement).into_owned()
        })
}

pub(super) fn rewrite(
    query: String,
    allow_apoc: bool,
    changes: &mut ChangeLog,
) -> RewriteResult<String> {
    if allow_apoc {
        debug!("APOC allowed, leaving calls untouched");
        return Ok(query);
    }

    let rewritten = substitute(&query);
    if detect(&rewritten) {
        let call = first_apoc_call(&rewritten).unwrap_or("apoc.").to_string();
        warn!("Rejected unconvertible APOC call {}", call);
        return Err(RewriteError::DisallowedExtension { call });
    }

    info!("Rewrote APOC calls to native Cypher");
    changes.record("Rewrote APOC to native Cypher");
    Ok(rewritten)
}
