//! `toString(node)` rewriting.
//!
//! Stringifying a node directly is not meaningful in Neo4j 5. If the query
//! already reads `node.name` we stringify that; otherwise we project a map of
//! the node's labels and properties.

use crate::changes::ChangeLog;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::info;

static TOSTRING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)toString\s*\(\s*([A-Za-z_][A-Za-z0-9_]*)\s*\)").unwrap()
});

pub(super) fn detect(query: &str) -> bool {
    TOSTRING_RE.is_match(query)
}

pub(super) fn rewrite(query: &str, changes: &mut ChangeLog) -> String {
    TOSTRING_RE
        .replace_all(query, |caps: &Captures| {
            let var = &caps[1];

            if query.contains(&format!("{}.name", var)) {
                info!("Rewrote toString({}) to toString({}.name)", var, var);
                changes.record(format!("Rewrote toString({var}) → toString({var}.name)"));
                return format!("toString({}.name)", var);
            }

            info!("Rewrote toString({}) to node map", var);
            changes.record(format!("Rewrote toString({var}) → node map representation"));
            format!(
                "{{ labels: labels({var}), properties: properties({var}) }}",
                var = var
            )
        })
        .into_owned()
}
