//! `size((pattern))` → `COUNT { (pattern) }`

use crate::changes::ChangeLog;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::info;

static SIZE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)size\s*\(\s*\((.*?)\)\s*\)").unwrap());

pub(super) fn detect(query: &str) -> bool {
    SIZE_RE.is_match(query)
}

/// Replace every pattern-size call; the inner pattern is kept verbatim.
pub(super) fn rewrite(query: &str, changes: &mut ChangeLog) -> String {
    let rewritten = SIZE_RE
        .replace_all(query, |caps: &Captures| format!("COUNT {{ ({}) }}", &caps[1]))
        .into_owned();

    info!("Rewrote size((pattern)) to COUNT subquery");
    changes.record("Rewrote size((pattern)) → COUNT { }");
    rewritten
}
