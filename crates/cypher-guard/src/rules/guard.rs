//! Structural guards for subquery forms that never parse in Neo4j 5.

use crate::error::RewriteError;
use once_cell::sync::Lazy;
use regex::Regex;

pub(super) const COUNT_RETURN_RULE: &str = "count-return-guard";
pub(super) const COLLECT_RETURN_RULE: &str = "collect-return-guard";

static COUNT_RETURN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)count\s*\{\s*return").unwrap());
static COLLECT_RETURN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)collect\s*\{\s*return").unwrap());

pub(super) fn detect_count_return(query: &str) -> bool {
    COUNT_RETURN_RE.is_match(query)
}

pub(super) fn detect_collect_return(query: &str) -> bool {
    COLLECT_RETURN_RE.is_match(query)
}

pub(super) fn count_return_error() -> RewriteError {
    RewriteError::StructurallyInvalid {
        rule: COUNT_RETURN_RULE,
        construct: "COUNT { RETURN ... }",
    }
}

pub(super) fn collect_return_error() -> RewriteError {
    RewriteError::StructurallyInvalid {
        rule: COLLECT_RETURN_RULE,
        construct: "collect { RETURN ... }",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_nested_return() {
        assert!(detect_count_return("RETURN COUNT { RETURN n }"));
        assert!(detect_count_return("return count{return 1}"));
        assert!(detect_collect_return("RETURN collect {\n  RETURN n.name\n}"));
    }

    #[test]
    fn test_valid_subqueries_pass() {
        assert!(!detect_count_return("RETURN COUNT { (a)-->() }"));
        assert!(!detect_count_return("RETURN count(n)"));
        assert!(!detect_collect_return("RETURN COLLECT { MATCH (n) RETURN n.name }"));
    }

    #[test]
    fn test_error_names_rule() {
        assert_eq!(count_return_error().rule_name(), "count-return-guard");
        assert_eq!(collect_return_error().rule_name(), "collect-return-guard");
    }
}
