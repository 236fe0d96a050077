//! Pattern rules for modernizing generated Cypher.
//!
//! Each [`Rule`] variant pairs a textual detection pattern with either a pure
//! rewrite or a rejection. Rules live in a [`RuleSet`] whose order is the
//! order they run in; the standard set is built once and shared read-only.

mod apoc;
mod guard;
mod size;
mod tostring;

use crate::changes::ChangeLog;
use crate::error::RewriteResult;
use crate::rewriter::RewriteOptions;
use crate::version::CypherVersion;
use once_cell::sync::Lazy;
use serde::Serialize;

/// A named rewrite or rejection rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    /// `size((pattern))` → `COUNT { (pattern) }`
    SizeToCount,
    /// Native replacements for APOC calls, rejection of the rest
    ApocToNative,
    /// Rejects `COUNT { RETURN ... }`
    CountReturnGuard,
    /// Rejects `collect { RETURN ... }`
    CollectReturnGuard,
    /// `toString(node)` → `toString(node.name)` or a labels/properties map
    ToStringOnNode,
}

impl Rule {
    /// Stable rule name used in logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            Rule::SizeToCount => "size-to-count",
            Rule::ApocToNative => "apoc-to-native",
            Rule::CountReturnGuard => guard::COUNT_RETURN_RULE,
            Rule::CollectReturnGuard => guard::COLLECT_RETURN_RULE,
            Rule::ToStringOnNode => "tostring-on-node",
        }
    }

    /// One-line summary shown by rule listings
    pub fn description(&self) -> &'static str {
        match self {
            Rule::SizeToCount => "Rewrite size((pattern)) to COUNT { (pattern) }",
            Rule::ApocToNative => "Replace known APOC calls with native Cypher, reject the rest",
            Rule::CountReturnGuard => "Reject COUNT { RETURN ... } subqueries",
            Rule::CollectReturnGuard => "Reject collect { RETURN ... } subqueries",
            Rule::ToStringOnNode => "Rewrite toString(node) to a name or labels/properties map",
        }
    }

    /// Oldest tier that needs this rule
    pub fn min_version(&self) -> CypherVersion {
        CypherVersion::V5
    }

    /// Whether the rule runs for `version`
    pub fn applies_to(&self, version: CypherVersion) -> bool {
        version >= self.min_version()
    }

    /// Whether the rule's pattern occurs in `query`
    pub fn detect(&self, query: &str) -> bool {
        match self {
            Rule::SizeToCount => size::detect(query),
            Rule::ApocToNative => apoc::detect(query),
            Rule::CountReturnGuard => guard::detect_count_return(query),
            Rule::CollectReturnGuard => guard::detect_collect_return(query),
            Rule::ToStringOnNode => tostring::detect(query),
        }
    }

    /// Apply the rule, returning the rewritten text or a rejection.
    ///
    /// Queries the rule does not detect are returned unchanged.
    pub fn apply(
        &self,
        query: String,
        options: &RewriteOptions,
        changes: &mut ChangeLog,
    ) -> RewriteResult<String> {
        if !self.detect(&query) {
            return Ok(query);
        }

        match self {
            Rule::SizeToCount => Ok(size::rewrite(&query, changes)),
            Rule::ApocToNative => apoc::rewrite(query, options.allow_apoc, changes),
            Rule::CountReturnGuard => Err(guard::count_return_error()),
            Rule::CollectReturnGuard => Err(guard::collect_return_error()),
            Rule::ToStringOnNode => Ok(tostring::rewrite(&query, changes)),
        }
    }
}

static STANDARD_RULES: Lazy<RuleSet> = Lazy::new(|| {
    RuleSet::new(vec![
        Rule::SizeToCount,
        Rule::ApocToNative,
        Rule::CountReturnGuard,
        Rule::CollectReturnGuard,
        Rule::ToStringOnNode,
    ])
});

/// Ordered collection of rules (registration order = execution order)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Create a rule set that runs `rules` in the given order
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The process-wide standard rule set
    pub fn standard() -> &'static RuleSet {
        &STANDARD_RULES
    }

    /// All rules, in execution order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Rules that run for `version`, in order
    pub fn rules_for(&self, version: CypherVersion) -> impl Iterator<Item = &Rule> + '_ {
        self.rules.iter().filter(move |rule| rule.applies_to(version))
    }

    /// Get list of rule names in execution order
    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Look up a rule by name
    pub fn get(&self, name: &str) -> Option<Rule> {
        self.rules.iter().copied().find(|r| r.name() == name)
    }
}
