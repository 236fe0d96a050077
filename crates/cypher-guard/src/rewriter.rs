//! Version-aware rewrite pipeline.
//!
//! ## Stages (Neo4j 5+)
//!
//! 1. **Trim** the input
//! 2. **Sanitize** projection scopes (if any `WITH` is present)
//! 3. **Rules** from the standard [`RuleSet`], in registry order
//! 4. **Repair** the last projection for the final `RETURN`
//! 5. **Safety** validation
//!
//! Older tiers accept the original syntax, so only trimming and safety
//! validation run there. Any stage error aborts the rest: a call either
//! returns a fully rewritten, validated query or nothing.

use crate::changes::{ChangeLog, RewriteOutcome};
use crate::error::RewriteResult;
use crate::rules::RuleSet;
use crate::safety::SafetyValidator;
use crate::scope;
use crate::version::{detect_version, CypherVersion, VersionSource};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Change log entry appended whenever the output differs from the input
pub const QUERY_REWRITTEN: &str = "Query rewritten";

/// Inputs that select rewrite behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteOptions {
    /// Target version tier
    pub version: CypherVersion,
    /// Leave APOC calls untouched instead of converting or rejecting them
    pub allow_apoc: bool,
    /// Reserved for severity tuning; accepted but does not change behavior yet
    pub strict: bool,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            version: CypherVersion::latest(),
            allow_apoc: false,
            strict: true,
        }
    }
}

/// Rewrites generated Cypher for a target version and gates it for safety.
///
/// Holds configuration only; every call allocates its own state, so one
/// rewriter can be shared freely across threads.
#[derive(Debug, Clone)]
pub struct CypherRewriter {
    options: RewriteOptions,
    rules: &'static RuleSet,
    validator: SafetyValidator,
}

impl CypherRewriter {
    /// Create a rewriter for `version` with APOC disallowed and strict mode on
    pub fn new(version: CypherVersion) -> Self {
        Self::from_options(RewriteOptions {
            version,
            ..RewriteOptions::default()
        })
    }

    pub fn from_options(options: RewriteOptions) -> Self {
        Self {
            options,
            rules: RuleSet::standard(),
            validator: SafetyValidator,
        }
    }

    /// Create a rewriter for the version reported by `source`
    pub fn for_source<S: VersionSource + ?Sized>(source: &S) -> RewriteResult<Self> {
        Ok(Self::new(detect_version(source)?))
    }

    pub fn allow_apoc(mut self, allow: bool) -> Self {
        self.options.allow_apoc = allow;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.options.strict = strict;
        self
    }

    pub fn options(&self) -> &RewriteOptions {
        &self.options
    }

    pub fn version(&self) -> CypherVersion {
        self.options.version
    }

    /// Rewrite and validate `query`.
    pub fn rewrite(&self, query: &str) -> RewriteResult<RewriteOutcome> {
        let trimmed = query.trim();
        let mut changes = ChangeLog::new();

        debug!(
            version = %self.options.version,
            allow_apoc = self.options.allow_apoc,
            strict = self.options.strict,
            "Rewriting query"
        );

        let rewritten = if self.options.version >= CypherVersion::V5 {
            self.rewrite_for_v5(trimmed, &mut changes)?
        } else {
            trimmed.to_string()
        };

        self.validator.validate(&rewritten)?;

        if rewritten != trimmed {
            changes.record(QUERY_REWRITTEN);
        }

        Ok(RewriteOutcome {
            query: rewritten,
            changes,
        })
    }

    fn rewrite_for_v5(&self, query: &str, changes: &mut ChangeLog) -> RewriteResult<String> {
        let has_projection = scope::has_projection(query);

        let mut q = if has_projection {
            debug!("Sanitizing WITH projections");
            scope::sanitize(query, changes)
        } else {
            query.to_string()
        };

        for rule in self.rules.rules_for(self.options.version) {
            q = rule.apply(q, &self.options, changes).map_err(|err| {
                warn!(rule = rule.name(), "Rewrite rejected: {}", err);
                err
            })?;
        }

        if has_projection {
            debug!("Repairing final projection scope");
            q = scope::repair(&q, changes);
        }

        Ok(q)
    }
}

/// Rewrite `query` with a one-off rewriter.
pub fn rewrite(
    query: &str,
    version: CypherVersion,
    allow_apoc: bool,
    strict: bool,
) -> RewriteResult<RewriteOutcome> {
    CypherRewriter::new(version)
        .allow_apoc(allow_apoc)
        .strict(strict)
        .rewrite(query)
}
