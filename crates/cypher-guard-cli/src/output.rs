//! Rendering of command results in text or JSON.

use crate::cli::OutputFormat;
use anyhow::Result;
use cypher_guard::{CypherVersion, RewriteOutcome, Rule};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Classification<'a> {
    pub input: &'a str,
    pub version: CypherVersion,
    pub display: String,
}

#[derive(Debug, Serialize)]
pub struct RuleInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub min_version: CypherVersion,
}

impl From<&Rule> for RuleInfo {
    fn from(rule: &Rule) -> Self {
        Self {
            name: rule.name(),
            description: rule.description(),
            min_version: rule.min_version(),
        }
    }
}

/// Rewritten query for stdout, plus the change log (text mode puts it on stderr)
pub fn render_outcome(
    outcome: &RewriteOutcome,
    format: OutputFormat,
) -> Result<(String, Option<String>)> {
    match format {
        OutputFormat::Json => Ok((serde_json::to_string_pretty(outcome)?, None)),
        OutputFormat::Text => {
            let changes = (!outcome.changes.is_empty())
                .then(|| format!("Changes:\n{}", outcome.changes));
            Ok((outcome.query.clone(), changes))
        }
    }
}

pub fn render_classification(
    classification: &Classification<'_>,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(classification)?),
        OutputFormat::Text => Ok(classification.display.clone()),
    }
}

pub fn render_rules(
    version: CypherVersion,
    rules: &[RuleInfo],
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(rules)?),
        OutputFormat::Text if rules.is_empty() => {
            Ok(format!("No rewrite rules run for {}", version))
        }
        OutputFormat::Text => {
            let width = rules.iter().map(|r| r.name.len()).max().unwrap_or(0);
            Ok(rules
                .iter()
                .map(|r| format!("{:width$}  {}", r.name, r.description, width = width))
                .collect::<Vec<_>>()
                .join("\n"))
        }
    }
}
