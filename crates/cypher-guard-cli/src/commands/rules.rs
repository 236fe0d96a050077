use anyhow::Result;
use cypher_guard::{classify, RewriterConfig, RuleSet};

use crate::cli::OutputFormat;
use crate::output::{self, RuleInfo};

pub fn execute(config: RewriterConfig, format: OutputFormat) -> Result<()> {
    let version = classify(&config.version)?;
    let rules: Vec<RuleInfo> = RuleSet::standard()
        .rules_for(version)
        .map(RuleInfo::from)
        .collect();

    println!("{}", output::render_rules(version, &rules, format)?);
    Ok(())
}
