use anyhow::{bail, Context, Result};
use cypher_guard::RewriterConfig;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::cli::OutputFormat;
use crate::output;

/// Where the query text comes from
#[derive(Debug, Clone)]
pub enum QueryInput {
    Inline(String),
    File(PathBuf),
    Stdin,
}

impl QueryInput {
    pub fn from_args(query: Option<String>, file: Option<PathBuf>) -> Self {
        match (query, file) {
            (Some(query), _) => QueryInput::Inline(query),
            (None, Some(path)) => QueryInput::File(path),
            (None, None) => QueryInput::Stdin,
        }
    }

    pub fn read(self) -> Result<String> {
        let text = match self {
            QueryInput::Inline(query) => query,
            QueryInput::File(path) => read_file(&path)?,
            QueryInput::Stdin => {
                let mut buffer = String::new();
                std::io::stdin()
                    .read_to_string(&mut buffer)
                    .context("Failed to read query from stdin")?;
                buffer
            }
        };

        if text.trim().is_empty() {
            bail!("No query given");
        }
        Ok(text)
    }
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read query from {}", path.display()))
}

pub fn execute(config: RewriterConfig, input: QueryInput, format: OutputFormat) -> Result<()> {
    let rewriter = config.rewriter()?;
    let query = input.read()?;

    debug!("Rewriting {} byte query for {}", query.len(), rewriter.version());

    let outcome = rewriter.rewrite(&query).map_err(|err| {
        let rule = err.rule_name();
        anyhow::Error::new(err).context(format!("Query rejected ({})", rule))
    })?;

    info!("Query approved with {} change(s)", outcome.changes.len());

    let (stdout, changes) = output::render_outcome(&outcome, format)?;
    println!("{}", stdout);
    if let Some(changes) = changes {
        eprintln!("{}", changes);
    }

    Ok(())
}
