use anyhow::Result;
use cypher_guard::classify;

use crate::cli::OutputFormat;
use crate::output::{self, Classification};

pub fn execute(version_string: &str, format: OutputFormat) -> Result<()> {
    let version = classify(version_string)?;
    let classification = Classification {
        input: version_string,
        version,
        display: version.to_string(),
    };
    println!("{}", output::render_classification(&classification, format)?);
    Ok(())
}
