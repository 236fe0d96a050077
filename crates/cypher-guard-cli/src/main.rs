use anyhow::Result;
use clap::Parser;
use tracing::debug;

use cypher_guard_cli::{
    cli::{Cli, Commands},
    commands::{self, rewrite::QueryInput},
    config::{self, ConfigOverrides},
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the result
    let level = cli.log_filter().to_string().to_lowercase();
    let env_filter = format!("cypher_guard={},cypher_guard_cli={}", level, level);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(env_filter))
        .with_writer(std::io::stderr)
        .init();

    let base = config::load(cli.config.as_deref())?;
    debug!("Loaded config: {:?}", base);

    match cli.command {
        Commands::Rewrite {
            query,
            file,
            db_version,
            allow_apoc,
            no_strict,
        } => {
            let config = config::apply_overrides(
                base,
                ConfigOverrides {
                    db_version,
                    allow_apoc,
                    no_strict,
                },
            );
            commands::rewrite::execute(config, QueryInput::from_args(query, file), cli.format)
        }
        Commands::Classify { version } => commands::classify::execute(&version, cli.format),
        Commands::Rules { db_version } => {
            let config = config::apply_overrides(
                base,
                ConfigOverrides {
                    db_version,
                    ..Default::default()
                },
            );
            commands::rules::execute(config, cli.format)
        }
    }
}
