use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages, including every rewrite applied
    Info,
    /// Debug messages
    Debug,
    /// Trace-level messages (most verbose)
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text: results on stdout, change log on stderr
    #[default]
    Text,
    /// A single JSON document on stdout
    Json,
}

#[derive(Parser)]
#[command(name = "cyg")]
#[command(about = "cyg - rewrite generated Cypher for a Neo4j version and reject unsafe queries")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (off, error, warn, info, debug, trace)
    /// Defaults to 'warn'
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Rewriter config file (TOML with version, allow_apoc, strict)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Set output format (text, json)
    #[arg(short = 'f', long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl Cli {
    /// Effective log filter; an explicit level wins over `--verbose`
    pub fn log_filter(&self) -> LevelFilter {
        match (self.log_level, self.verbose) {
            (Some(level), _) => level.into(),
            (None, true) => LevelFilter::DEBUG,
            (None, false) => LevelFilter::WARN,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rewrite a query for the target version and validate it
    Rewrite {
        /// Query text (reads --file or stdin if omitted)
        query: Option<String>,

        /// Read the query from a file
        #[arg(long, conflicts_with = "query")]
        file: Option<PathBuf>,

        /// Target database version string, e.g. "4.4.12" or "5.15" (overrides config)
        #[arg(short = 'd', long)]
        db_version: Option<String>,

        /// Leave APOC calls untouched
        #[arg(long)]
        allow_apoc: bool,

        /// Turn off strict mode
        #[arg(long)]
        no_strict: bool,
    },

    /// Show the version tier a version string maps to
    Classify {
        /// Database version string
        version: String,
    },

    /// List the rewrite rules that run for a version
    Rules {
        /// Target database version string (overrides config)
        #[arg(short = 'd', long)]
        db_version: Option<String>,
    },
}
