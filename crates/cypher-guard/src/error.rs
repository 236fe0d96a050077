//! Error types for query rewriting and configuration

use thiserror::Error;

/// Reasons a rewrite attempt is rejected.
///
/// A rejected query must never be executed. Every variant carries enough
/// context (rule name or offending keyword) to report upstream without
/// re-scanning the query.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RewriteError {
    /// Leading component of a version string is not an integer
    #[error("Malformed version string: '{input}'")]
    MalformedVersion { input: String },

    /// Construct that is never valid in the target dialect
    #[error("{construct} is invalid Cypher (rule: {rule})")]
    StructurallyInvalid {
        rule: &'static str,
        construct: &'static str,
    },

    /// APOC call that could not be converted while extensions are disallowed
    #[error("APOC usage is not allowed in Neo4j 5: {call}")]
    DisallowedExtension { call: String },

    /// Mutating or administrative operation in the final text
    #[error("Forbidden operation detected: {keyword}")]
    ForbiddenOperation { keyword: &'static str },
}

impl RewriteError {
    /// Name of the rule or stage that produced this error.
    pub fn rule_name(&self) -> &'static str {
        match self {
            RewriteError::MalformedVersion { .. } => "version",
            RewriteError::StructurallyInvalid { rule, .. } => rule,
            RewriteError::DisallowedExtension { .. } => "apoc-to-native",
            RewriteError::ForbiddenOperation { .. } => "safety",
        }
    }
}

/// Result type for rewrite operations
pub type RewriteResult<T> = Result<T, RewriteError>;

/// Errors raised while loading rewriter configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// I/O error reading the config file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Configured version string could not be classified
    #[error("Invalid version in config: {0}")]
    InvalidVersion(#[from] RewriteError),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
