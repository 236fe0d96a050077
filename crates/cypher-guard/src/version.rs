//! Neo4j version tiers.
//!
//! A tier is derived once per connection from the server's reported version
//! string and decides which rewrite rules apply. Both semantic (`5.12.0`,
//! `4.4.18`) and calendar (`2025.11.2`) versioning are understood: calendar
//! years are numerically above 5 and land on the newest tier.

use crate::error::{RewriteError, RewriteResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// Capability tier of the target database
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CypherVersion {
    /// Neo4j 4.x and older
    V4,
    /// Neo4j 5.x and calendar-versioned releases
    V5,
}

impl CypherVersion {
    /// The newest known tier
    pub fn latest() -> Self {
        CypherVersion::V5
    }
}

impl fmt::Display for CypherVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CypherVersion::V4 => write!(f, "Neo4j 4"),
            CypherVersion::V5 => write!(f, "Neo4j 5+"),
        }
    }
}

impl FromStr for CypherVersion {
    type Err = RewriteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        classify(s)
    }
}

/// Classify a dotted version string into a tier.
///
/// Only the leading component is inspected. Fails with
/// [`RewriteError::MalformedVersion`] if it is not an integer.
pub fn classify(version_string: &str) -> RewriteResult<CypherVersion> {
    let trimmed = version_string.trim();
    let major = trimmed.split('.').next().unwrap_or_default();

    let major: u32 = major.parse().map_err(|_| RewriteError::MalformedVersion {
        input: version_string.to_string(),
    })?;

    if major >= 5 {
        Ok(CypherVersion::V5)
    } else {
        Ok(CypherVersion::V4)
    }
}

/// Anything that can report the target database's version string.
///
/// Typically a driver wrapper running `CALL dbms.components()`; the rewriter
/// itself never talks to the database.
pub trait VersionSource {
    /// Raw version string as reported by the server, e.g. `"5.12.0"`
    fn version_string(&self) -> String;
}

impl VersionSource for str {
    fn version_string(&self) -> String {
        self.to_string()
    }
}

impl VersionSource for String {
    fn version_string(&self) -> String {
        self.clone()
    }
}

/// Classify the version reported by `source`.
pub fn detect_version<S: VersionSource + ?Sized>(source: &S) -> RewriteResult<CypherVersion> {
    let raw = source.version_string();
    let version = classify(&raw)?;
    info!("Detected Neo4j version {} ({})", raw, version);
    Ok(version)
}
