//! Rewriter configuration
//!
//! Loaded from TOML; every field has a default so an empty file is valid.
//!
//! ```toml
//! version = "5.12.0"
//! allow_apoc = false
//! strict = true
//! ```

use crate::error::{ConfigError, ConfigResult};
use crate::rewriter::{CypherRewriter, RewriteOptions};
use crate::version::classify;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Configuration for query rewriting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriterConfig {
    /// Target database version string, classified into a tier on use.
    ///
    /// Default: "5"
    #[serde(default = "default_version")]
    pub version: String,

    /// Leave APOC calls untouched instead of converting or rejecting them.
    ///
    /// Default: false
    #[serde(default)]
    pub allow_apoc: bool,

    /// Reserved strictness flag.
    ///
    /// Default: true
    #[serde(default = "default_strict")]
    pub strict: bool,
}

fn default_version() -> String {
    "5".to_string()
}

fn default_strict() -> bool {
    true
}

impl Default for RewriterConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            allow_apoc: false,
            strict: default_strict(),
        }
    }
}

impl RewriterConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        debug!("Loading rewriter config from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Resolve into rewrite options, classifying the version string
    pub fn to_options(&self) -> ConfigResult<RewriteOptions> {
        let version = classify(&self.version).map_err(ConfigError::InvalidVersion)?;
        Ok(RewriteOptions {
            version,
            allow_apoc: self.allow_apoc,
            strict: self.strict,
        })
    }

    /// Build a rewriter from this configuration
    pub fn rewriter(&self) -> ConfigResult<CypherRewriter> {
        Ok(CypherRewriter::from_options(self.to_options()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::CypherVersion;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = RewriterConfig::default();
        assert_eq!(config.version, "5");
        assert!(!config.allow_apoc);
        assert!(config.strict);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = RewriterConfig::from_toml_str("").unwrap();
        assert_eq!(config, RewriterConfig::default());
    }

    #[test]
    fn test_deserialize_custom() {
        let toml = r#"
            version = "4.4.18"
            allow_apoc = true
            strict = false
        "#;
        let config = RewriterConfig::from_toml_str(toml).unwrap();
        let options = config.to_options().unwrap();
        assert_eq!(options.version, CypherVersion::V4);
        assert!(options.allow_apoc);
        assert!(!options.strict);
    }

    #[test]
    fn test_invalid_version_surfaces_on_use() {
        let config = RewriterConfig::from_toml_str(r#"version = "latest""#).unwrap();
        let err = config.to_options().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVersion(_)));
    }

    #[test]
    fn test_invalid_toml() {
        let err = RewriterConfig::from_toml_str("allow_apoc = \"maybe\"").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "version = \"2025.11.2\"").unwrap();

        let config = RewriterConfig::load(file.path()).unwrap();
        let rewriter = config.rewriter().unwrap();
        assert_eq!(rewriter.version(), CypherVersion::V5);
    }

    #[test]
    fn test_load_missing_file() {
        let err = RewriterConfig::load("/nonexistent/cypher-guard.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = RewriterConfig {
            version: "4.0".to_string(),
            allow_apoc: true,
            strict: false,
        };
        let serialized = toml::to_string(&config).unwrap();
        let deserialized = RewriterConfig::from_toml_str(&serialized).unwrap();
        assert_eq!(config, deserialized);
    }
}
