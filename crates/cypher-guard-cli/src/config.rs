use anyhow::{Context, Result};
use cypher_guard::RewriterConfig;
use std::path::Path;
use tracing::debug;

/// Command-line overrides layered over the config file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub db_version: Option<String>,
    pub allow_apoc: bool,
    pub no_strict: bool,
}

/// Load the rewriter config from `path`, or defaults when no file is given
pub fn load(path: Option<&Path>) -> Result<RewriterConfig> {
    match path {
        Some(path) => RewriterConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => {
            debug!("No config file given, using defaults");
            Ok(RewriterConfig::default())
        }
    }
}

/// Apply command-line overrides; flags only ever switch away from defaults
pub fn apply_overrides(mut config: RewriterConfig, overrides: ConfigOverrides) -> RewriterConfig {
    if let Some(version) = overrides.db_version {
        config.version = version;
    }
    if overrides.allow_apoc {
        config.allow_apoc = true;
    }
    if overrides.no_strict {
        config.strict = false;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_without_path_uses_defaults() {
        assert_eq!(load(None).unwrap(), RewriterConfig::default());
    }

    #[test]
    fn test_load_reports_path_on_failure() {
        let err = load(Some(Path::new("/nonexistent/cyg.toml"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/cyg.toml"));
    }

    #[test]
    fn test_overrides_win_over_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "version = \"5.12\"\nallow_apoc = false").unwrap();

        let config = load(Some(file.path())).unwrap();
        let config = apply_overrides(
            config,
            ConfigOverrides {
                db_version: Some("4.4".to_string()),
                allow_apoc: true,
                no_strict: true,
            },
        );
        assert_eq!(config.version, "4.4");
        assert!(config.allow_apoc);
        assert!(!config.strict);
    }

    #[test]
    fn test_absent_flags_keep_file_values() {
        let config = RewriterConfig {
            version: "4.0".to_string(),
            allow_apoc: true,
            strict: false,
        };
        let merged = apply_overrides(config.clone(), ConfigOverrides::default());
        assert_eq!(merged, config);
    }
}
