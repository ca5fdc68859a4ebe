//! Cleaner configuration.
//!
//! Defaults for the age threshold and report file name, plus optional
//! exclusion patterns, loaded from a TOML file:
//!
//! ```toml
//! [cleaner]
//! age_days = 365
//! report_name = "cleaner-report.log"
//!
//! [filters]
//! exclude = ["*.part", "desktop.ini"]
//! ```
//!
//! Every key is optional; missing keys fall back to the built-in defaults.

use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the current directory.
pub const LOCAL_CONFIG_NAME: &str = ".download-cleaner.toml";

/// Default age, in days, after which a file counts as old.
pub const DEFAULT_AGE_DAYS: u32 = 365;

/// Default report file name, written inside the cleaned directory.
pub const DEFAULT_REPORT_NAME: &str = "cleaner-report.log";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested configuration file does not exist.
    #[error("configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax, structure or values.
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),
    /// An exclusion pattern is not a valid glob.
    #[error("invalid glob pattern '{pattern}': {reason}")]
    InvalidGlobPattern { pattern: String, reason: String },
    /// The configuration file exists but could not be read.
    #[error("failed to read configuration {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Complete configuration, as deserialized from TOML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanerConfig {
    #[serde(default)]
    pub cleaner: CleanerSettings,
    #[serde(default)]
    pub filters: FilterRules,
}

/// Run defaults that CLI flags may override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanerSettings {
    /// Age threshold in whole days.
    #[serde(default = "default_age_days")]
    pub age_days: u32,
    /// Report file name inside the cleaned directory.
    #[serde(default = "default_report_name")]
    pub report_name: String,
}

fn default_age_days() -> u32 {
    DEFAULT_AGE_DAYS
}

fn default_report_name() -> String {
    DEFAULT_REPORT_NAME.to_string()
}

impl Default for CleanerSettings {
    fn default() -> Self {
        Self {
            age_days: default_age_days(),
            report_name: default_report_name(),
        }
    }
}

/// File exclusion rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRules {
    /// Glob patterns matched against base file names (e.g. "*.part").
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl CleanerConfig {
    /// Load configuration, falling back to defaults.
    ///
    /// Lookup order:
    /// 1. `config_path`, when given (it must exist)
    /// 2. `.download-cleaner.toml` in the current directory
    /// 3. `<config dir>/download-cleaner/config.toml`
    /// 4. built-in defaults
    pub fn load(config_path: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_NAME);
        if local_config.is_file() {
            return Self::load_from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("download-cleaner").join("config.toml");
            if user_config.is_file() {
                return Self::load_from_file(&user_config);
            }
        }

        log::debug!("no configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::parse(&content)?;
        log::info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration text.
    pub fn parse(content: &str) -> ConfigResult<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        let name = self.cleaner.report_name.as_str();
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(ConfigError::ConfigInvalid(format!(
                "report_name must be a plain file name, got '{}'",
                name
            )));
        }
        Ok(())
    }

    /// Compile the exclusion patterns.
    pub fn compile_filters(&self) -> ConfigResult<CompiledFilters> {
        CompiledFilters::new(&self.filters)
    }
}

/// Pre-compiled exclusion patterns.
#[derive(Debug, Clone, Default)]
pub struct CompiledFilters {
    exclude_patterns: Vec<Pattern>,
}

impl CompiledFilters {
    fn new(rules: &FilterRules) -> ConfigResult<Self> {
        let exclude_patterns = rules
            .exclude
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|e| ConfigError::InvalidGlobPattern {
                    pattern: pattern.clone(),
                    reason: e.msg.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { exclude_patterns })
    }

    /// Returns false when the file name matches an exclusion pattern.
    pub fn should_include(&self, file_name: &str) -> bool {
        !self
            .exclude_patterns
            .iter()
            .any(|pattern| pattern.matches(file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = CleanerConfig::default();
        assert_eq!(config.cleaner.age_days, 365);
        assert_eq!(config.cleaner.report_name, "cleaner-report.log");
        assert!(config.filters.exclude.is_empty());
    }

    #[test]
    fn test_parse_empty_uses_defaults() {
        let config = CleanerConfig::parse("").unwrap();
        assert_eq!(config, CleanerConfig::default());
    }

    #[test]
    fn test_parse_partial_config() {
        let config = CleanerConfig::parse("[cleaner]\nage_days = 30\n").unwrap();
        assert_eq!(config.cleaner.age_days, 30);
        assert_eq!(config.cleaner.report_name, DEFAULT_REPORT_NAME);
    }

    #[test]
    fn test_parse_full_config() {
        let config = CleanerConfig::parse(
            r#"
            [cleaner]
            age_days = 7
            report_name = "tidy.log"

            [filters]
            exclude = ["*.part", "desktop.ini"]
            "#,
        )
        .unwrap();
        assert_eq!(config.cleaner.age_days, 7);
        assert_eq!(config.cleaner.report_name, "tidy.log");
        assert_eq!(config.filters.exclude, vec!["*.part", "desktop.ini"]);
    }

    #[test]
    fn test_parse_rejects_negative_age() {
        let result = CleanerConfig::parse("[cleaner]\nage_days = -1\n");
        assert!(matches!(result, Err(ConfigError::ConfigInvalid(_))));
    }

    #[test]
    fn test_parse_rejects_report_path() {
        let result = CleanerConfig::parse("[cleaner]\nreport_name = \"../out.log\"\n");
        assert!(matches!(result, Err(ConfigError::ConfigInvalid(_))));
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let missing = temp_dir.path().join("nope.toml");
        let result = CleanerConfig::load(Some(&missing));
        assert!(matches!(result, Err(ConfigError::ConfigNotFound(_))));
    }

    #[test]
    fn test_load_explicit_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("cleaner.toml");
        fs::write(&path, "[cleaner]\nage_days = 90\n").expect("Failed to write config");

        let config = CleanerConfig::load(Some(&path)).unwrap();
        assert_eq!(config.cleaner.age_days, 90);
    }

    #[test]
    fn test_exclude_patterns() {
        let config = CleanerConfig {
            filters: FilterRules {
                exclude: vec!["*.part".to_string(), "desktop.ini".to_string()],
            },
            ..Default::default()
        };
        let filters = config.compile_filters().unwrap();

        assert!(!filters.should_include("movie.mp4.part"));
        assert!(!filters.should_include("desktop.ini"));
        assert!(filters.should_include("report.pdf"));
    }

    #[test]
    fn test_default_filters_include_everything() {
        let filters = CompiledFilters::default();
        assert!(filters.should_include(".hidden"));
        assert!(filters.should_include("anything.xyz"));
    }

    #[test]
    fn test_invalid_glob_pattern_returns_error() {
        let config = CleanerConfig {
            filters: FilterRules {
                exclude: vec!["[invalid".to_string()],
            },
            ..Default::default()
        };
        assert!(matches!(
            config.compile_filters(),
            Err(ConfigError::InvalidGlobPattern { .. })
        ));
    }
}
