//! Configuration management for gleaner.
//!
//! Configuration is read from `~/.config/gleaner/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::app::GleanerError;
use crate::browser::BrowserSettings;
use crate::fetcher::HttpSettings;
use crate::normalizer::{CanonicalTimestamp, DEFAULT_UTC_OFFSET_MINUTES};
use crate::strategy::DEFAULT_IGNORED_SUFFIXES;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub browser: BrowserSettings,
    pub harvest: HarvestSettings,
    pub http: HttpSettings,
    pub pipeline: PipelineSettings,
    pub git: GitSettings,
}

/// Defaults for feed harvesting.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HarvestSettings {
    /// Oldest item to keep, as `YYYY-MM-DD HH:MM` in the source calendar.
    /// One day before the current source time when unset.
    pub min_date: Option<CanonicalTimestamp>,
    pub max_reveals: u32,
    /// UTC offset of the source's wall clock, in minutes.
    pub utc_offset_minutes: i32,
}

impl Default for HarvestSettings {
    fn default() -> Self {
        Self {
            min_date: None,
            max_reveals: 5,
            utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Links extracted concurrently.
    pub workers: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self { workers: 4 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GitSettings {
    /// Repository paths with any component ending in one of these are skipped.
    pub ignored_suffixes: Vec<String>,
}

impl Default for GitSettings {
    fn default() -> Self {
        Self {
            ignored_suffixes: DEFAULT_IGNORED_SUFFIXES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/gleaner/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("gleaner").join("config.toml"))
    }

    /// Get the default database path: `<data_dir>/gleaner/gleaner.db`
    pub fn default_database_path() -> Result<PathBuf, ConfigError> {
        let data_dir = dirs::data_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(data_dir.join("gleaner").join("gleaner.db"))
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# gleaner configuration
#
# Timestamps are written as "YYYY-MM-DD HH:MM" in the Solar Hijri calendar,
# e.g. "1404-11-24 00:00".

[browser]
# Run the browser without a visible window
headless = true

# Page navigation timeout in seconds
timeout_secs = 30

# Wait time after page load for dynamic content (milliseconds)
wait_after_load_ms = 1000

# How long to wait for new feed items after "load more" (seconds)
reveal_timeout_secs = 10

# Polling interval while waiting for feed items (milliseconds)
poll_interval_ms = 250

[harvest]
# Oldest feed item to keep; defaults to one day ago when unset
# min_date = "1404-11-24 00:00"

# Maximum number of "load more" clicks per feed
max_reveals = 5

# UTC offset of the source's clock in minutes (Tehran: +03:30)
utc_offset_minutes = 210

[http]
# Request timeout in seconds
timeout_secs = 10

[pipeline]
# Number of links extracted concurrently
workers = 4

[git]
# Repository paths with any component ending in one of these are skipped
ignored_suffixes = [".git", ".toml", ".lock", ".png", ".jpg"]
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl From<ConfigError> for GleanerError {
    fn from(value: ConfigError) -> Self {
        GleanerError::Configuration(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_deserializes() {
        let content = Config::default_config_content();
        let config: Config = toml::from_str(&content).expect("Default config should be valid TOML");

        assert!(config.browser.headless);
        assert_eq!(config.browser.reveal_timeout_secs, 10);
        assert_eq!(config.harvest.max_reveals, 5);
        assert_eq!(config.harvest.utc_offset_minutes, 210);
        assert!(config.harvest.min_date.is_none());
        assert_eq!(config.pipeline.workers, 4);
        assert_eq!(config.git.ignored_suffixes, vec![".git", ".toml", ".lock", ".png", ".jpg"]);
    }

    #[test]
    fn test_partial_config() {
        let content = r##"
[harvest]
min_date = "1404-11-24 00:00"

[pipeline]
workers = 8
"##;
        let config: Config = toml::from_str(content).expect("Partial config should work");

        // Custom values
        assert_eq!(
            config.harvest.min_date.as_ref().map(|d| d.as_str()),
            Some("1404-11-24 00:00")
        );
        assert_eq!(config.pipeline.workers, 8);
        // Default values
        assert_eq!(config.harvest.max_reveals, 5);
        assert_eq!(config.http.timeout_secs, 10);
    }

    #[test]
    fn test_invalid_min_date_rejected() {
        let content = r##"
[harvest]
min_date = "yesterday"
"##;
        assert!(toml::from_str::<Config>(content).is_err());
    }

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").expect("Empty config should work");

        assert_eq!(config.browser.timeout_secs, 30);
        assert_eq!(config.pipeline.workers, 4);
    }

    #[test]
    fn test_load_from_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[pipeline]\nworkers = \"many\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.toml"));

        let missing = Config::load_from(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }
}
