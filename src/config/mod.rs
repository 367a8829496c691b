//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::models::year_number;
use crate::view::ViewMode;

/// Path checked when no `--config` is given.
pub const DEFAULT_CONFIG_PATH: &str = "./bracket-stats.toml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Statistics settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsConfig {
    /// First year counted by historical win rates. Defaults to the
    /// earliest year in the dataset.
    #[serde(default)]
    pub base_year: Option<String>,
}

/// Text view settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// `latest`, `predictor`, `champions`, `finalists` or a year
    #[serde(default = "default_mode")]
    pub default_mode: String,

    #[serde(default = "default_uppercase_names")]
    pub uppercase_names: bool,
}

fn default_mode() -> String {
    "latest".to_string()
}

fn default_uppercase_names() -> bool {
    true
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            default_mode: default_mode(),
            uppercase_names: default_uppercase_names(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub stats: StatsConfig,

    #[serde(default)]
    pub view: ViewConfig,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("./data/tournaments.json")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            log_level: default_log_level(),
            stats: StatsConfig::default(),
            view: ViewConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an explicit path, or from [`DEFAULT_CONFIG_PATH`] if it
    /// exists, or fall back to defaults.
    ///
    /// An explicit path that cannot be read is an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::from_file(default_path)
                } else {
                    debug!("No config at {}, using defaults", DEFAULT_CONFIG_PATH);
                    Ok(Self::default())
                }
            }
        }
    }

    /// The configured default view mode.
    pub fn default_view_mode(&self) -> Result<ViewMode, ConfigError> {
        self.view
            .default_mode
            .parse()
            .map_err(|e| ConfigError::ValidationError(format!("view.default_mode: {}", e)))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_file.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "data_file must not be empty".to_string(),
            ));
        }

        if let Some(base_year) = &self.stats.base_year {
            if year_number(base_year).is_none() {
                return Err(ConfigError::ValidationError(format!(
                    "stats.base_year is not a year: {:?}",
                    base_year
                )));
            }
        }

        self.default_view_mode()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.data_file, PathBuf::from("./data/tournaments.json"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.stats.base_year, None);
        assert_eq!(config.view.default_mode, "latest");
        assert!(config.view.uppercase_names);
    }

    #[test]
    fn test_config_validation_ok() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_base_year() {
        let mut config = AppConfig::default();
        config.stats.base_year = Some("twenty".to_string());

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_mode() {
        let mut config = AppConfig::default();
        config.view.default_mode = "sideways".to_string();

        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_config_validation_empty_data_file() {
        let mut config = AppConfig::default();
        config.data_file = PathBuf::new();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_partial() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "data_file = \"/srv/brackets.json\"\n\n[stats]\nbase_year = \"2014\"\n\n[view]\ndefault_mode = \"predictor\""
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.data_file, PathBuf::from("/srv/brackets.json"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.stats.base_year.as_deref(), Some("2014"));
        assert_eq!(config.default_view_mode().unwrap(), ViewMode::Predictor);
        assert!(config.view.uppercase_names);
    }

    #[test]
    fn test_from_file_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "data_file = [").unwrap();

        assert!(matches!(
            AppConfig::from_file(file.path()),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.toml");

        assert!(matches!(
            AppConfig::load_or_default(Some(path.as_path())),
            Err(ConfigError::ReadError(_))
        ));
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }
}
