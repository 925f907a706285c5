use std::path::Path;

use crate::error::ConfigError;
use crate::monitor::MonitorConfig;
use crate::selector::SelectorConfig;
use crate::store::FsStoreConfig;

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: FsStoreConfig,
    pub selector: SelectorConfig,
    pub monitor: MonitorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            store: FsStoreConfig::default(),
            selector: SelectorConfig::default(),
            monitor: MonitorConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::warn!(
                path = %path.display(),
                "config file not found, using defaults"
            );
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.prefix.is_empty() {
            return Err(ConfigError::Validation(
                "store.prefix must not be empty".into(),
            ));
        }
        if self.store.prefix.contains('/') || self.store.prefix.contains(char::is_whitespace) {
            return Err(ConfigError::Validation(
                "store.prefix must not contain '/' or whitespace".into(),
            ));
        }
        if self.monitor.history_window == 0 {
            return Err(ConfigError::Validation(
                "monitor.history_window must be > 0".into(),
            ));
        }
        if self.monitor.log_interval == 0 {
            return Err(ConfigError::Validation(
                "monitor.log_interval must be > 0".into(),
            ));
        }
        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}
