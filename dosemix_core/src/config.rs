//! Configuration file support for Dosemix.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/dosemix/config.toml`.

use crate::report::Format;
use crate::share::DEFAULT_BASE_URL;
use crate::{DosageInput, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Prefilled input values
    #[serde(default)]
    pub defaults: DosageInput,

    #[serde(default)]
    pub share: ShareConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

/// Share link configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ShareConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Output configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct DisplayConfig {
    #[serde(default)]
    pub format: Format,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Load from `path` if given (must exist), else from the standard path
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from(p),
            None => Self::load(),
        }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        base.join("dosemix").join("config.toml")
    }

    /// Check values a TOML parse alone cannot
    ///
    /// Defaults may be degenerate (they are shown as such), but the share
    /// base URL has to be an absolute URL.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.share.base_url).map_err(|e| {
            Error::Config(format!(
                "share.base_url {:?} is not a valid URL: {}",
                self.share.base_url, e
            ))
        })?;
        Ok(())
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, self.to_toml()?)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Serialize to pretty TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))
    }
}
