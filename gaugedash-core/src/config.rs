// gaugedash-core/src/config.rs
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::options::PanelOptions;
use crate::threshold::ThresholdError;

pub const CONFIG_FILE_NAME: &str = "gaugedash.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config directory not found")]
    NoConfigDir,
    #[error("Invalid thresholds in panel '{panel}': {source}")]
    Thresholds {
        panel: String,
        #[source]
        source: ThresholdError,
    },
    #[error("Panel '{name}' not found. Available: {available}")]
    PanelNotFound { name: String, available: String },
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub panel: Vec<PanelConfig>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PanelConfig {
    pub name: String,
    #[serde(default)]
    pub options: PanelOptions,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            panel: vec![PanelConfig {
                name: "default".to_string(),
                options: PanelOptions::default(),
            }],
        }
    }
}

impl ConfigFile {
    /// Load the first config found: ./gaugedash.toml, then
    /// <config dir>/gaugedash/gaugedash.toml, else the built-in default
    pub fn load() -> Result<Self, ConfigError> {
        for path in Self::search_paths()? {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        tracing::info!("no config file found, using defaults");
        Ok(Self::default())
    }

    fn search_paths() -> Result<[PathBuf; 2], ConfigError> {
        Ok([
            std::env::current_dir()?.join(CONFIG_FILE_NAME),
            dirs::config_dir()
                .ok_or(ConfigError::NoConfigDir)?
                .join("gaugedash")
                .join(CONFIG_FILE_NAME),
        ])
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        tracing::info!(path = %path.display(), "loading config");
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse and validate every panel's threshold list
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;

        for panel in &config.panel {
            panel
                .options
                .thresholds
                .validate()
                .map_err(|source| ConfigError::Thresholds {
                    panel: panel.name.clone(),
                    source,
                })?;
        }

        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn get_panel(&self, name: &str) -> Result<&PanelConfig, ConfigError> {
        self.panel
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| ConfigError::PanelNotFound {
                name: name.to_string(),
                available: self
                    .panel
                    .iter()
                    .map(|p| p.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}
