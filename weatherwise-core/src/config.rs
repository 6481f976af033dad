use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::clock::ViewerZone;

/// Credentials and endpoint overrides for OpenWeatherMap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,

    /// Overrides `https://api.openweathermap.org/data/2.5`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_url: Option<String>,

    /// Overrides `https://api.openweathermap.org/geo/1.0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo_url: Option<String>,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// request_timeout_secs = 15
/// timezone = "Europe/Paris"
///
/// [openweather]
/// api_key = "..."
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Transport timeout for each HTTP request; unset means none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// IANA zone for forecast dates and hours; unset means the system zone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openweather: Option<ProviderConfig>,
}

impl Config {
    /// Load config from `path`, or return an empty default if it doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(config_dir()?.join("config.toml"))
    }

    /// Set or replace the API key, keeping any endpoint overrides.
    pub fn set_api_key(&mut self, api_key: String) {
        match self.openweather.as_mut() {
            Some(provider) => provider.api_key = api_key,
            None => {
                self.openweather = Some(ProviderConfig { api_key, data_url: None, geo_url: None })
            }
        }
    }

    /// Returns the API key, if one is configured and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.openweather
            .as_ref()
            .map(|cfg| cfg.api_key.trim())
            .filter(|key| !key.is_empty())
    }

    /// The zone named by `timezone`, or the system zone.
    pub fn viewer_zone(&self) -> Result<ViewerZone> {
        match self.timezone.as_deref().map(str::trim).filter(|name| !name.is_empty()) {
            None => Ok(ViewerZone::System),
            Some(name) => name
                .parse()
                .map(ViewerZone::Named)
                .map_err(|err| anyhow!("Invalid timezone '{name}' in config: {err}")),
        }
    }

    /// Like [`Config::api_key`], with a hint on how to fix a missing key.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key().ok_or_else(|| {
            anyhow!(
                "No OpenWeatherMap API key configured.\n\
                 Hint: run `weatherwise configure` and enter your API key."
            )
        })
    }
}

/// Platform config directory shared by the config and preference files.
pub fn config_dir() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("dev", "weatherwise", "weatherwise")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

    Ok(dirs.config_dir().to_path_buf())
}
