use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::retry::{DEFAULT_MAX_DELAY_MS, RetryPolicy};

pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// language = "es"
/// cache_ttl_secs = 600
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Language passed to the geocoding provider.
    pub language: String,
    pub geocoding_url: String,
    pub reverse_geocoding_url: String,
    pub forecast_url: String,
    pub http_timeout_secs: u64,
    /// How long a fetched snapshot is served without refetching.
    pub cache_ttl_secs: u64,
    /// Additional attempts after the first transient failure.
    pub max_retries: u32,
    pub retry_initial_delay_ms: u64,
    /// Where preferences and history are persisted. Defaults to the platform data dir.
    pub storage_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            reverse_geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            http_timeout_secs: 10,
            cache_ttl_secs: 300,
            max_retries: 2,
            retry_initial_delay_ms: 200,
            storage_dir: None,
        }
    }
}

impl Config {
    /// Load config from disk, or return the defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    /// Refuses to write anything [`Config::load`] would later reject.
    pub fn save(&self) -> Result<()> {
        self.validate()?;
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Directory holding the persisted preferences/history blob.
    pub fn storage_dir(&self) -> Result<PathBuf> {
        match &self.storage_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::project_dirs()?.data_dir().to_path_buf()),
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, self.retry_initial_delay_ms, DEFAULT_MAX_DELAY_MS)
    }

    fn validate(&self) -> Result<()> {
        if self.language.trim().is_empty() {
            return Err(anyhow!("`language` must not be empty"));
        }
        for (field, url) in [
            ("geocoding_url", &self.geocoding_url),
            ("reverse_geocoding_url", &self.reverse_geocoding_url),
            ("forecast_url", &self.forecast_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(anyhow!("`{field}` must be an http(s) URL, got '{url}'"));
            }
        }
        if self.http_timeout_secs == 0 {
            return Err(anyhow!("`http_timeout_secs` must be greater than zero"));
        }
        Ok(())
    }
}
