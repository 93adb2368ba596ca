use crate::actions::EnabledActions;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Environment override for the API base URL.
pub const BASE_URL_ENV: &str = "SHELF_API_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoint_base_url: String,
    pub stock_filter_enabled: bool,
    pub timeout_secs: u64,
    pub enabled_actions: EnabledActions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint_base_url: DEFAULT_BASE_URL.to_string(),
            stock_filter_enabled: true,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            enabled_actions: EnabledActions::default(),
        }
    }
}

impl Config {
    pub fn config_path() -> anyhow::Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "tropicbridge", "shelf")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        let config_dir = proj_dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, then apply `SHELF_API_URL`.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            config.apply_base_url(&url)?;
        }
        Ok(config)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn apply_base_url(&mut self, url: &str) -> anyhow::Result<()> {
        let url = url.trim();
        let parsed = reqwest::Url::parse(url)
            .map_err(|e| anyhow::anyhow!("Invalid API URL '{}': {}", url, e))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            anyhow::bail!("Invalid API URL '{}': expected http:// or https:// with a host", url);
        }
        self.endpoint_base_url = url.trim_end_matches('/').to_string();
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be greater than zero");
        }
        if reqwest::Url::parse(&self.endpoint_base_url).is_err() {
            anyhow::bail!("Invalid endpoint_base_url: {}", self.endpoint_base_url);
        }
        Ok(())
    }
}
