use reqwest::Url;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info};

use crate::error::{Result, StatusboardError};
use crate::monitor::SiteEntry;
use crate::monitor::checker::{DEFAULT_PROXY_URL, DEFAULT_TIMEOUT};

pub const ENV_PROXY_URL: &str = "STATUSBOARD_PROXY_URL";
pub const ENV_TIMEOUT_MS: &str = "STATUSBOARD_TIMEOUT_MS";
pub const ENV_REFRESH_INTERVAL_SECS: &str = "STATUSBOARD_REFRESH_INTERVAL_SECS";

#[derive(Deserialize, Debug, Clone)]
pub struct StatusboardConfig {
    #[serde(default = "default_proxy_url")]
    pub proxy_url: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default)]
    pub sites: Vec<SiteEntry>,
}

fn default_proxy_url() -> String {
    DEFAULT_PROXY_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT.as_millis() as u64
}

fn default_refresh_interval_secs() -> u64 {
    60
}

fn default_title() -> String {
    "Website Status".to_string()
}

impl StatusboardConfig {
    /// Reads the TOML file, then lets `STATUSBOARD_*` variables (including
    /// those from a `.env` file) override individual settings.
    pub fn load(config_path: &str) -> Result<Self> {
        dotenv::dotenv().ok();

        let path = Path::new(config_path);
        let absolute_path_display = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        info!(path = ?absolute_path_display, "Attempting to load config.");

        let contents = fs::read_to_string(path).map_err(|e| {
            error!(path = %config_path, error = %e, "Failed to read config file.");
            StatusboardError::ConfigRead {
                path: config_path.to_string(),
                source: e,
            }
        })?;

        let mut config = Self::from_toml_str(&contents, config_path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        info!(
            proxy_url = %config.proxy_url,
            timeout_ms = config.timeout_ms,
            site_count = config.sites.len(),
            "Loaded config successfully."
        );
        Ok(config)
    }

    pub fn from_toml_str(contents: &str, origin: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| {
            error!(path = %origin, error = %e, "Failed to parse config file.");
            StatusboardError::ConfigParse {
                path: origin.to_string(),
                source: e,
            }
        })
    }

    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(proxy_url) = lookup(ENV_PROXY_URL) {
            self.proxy_url = proxy_url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            self.timeout_ms = parse_number(ENV_TIMEOUT_MS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_REFRESH_INTERVAL_SECS) {
            self.refresh_interval_secs = parse_number(ENV_REFRESH_INTERVAL_SECS, &raw)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let proxy = Url::parse(&self.proxy_url).map_err(|e| {
            StatusboardError::InvalidConfig(format!("proxy_url '{}' is not a valid url: {e}", self.proxy_url))
        })?;
        if !matches!(proxy.scheme(), "http" | "https") {
            return Err(StatusboardError::InvalidConfig(format!(
                "proxy_url '{}' must use http or https",
                self.proxy_url
            )));
        }
        if self.timeout_ms == 0 {
            return Err(StatusboardError::InvalidConfig("timeout_ms must be greater than 0".to_string()));
        }
        if self.refresh_interval_secs == 0 {
            return Err(StatusboardError::InvalidConfig(
                "refresh_interval_secs must be greater than 0".to_string(),
            ));
        }
        if self.sites.is_empty() {
            return Err(StatusboardError::InvalidConfig("at least one site must be configured".to_string()));
        }
        self.sites.iter().try_for_each(SiteEntry::validate)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

fn parse_number(key: &str, raw: &str) -> Result<u64> {
    raw.trim()
        .parse()
        .map_err(|e| StatusboardError::InvalidConfig(format!("{key}='{raw}' is not a number: {e}")))
}
