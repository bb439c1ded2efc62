//! Application configuration management.
//!
//! This module handles loading and saving the configuration, which holds
//! the per-resource endpoint URLs and list behavior settings.
//!
//! Configuration is stored at `~/.config/hostel-admin/config.json`. The
//! endpoint URLs can be overridden from the environment (or a `.env` file):
//! `HOSTEL_NOTICES_URL`, `HOSTEL_STUDENT_INFO_URL`, `HOSTEL_DASHBOARD_URL`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::client::REQUEST_TIMEOUT_SECS;
use crate::api::ApiClient;
use crate::manager::SEARCH_DEBOUNCE_MS;

/// Application name used for config directory paths
pub(crate) const APP_NAME: &str = "hostel-admin";

/// Config file name
const CONFIG_FILE: &str = "config.json";

pub const DEFAULT_NOTICES_URL: &str = "http://localhost:3001/notice";
pub const DEFAULT_STUDENT_INFO_URL: &str = "http://localhost:3001/studentInfo";
pub const DEFAULT_DASHBOARD_URL: &str = "https://api.npoint.io/afae6426adf49484df48";

/// Rows per page in the student table
pub const DEFAULT_PAGE_SIZE: usize = 10;

const ENV_NOTICES_URL: &str = "HOSTEL_NOTICES_URL";
const ENV_STUDENT_INFO_URL: &str = "HOSTEL_STUDENT_INFO_URL";
const ENV_DASHBOARD_URL: &str = "HOSTEL_DASHBOARD_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub notices_url: String,
    pub student_info_url: String,
    pub dashboard_url: String,
    pub page_size: usize,
    pub search_debounce_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            notices_url: DEFAULT_NOTICES_URL.to_string(),
            student_info_url: DEFAULT_STUDENT_INFO_URL.to_string(),
            dashboard_url: DEFAULT_DASHBOARD_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce_ms: SEARCH_DEBOUNCE_MS,
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load the config file (defaults if absent), then apply environment
    /// overrides. A `.env` file in the working directory is read first.
    pub fn load() -> Result<Self> {
        // Missing .env is fine
        let _ = dotenvy::dotenv();
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            debug!(path = %path.display(), "Config loaded");
            Ok(config)
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Override endpoint URLs from `lookup` (normally the process environment).
    /// Blank values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let targets = [
            (ENV_NOTICES_URL, &mut self.notices_url),
            (ENV_STUDENT_INFO_URL, &mut self.student_info_url),
            (ENV_DASHBOARD_URL, &mut self.dashboard_url),
        ];
        for (key, slot) in targets {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                debug!(key, url = %value, "Endpoint overridden from environment");
                *slot = value;
            }
        }
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// HTTP client configured with this config's timeout.
    pub fn api_client(&self) -> Result<ApiClient> {
        ApiClient::with_timeout(self.request_timeout()).context("Failed to build HTTP client")
    }
}
