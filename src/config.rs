//! Client configuration
//!
//! Stored as TOML in `<config_dir>/email-sender/config.toml`. The mail
//! service base URL can be overridden by `EMAIL_SENDER_BASE_URL` and then by
//! the `--base-url` flag.

use crate::error::{SenderError, SenderResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

pub const APP_NAME: &str = "email-sender";
pub const CONFIG_FILE: &str = "config.toml";
pub const BASE_URL_ENV: &str = "EMAIL_SENDER_BASE_URL";

/// Effective client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root of the mail service API
    pub base_url: String,
    /// Seconds between status polls while sending
    pub poll_interval_secs: u64,
    /// How long a notification stays visible
    pub notification_duration_ms: u64,
    /// Per-request timeout for the mail service
    pub request_timeout_secs: u64,
    /// Sender address pre-filled in the composer
    pub default_sender: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            poll_interval_secs: 5,
            notification_duration_ms: 2000,
            request_timeout_secs: 30,
            default_sender: None,
        }
    }
}

impl AppConfig {
    /// Default configuration directory
    pub fn default_dir() -> SenderResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_NAME))
            .ok_or_else(|| SenderError::config("Cannot find config directory"))
    }

    /// Path of the config file inside `config_dir` (or the default directory)
    pub fn path_in(config_dir: Option<&Path>) -> SenderResult<PathBuf> {
        let dir = match config_dir {
            Some(dir) => dir.to_path_buf(),
            None => Self::default_dir()?,
        };
        Ok(dir.join(CONFIG_FILE))
    }

    /// Load the file, apply the environment override, validate
    pub fn load(config_dir: Option<&Path>) -> SenderResult<Self> {
        let path = Self::path_in(config_dir)?;
        let mut config = Self::load_file(&path)?;

        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            if !base_url.trim().is_empty() {
                debug!("Base URL overridden by {}", BASE_URL_ENV);
                config.base_url = base_url;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Read a config file; a missing file yields the defaults
    pub fn load_file(path: &Path) -> SenderResult<Self> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Write the config as TOML, creating the directory
    pub fn save(&self, path: &Path) -> SenderResult<()> {
        self.validate()?;

        let content = toml::to_string_pretty(self)
            .map_err(|e| SenderError::config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;

        info!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Apply a command-line base URL
    pub fn with_base_url(mut self, base_url: Option<String>) -> SenderResult<Self> {
        if let Some(base_url) = base_url {
            self.base_url = base_url;
            self.validate()?;
        }
        Ok(self)
    }

    pub fn validate(&self) -> SenderResult<()> {
        self.parsed_base_url()?;

        if self.poll_interval_secs == 0 {
            return Err(SenderError::config("poll_interval_secs must be greater than 0"));
        }
        if self.notification_duration_ms == 0 {
            return Err(SenderError::config(
                "notification_duration_ms must be greater than 0",
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(SenderError::config("request_timeout_secs must be greater than 0"));
        }
        Ok(())
    }

    pub fn parsed_base_url(&self) -> SenderResult<Url> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| SenderError::config(format!("Invalid base_url {:?}: {}", self.base_url, e)))?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(SenderError::config(format!(
                "base_url must use http or https, got {}",
                other
            ))),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn notification_duration(&self) -> Duration {
        Duration::from_millis(self.notification_duration_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
