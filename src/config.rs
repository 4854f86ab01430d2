// src/config.rs
use std::{path::PathBuf, time::Duration};

use reqwest::Url;
use tracing::Level;

use crate::error::ConfigError;
use crate::services::renderer::Locale;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: Url,
    pub locale: Locale,
    pub store_path: PathBuf,
    pub timeout: Option<Duration>,
    pub log_level: Level,
}

impl Settings {
    /// Read settings from the process environment (after `.env` is loaded).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let raw_url = get("HR_CHAT_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(raw_url.trim()).map_err(|e| ConfigError::Invalid {
            key: "HR_CHAT_BASE_URL",
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::Invalid {
                key: "HR_CHAT_BASE_URL",
                reason: format!("'{raw_url}' cannot serve as a base URL"),
            });
        }

        let locale = match get("HR_CHAT_LANG") {
            Some(lang) => lang.parse()?,
            None => Locale::default(),
        };

        let store_path = match get("HR_CHAT_STORE") {
            Some(path) => PathBuf::from(path),
            None => default_store_path()?,
        };

        let timeout = match get("HR_CHAT_TIMEOUT_SECS") {
            Some(secs) => {
                let secs: u64 = secs.trim().parse().map_err(|_| ConfigError::Invalid {
                    key: "HR_CHAT_TIMEOUT_SECS",
                    reason: format!("'{secs}' is not a whole number of seconds"),
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        let log_level = match get("HR_CHAT_LOG") {
            Some(level) => level.trim().parse::<Level>().map_err(|_| ConfigError::Invalid {
                key: "HR_CHAT_LOG",
                reason: format!("'{level}' is not one of trace, debug, info, warn, error"),
            })?,
            None => Level::WARN,
        };

        Ok(Self { base_url, locale, store_path, timeout, log_level })
    }
}

fn default_store_path() -> Result<PathBuf, ConfigError> {
    dirs::data_local_dir()
        .map(|dir| dir.join("hr-chat").join("storage.json"))
        .ok_or(ConfigError::NoDataDir)
}
