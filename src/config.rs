use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{AppError, AppResult};

pub const DEFAULT_ENDPOINT: &str = "http://easier.cc";
pub const DEFAULT_UPDATE_URL: &str = "http://easier.cc/";
pub const DEFAULT_USER_AGENT: &str = "Sketch";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoint: String,
    pub temp_dir: Option<PathBuf>,
    pub user_agent: String,
    pub update_url: String,
    pub request_timeout_secs: u64,
    pub open_link_after_upload: bool,
    pub open_update_page: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            temp_dir: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            update_url: DEFAULT_UPDATE_URL.to_string(),
            request_timeout_secs: 120,
            open_link_after_upload: false,
            open_update_page: false,
        }
    }
}

impl Config {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_temp_dir(mut self, temp_dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(temp_dir.into());
        self
    }

    /// Base URL without a trailing slash, ready for path joins.
    pub fn base_url(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }

    /// Scratch directory for artboard exports, created on demand.
    pub fn export_directory(&self) -> AppResult<PathBuf> {
        let dir = self
            .temp_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

fn get_config_path() -> AppResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| AppError::Config("Could not find config directory".to_string()))?
        .join("Artboard Share Uploader");

    fs::create_dir_all(&config_dir)?;
    Ok(config_dir.join("config.json"))
}

pub fn load_config() -> AppResult<Config> {
    load_config_from(&get_config_path()?)
}

pub(crate) fn load_config_from(config_path: &Path) -> AppResult<Config> {
    if config_path.exists() {
        let config_str = fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_str).unwrap_or_else(|e| {
            log::warn!("Failed to parse config file: {}. Using defaults.", e);
            Config::default()
        });

        validate_config(&config)?;
        Ok(config)
    } else {
        let default_config = Config::default();
        save_config_to(config_path, &default_config)?;
        Ok(default_config)
    }
}

pub(crate) fn save_config_to(config_path: &Path, config: &Config) -> AppResult<()> {
    if config_path.exists() {
        let backup_path = config_path.with_extension("json.bak");
        if let Err(e) = fs::copy(config_path, &backup_path) {
            log::warn!("Failed to create config backup: {}", e);
        }
    }

    let config_str = serde_json::to_string_pretty(config)?;
    fs::write(config_path, config_str)?;

    log::info!("Configuration saved to {}", config_path.display());
    Ok(())
}

pub fn validate_config(config: &Config) -> AppResult<()> {
    let http_url = Regex::new(r"^https?://[^\s/]+(/\S*)?$").unwrap();

    if !http_url.is_match(config.endpoint.trim()) {
        return Err(AppError::validation("endpoint", "Must be an http(s) URL"));
    }

    if !http_url.is_match(config.update_url.trim()) {
        return Err(AppError::validation("update_url", "Must be an http(s) URL"));
    }

    if config.user_agent.trim().is_empty() {
        return Err(AppError::validation("user_agent", "Cannot be empty"));
    }

    if config.request_timeout_secs == 0 || config.request_timeout_secs > 600 {
        return Err(AppError::validation(
            "request_timeout_secs",
            "Must be between 1 and 600",
        ));
    }

    Ok(())
}
