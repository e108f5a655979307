//! Configuration loading.
//!
//! Settings are read from `config.toml` in the videotutor config directory.
//! Any missing or invalid entry falls back to its default so a broken file
//! never blocks a session.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{error::Result, message::MessageOptions, types::InitScope};

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub message: MessageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the transcript service; `/api/transcript` is appended.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageConfig {
    #[serde(default)]
    pub scope: String,
    #[serde(default = "default_true")]
    pub include_description: bool,
    #[serde(default = "default_true")]
    pub summary: bool,
    #[serde(default = "default_true")]
    pub chapter_summary: bool,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            scope: InitScope::default().as_str().to_string(),
            include_description: true,
            summary: true,
            chapter_summary: true,
        }
    }
}

impl MessageConfig {
    pub fn scope(&self) -> InitScope {
        InitScope::parse(&self.scope)
    }

    pub fn options(&self) -> MessageOptions {
        MessageOptions {
            include_description: self.include_description,
            summary: self.summary,
            chapter_summary: self.chapter_summary,
        }
    }
}

pub fn parse_config(contents: &str) -> Result<AppConfig> {
    Ok(toml::from_str(contents)?)
}

/// Read `path`, falling back to defaults when it is absent or malformed.
pub fn load_config(path: &Path) -> AppConfig {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            info!(path = %path.display(), "No config file ({err}); using defaults");
            return AppConfig::default();
        }
    };

    match parse_config(&contents) {
        Ok(config) => {
            info!(path = %path.display(), "Loaded config");
            config
        }
        Err(err) => {
            warn!(path = %path.display(), "Ignoring malformed config: {err}");
            AppConfig::default()
        }
    }
}
