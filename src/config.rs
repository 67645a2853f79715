use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::cards::navigation::DEFAULT_MENU_TITLE;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("failed to read config file '{}': {source}", path.display())]
    ReadFile { path: PathBuf, source: std::io::Error },
    /// Failed to parse JSON.
    #[error("failed to parse config file '{}': {source}", path.display())]
    ParseJson { path: PathBuf, source: serde_json::Error },
    /// Validation error.
    #[error("config validation error: {0}")]
    Validation(String),
}

#[derive(Deserialize)]
struct ConfigFile {
    telegram_bot_token: String,
    /// JSON file with the people list. Relative to the config file.
    #[serde(default = "default_people_path")]
    people_path: String,
    #[serde(default = "default_menu_title")]
    menu_title: String,
    /// Bind address of the uptime endpoint; `null` turns it off.
    #[serde(default = "default_keep_alive_addr")]
    keep_alive_addr: Option<String>,
    /// Chat that receives WARN/ERROR log lines.
    log_chat_id: Option<i64>,
    /// Directory for logs. Defaults to current directory.
    data_dir: Option<String>,
}

fn default_people_path() -> String {
    "people.json".to_string()
}

fn default_menu_title() -> String {
    DEFAULT_MENU_TITLE.to_string()
}

fn default_keep_alive_addr() -> Option<String> {
    Some("0.0.0.0:8080".to_string())
}

pub struct Config {
    pub telegram_bot_token: String,
    pub people_path: PathBuf,
    pub menu_title: String,
    pub keep_alive_addr: Option<SocketAddr>,
    pub log_chat_id: Option<i64>,
    /// Directory for log files.
    pub data_dir: PathBuf,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config_path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&config_path)
            .map_err(|e| ConfigError::ReadFile { path: config_path.clone(), source: e })?;
        let file: ConfigFile = serde_json::from_str(&content)
            .map_err(|e| ConfigError::ParseJson { path: config_path.clone(), source: e })?;

        if file.telegram_bot_token.is_empty() {
            return Err(ConfigError::Validation("telegram_bot_token is required".into()));
        }
        // Telegram tokens are formatted as {bot_id}:{secret} where bot_id is numeric
        let token_parts: Vec<&str> = file.telegram_bot_token.split(':').collect();
        if token_parts.len() != 2 || token_parts[0].parse::<u64>().is_err() || token_parts[1].is_empty() {
            return Err(ConfigError::Validation(
                "telegram_bot_token appears invalid (expected format: 123456789:ABCdefGHI...)".into()
            ));
        }

        if file.menu_title.trim().is_empty() {
            return Err(ConfigError::Validation("menu_title must not be empty".into()));
        }

        let keep_alive_addr = file
            .keep_alive_addr
            .map(|addr| {
                addr.parse::<SocketAddr>().map_err(|e| {
                    ConfigError::Validation(format!("keep_alive_addr '{addr}' is invalid: {e}"))
                })
            })
            .transpose()?;

        let base_dir = config_path.parent().unwrap_or_else(|| Path::new(""));
        let people_path = base_dir.join(&file.people_path);

        let data_dir = file
            .data_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            telegram_bot_token: file.telegram_bot_token,
            people_path,
            menu_title: file.menu_title,
            keep_alive_addr,
            log_chat_id: file.log_chat_id,
            data_dir,
        })
    }
}
