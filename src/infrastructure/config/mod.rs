use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{AppError, AppResult};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5002";
const DEFAULT_STATUS_CLEAR_MS: u64 = 3000;

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub status_clear_delay: Duration,
    pub audio_dir: PathBuf,
    pub audio_player: Option<String>,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let status_clear_ms = match lookup("STATUS_CLEAR_MS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                AppError::Config(format!("STATUS_CLEAR_MS must be milliseconds: {}", e))
            })?,
            None => DEFAULT_STATUS_CLEAR_MS,
        };

        let config = Config {
            base_url: lookup("TTS_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            status_clear_delay: Duration::from_millis(status_clear_ms),
            audio_dir: lookup("AUDIO_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| env::temp_dir().join("tts-console")),
            audio_player: lookup("AUDIO_PLAYER").filter(|command| !command.trim().is_empty()),
            log_format: lookup("LOG_FORMAT")
                .map(|s| match s.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    _ => LogFormat::Pretty,
                })
                .unwrap_or(LogFormat::Pretty),
        };

        Ok(config)
    }
}
