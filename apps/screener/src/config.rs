use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if a variable is present but malformed.
#[derive(Debug, Clone)]
pub struct Config {
    /// `None` when the key is unset or empty; analysis is then refused.
    pub anthropic_api_key: Option<String>,
    pub port: u16,
    pub export_dir: PathBuf,
    pub max_upload_mb: usize,
    /// Sessions idle for longer than this are dropped.
    pub session_idle_minutes: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "7860".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            export_dir: optional_env("EXPORT_DIR")
                .unwrap_or_else(|| "exports".to_string())
                .into(),
            max_upload_mb: std::env::var("MAX_UPLOAD_MB")
                .unwrap_or_else(|_| "50".to_string())
                .parse::<usize>()
                .context("MAX_UPLOAD_MB must be a whole number of megabytes")?,
            session_idle_minutes: std::env::var("SESSION_IDLE_MINUTES")
                .unwrap_or_else(|_| "60".to_string())
                .parse::<u64>()
                .context("SESSION_IDLE_MINUTES must be a whole number of minutes")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }

    pub fn session_idle_ttl(&self) -> Duration {
        Duration::from_secs(self.session_idle_minutes * 60)
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
