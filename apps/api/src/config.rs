use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_CHAT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Service configuration loaded from environment variables.
/// Only the chat API key gates behaviour: without it the AI capability never
/// becomes ready and uploads stay disabled.
#[derive(Debug, Clone)]
pub struct Config {
    pub chat_api_url: String,
    pub chat_api_key: Option<String>,
    pub chat_timeout_secs: u64,
    pub review_config_path: Option<PathBuf>,
    pub prompt_template_path: Option<PathBuf>,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            chat_api_url: std::env::var("CHAT_API_URL")
                .unwrap_or_else(|_| DEFAULT_CHAT_API_URL.to_string()),
            chat_api_key: optional_env("CHAT_API_KEY"),
            chat_timeout_secs: parse_env("CHAT_TIMEOUT_SECS", 120)?,
            review_config_path: optional_env("REVIEW_CONFIG_PATH").map(PathBuf::from),
            prompt_template_path: optional_env("PROMPT_TEMPLATE_PATH").map(PathBuf::from),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Treats unset and blank variables the same way.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
