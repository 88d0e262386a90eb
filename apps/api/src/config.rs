use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_BASE_URL: &str = "https://api.aimlapi.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub aiml_api_key: String,
    pub aiml_base_url: String,
    pub llm_model: String,
    pub llm_timeout: Duration,
    pub ocr_timeout: Duration,
    pub tesseract_cmd: String,
    pub rate_limit_max: u32,
    pub rate_limit_window: Duration,
    pub trust_proxy: bool,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            aiml_api_key: require_env("AIML_API_KEY")?,
            aiml_base_url: std::env::var("AIML_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            llm_model: std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            llm_timeout: Duration::from_secs(env_or("LLM_TIMEOUT_SECS", 120)?),
            ocr_timeout: Duration::from_secs(env_or("OCR_TIMEOUT_SECS", 60)?),
            tesseract_cmd: std::env::var("TESSERACT_CMD")
                .unwrap_or_else(|_| "tesseract".to_string()),
            rate_limit_max: env_or("RATE_LIMIT_MAX", 10)?,
            rate_limit_window: Duration::from_secs(env_or("RATE_LIMIT_WINDOW_SECS", 60)?),
            trust_proxy: env_or("TRUST_PROXY", false)?,
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            port: env_or("PORT", 3000)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Reads an optional variable, falling back to `default` when unset.
/// A set-but-unparseable value is an error rather than a silent default.
fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'"))
}
