use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};

use crate::llm_client::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Which processor backs `POST /process`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Calls the completion service.
    Live,
    /// Returns canned documents.
    Demo,
}

impl AppMode {
    fn default_port(&self) -> u16 {
        match self {
            AppMode::Live => 5001,
            AppMode::Demo => 5002,
        }
    }
}

impl fmt::Display for AppMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppMode::Live => f.write_str("live"),
            AppMode::Demo => f.write_str("demo"),
        }
    }
}

impl FromStr for AppMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "live" => Ok(AppMode::Live),
            "demo" => Ok(AppMode::Demo),
            other => Err(anyhow!("APP_MODE must be 'live' or 'demo', got '{other}'")),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Fails at startup if a required variable is missing or malformed.
#[derive(Clone)]
pub struct Config {
    pub mode: AppMode,
    /// Always set in live mode.
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    /// Replacement template file; the built-in set is used when unset.
    pub templates_path: Option<PathBuf>,
    pub demo_delay_ms: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mode = match var("APP_MODE") {
            Some(raw) => raw.parse::<AppMode>()?,
            None => AppMode::Live,
        };

        let openai_api_key = match mode {
            AppMode::Live => Some(var("OPENAI_API_KEY").with_context(|| {
                "Required environment variable 'OPENAI_API_KEY' is not set (needed in live mode)"
            })?),
            AppMode::Demo => var("OPENAI_API_KEY"),
        };

        Ok(Config {
            mode,
            openai_api_key,
            openai_base_url: var("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            openai_model: var("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            templates_path: var("TEMPLATES_PATH").map(PathBuf::from),
            demo_delay_ms: match var("DEMO_DELAY_MS") {
                Some(raw) => raw
                    .parse::<u64>()
                    .context("DEMO_DELAY_MS must be a whole number of milliseconds")?,
                None => 1000,
            },
            port: match var("PORT") {
                Some(raw) => raw
                    .parse::<u16>()
                    .context("PORT must be a valid port number")?,
                None => mode.default_port(),
            },
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
