use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub submission: SubmissionConfig,
}

/// Backend API connection settings
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL including the `/api` prefix, without trailing slash
    pub base_url: String,
    pub timeout: Duration,
}

/// Timing window for the opportunity modal's close after a submit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionConfig {
    /// Minimum time the modal stays open after the submit click
    pub min_visible: Duration,
    /// Maximum time from the submit click to the close
    pub max_close: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            api: ApiConfig::from_env()?,
            submission: SubmissionConfig::from_env()?,
        })
    }
}

impl ApiConfig {
    const DEFAULT_BASE_URL: &'static str = "http://localhost:8000/api";
    const DEFAULT_TIMEOUT_SECS: u64 = 30;

    pub fn from_env() -> Result<Self, String> {
        let base_url = env::var("API_BASE_URL")
            .unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        if base_url.is_empty() {
            return Err("API_BASE_URL must not be empty".to_string());
        }

        let timeout_secs = env::var("API_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "API_TIMEOUT_SECS must be a valid number".to_string())?;

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            min_visible: Duration::from_millis(Self::DEFAULT_MIN_VISIBLE_MS),
            max_close: Duration::from_millis(Self::DEFAULT_MAX_CLOSE_MS),
        }
    }
}

impl SubmissionConfig {
    pub const DEFAULT_MIN_VISIBLE_MS: u64 = 300;
    pub const DEFAULT_MAX_CLOSE_MS: u64 = 900;

    pub fn from_env() -> Result<Self, String> {
        let min_visible_ms = env::var("MODAL_MIN_VISIBLE_MS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_VISIBLE_MS.to_string())
            .parse::<u64>()
            .map_err(|_| "MODAL_MIN_VISIBLE_MS must be a valid number".to_string())?;

        let max_close_ms = env::var("MODAL_MAX_CLOSE_MS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CLOSE_MS.to_string())
            .parse::<u64>()
            .map_err(|_| "MODAL_MAX_CLOSE_MS must be a valid number".to_string())?;

        Self::new(
            Duration::from_millis(min_visible_ms),
            Duration::from_millis(max_close_ms),
        )
    }

    pub fn new(min_visible: Duration, max_close: Duration) -> Result<Self, String> {
        if max_close < min_visible {
            return Err(format!(
                "MODAL_MAX_CLOSE_MS ({}ms) must not be lower than MODAL_MIN_VISIBLE_MS ({}ms)",
                max_close.as_millis(),
                min_visible.as_millis()
            ));
        }

        Ok(Self {
            min_visible,
            max_close,
        })
    }
}
