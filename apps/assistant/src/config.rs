use std::time::Duration;

use anyhow::{Context, Result};

/// Default upstream job API base URL (the local development backend).
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Default simulated enhancement latency for the resume wizard.
pub const DEFAULT_ENHANCEMENT_DELAY_MS: u64 = 3000;

/// Wizard sessions untouched for this long are evicted.
pub const DEFAULT_SESSION_IDLE_TTL_SECS: u64 = 1800;

const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);
const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Application configuration loaded from environment variables.
/// Every variable has a default; only malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub port: u16,
    pub rust_log: String,
    pub enhancement_delay_ms: u64,
    pub session_idle_ttl_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            api_base_url: std::env::var("API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
            port: parse_env("PORT", 8080).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            enhancement_delay_ms: parse_env("ENHANCEMENT_DELAY_MS", DEFAULT_ENHANCEMENT_DELAY_MS)
                .context("ENHANCEMENT_DELAY_MS must be a whole number of milliseconds")?,
            session_idle_ttl_secs: parse_env("SESSION_IDLE_TTL_SECS", DEFAULT_SESSION_IDLE_TTL_SECS)
                .context("SESSION_IDLE_TTL_SECS must be a whole number of seconds")?,
        })
    }

    pub fn session_idle_ttl(&self) -> Duration {
        Duration::from_secs(self.session_idle_ttl_secs)
    }

    /// How often idle sessions are swept: the TTL, clamped to 1–60s.
    pub fn session_sweep_interval(&self) -> Duration {
        self.session_idle_ttl()
            .clamp(MIN_SWEEP_INTERVAL, MAX_SWEEP_INTERVAL)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            port: 8080,
            rust_log: "info".to_string(),
            enhancement_delay_ms: DEFAULT_ENHANCEMENT_DELAY_MS,
            session_idle_ttl_secs: DEFAULT_SESSION_IDLE_TTL_SECS,
        }
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
