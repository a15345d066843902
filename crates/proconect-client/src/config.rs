//! Client configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ClientError;

/// Environment variable holding the backend base URL.
pub const API_BASE_ENV: &str = "PROCONECT_API_BASE";
/// Environment variable overriding the local data directory.
pub const DATA_DIR_ENV: &str = "PROCONECT_DATA_DIR";

const DEV_API_BASE: &str = "http://localhost:5000";

/// How the delay grows between retries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Backoff {
    /// `base * (attempt + 1)`: 500ms, 1000ms, 1500ms...
    #[default]
    Linear,
    /// `base * 2^attempt`: 500ms, 1000ms, 2000ms...
    Exponential,
}

/// Backoff for opt-in retries on network failures.
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    /// Delay before the first retry.
    pub base_delay_ms: u64,
    /// Upper bound for a single delay.
    pub max_delay_ms: u64,
    pub backoff: Backoff,
}

impl RetryConfig {
    /// Delay before retry number `attempt` (0-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = match self.backoff {
            Backoff::Linear => u64::from(attempt).saturating_add(1),
            Backoff::Exponential => 1u64.checked_shl(attempt).unwrap_or(u64::MAX),
        };
        Duration::from_millis(self.base_delay_ms.saturating_mul(factor).min(self.max_delay_ms))
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { base_delay_ms: 500, max_delay_ms: 30_000, backoff: Backoff::Linear }
    }
}

/// Configuration for the ProConect client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL, without trailing slash.
    pub base_url: String,
    /// Hard timeout per attempt in seconds.
    pub timeout_secs: u64,
    /// Retry backoff for calls that opt into retries.
    pub retry: RetryConfig,
    /// Where `state.json` lives; `None` keeps state in memory only.
    pub data_dir: Option<PathBuf>,
}

impl ClientConfig {
    /// Configuration for `base_url` with defaults for everything else.
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.as_ref()),
            timeout_secs: 30,
            retry: RetryConfig::default(),
            data_dir: None,
        }
    }

    /// Read `PROCONECT_API_BASE` and `PROCONECT_DATA_DIR`.
    ///
    /// Debug builds fall back to the local development backend; release
    /// builds require the base URL.
    pub fn from_env() -> Result<Self, ClientError> {
        let base_url = match std::env::var(API_BASE_ENV) {
            Ok(url) if !url.trim().is_empty() => url,
            _ if cfg!(debug_assertions) => DEV_API_BASE.to_string(),
            _ => {
                return Err(ClientError::Config(format!(
                    "{API_BASE_ENV} não definido. Configure o endpoint do backend."
                )))
            },
        };
        let mut config = Self::new(base_url);
        config.data_dir = Some(crate::storage::get_data_dir()?);
        Ok(config)
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub(crate) fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEV_API_BASE)
    }
}

/// Trim trailing slashes and never talk TLS to localhost.
fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.contains("localhost") {
        if let Some(rest) = trimmed.strip_prefix("https://") {
            return format!("http://{rest}");
        }
    }
    trimmed.to_string()
}
