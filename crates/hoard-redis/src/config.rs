//! Configuration for the Redis backend.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{RedisHoardError, Result};

/// Default per-command response timeout (30 seconds).
const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connection timeout (5 seconds).
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for [`RedisBackend`](crate::RedisBackend).
///
/// Deserializable from service configuration; duration fields accept
/// humantime strings (`"5s"`, `"250ms"`).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use hoard_redis::RedisBackendConfig;
///
/// let config = RedisBackendConfig::new("redis://localhost:6379")
///     .with_connect_timeout(Duration::from_secs(2));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RedisBackendConfig {
    /// Redis connection URL (`redis://...` or `rediss://...`).
    pub(crate) url: String,

    /// Per-command response timeout. A command exceeding it surfaces as
    /// [`HoardError::Timeout`](hoard::HoardError::Timeout).
    #[serde(with = "humantime_serde", default = "default_response_timeout")]
    pub(crate) response_timeout: Duration,

    /// Connection establishment timeout.
    #[serde(with = "humantime_serde", default = "default_connect_timeout")]
    pub(crate) connect_timeout: Duration,
}

fn default_response_timeout() -> Duration {
    DEFAULT_RESPONSE_TIMEOUT
}

fn default_connect_timeout() -> Duration {
    DEFAULT_CONNECT_TIMEOUT
}

impl RedisBackendConfig {
    /// Creates a configuration for the given URL with default timeouts.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            response_timeout: DEFAULT_RESPONSE_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Sets the per-command response timeout.
    #[must_use]
    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    /// Sets the connection establishment timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Validates the configuration.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.url.is_empty() {
            return Err(RedisHoardError::Config("url must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_applied() {
        let config = RedisBackendConfig::new("redis://localhost:6379");
        assert_eq!(config.response_timeout, DEFAULT_RESPONSE_TIMEOUT);
        assert_eq!(config.connect_timeout, DEFAULT_CONNECT_TIMEOUT);
    }

    #[test]
    fn empty_url_fails_validation() {
        let config = RedisBackendConfig::new("");
        assert!(config.validate().is_err());
    }

    #[test]
    fn deserializes_humantime_durations() {
        let json = r#"{"url":"redis://localhost:6379","response_timeout":"250ms"}"#;
        let config: RedisBackendConfig = serde_json::from_str(json).expect("decode");
        assert_eq!(config.response_timeout, Duration::from_millis(250));
        assert_eq!(config.connect_timeout, DEFAULT_CONNECT_TIMEOUT);
    }
}
