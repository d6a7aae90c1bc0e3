//! Error types for the Redis backend.
//!
//! This module maps [`redis::RedisError`] values onto the generic
//! [`HoardError`](hoard::HoardError) taxonomy so callers above the store
//! never see Redis-specific error types.

use hoard::HoardError;
use thiserror::Error;

/// Result type alias for Redis backend operations.
pub type Result<T> = std::result::Result<T, RedisHoardError>;

/// Errors specific to the Redis backend.
///
/// Wraps client errors and adds configuration-time failures that have no
/// counterpart in the generic taxonomy.
#[derive(Debug, Error)]
pub enum RedisHoardError {
    /// Error from the Redis client.
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<RedisHoardError> for HoardError {
    fn from(err: RedisHoardError) -> Self {
        match err {
            RedisHoardError::Redis(source) => redis_error_to_hoard_error(source),
            RedisHoardError::Config(message) => {
                HoardError::invalid_input(format!("Config: {message}"))
            },
        }
    }
}

/// Converts a Redis client error to a hoard error.
///
/// Timeouts are surfaced as [`HoardError::Timeout`]; everything else —
/// connection refusal, dropped connections, protocol errors — is a
/// [`HoardError::Backend`] with the client error preserved as the source.
/// Both classes are transient from the caller's perspective.
pub(crate) fn redis_error_to_hoard_error(err: redis::RedisError) -> HoardError {
    if err.is_timeout() {
        tracing::warn!(error = %err, "Redis operation timed out");
        return HoardError::timeout();
    }

    let message = if err.is_connection_refusal() || err.is_connection_dropped() {
        format!("Redis connection failed: {err}")
    } else {
        format!("Redis command failed: {err}")
    };
    HoardError::backend_with_source(message, err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn io_error(kind: std::io::ErrorKind) -> redis::RedisError {
        redis::RedisError::from(std::io::Error::new(kind, "boom"))
    }

    #[test]
    fn timeouts_map_to_timeout() {
        let err = redis_error_to_hoard_error(io_error(std::io::ErrorKind::TimedOut));
        assert!(matches!(err, HoardError::Timeout), "got: {err:?}");
        assert!(err.is_transient());
    }

    #[test]
    fn connection_failures_map_to_backend() {
        let err = redis_error_to_hoard_error(io_error(std::io::ErrorKind::ConnectionRefused));
        assert!(matches!(err, HoardError::Backend { .. }), "got: {err:?}");
        assert!(err.is_transient());
        assert!(std::error::Error::source(&err).is_some(), "client error should be the source");
    }

    #[test]
    fn config_errors_map_to_invalid_input() {
        let err = HoardError::from(RedisHoardError::Config("empty url".into()));
        assert!(matches!(err, HoardError::InvalidInput { .. }), "got: {err:?}");
    }
}
