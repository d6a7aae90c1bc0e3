//! Hoard error types and result alias.
//!
//! All backends map their internal failures to [`HoardError`] so that the
//! protocol layer above can branch on a single taxonomy without string
//! matching.
//!
//! # Error Types
//!
//! - [`HoardError::NotFound`] - token absent, expired, or already consumed
//! - [`HoardError::InvalidInput`] - empty nut or zero TTL passed to `save`
//! - [`HoardError::Serialization`] - record could not be encoded
//! - [`HoardError::Deserialization`] - stored bytes do not decode to a record
//! - [`HoardError::Backend`] - transport or connection failure
//! - [`HoardError::Timeout`] - operation exceeded its time limit
//!
//! # Example
//!
//! ```
//! use hoard::{HoardError, HoardResult};
//!
//! fn lookup(nut: &str) -> HoardResult<Vec<u8>> {
//!     Err(HoardError::not_found(nut))
//! }
//! ```

use std::sync::Arc;

use thiserror::Error;

/// A boxed error type for source chain tracking.
pub type BoxError = Arc<dyn std::error::Error + Send + Sync>;

/// Result type alias for hoard operations.
pub type HoardResult<T> = Result<T, HoardError>;

/// Errors that can occur during hoard operations.
///
/// `NotFound` is the expected steady-state failure for replayed or expired
/// tokens. It deliberately does not distinguish "expired" from "consumed"
/// from "never existed" so that a caller probing tokens learns nothing about
/// token state from the error kind.
///
/// Errors preserve their source chain via the `#[source]` attribute.
///
/// # Non-exhaustive
///
/// This enum is marked `#[non_exhaustive]` — new variants may be added in
/// future minor releases without a semver-breaking change. Downstream match
/// expressions must include a wildcard arm (`_ =>`).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HoardError {
    /// The token was not found: absent, expired, or already consumed.
    ///
    /// Never retried automatically. Callers typically map this to an
    /// "invalid or expired session" outcome.
    #[error("Token not found: {token}")]
    NotFound {
        /// The token that was not found.
        token: String,
    },

    /// A caller passed an argument the store rejects outright, such as an
    /// empty nut or a zero TTL.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Description of the rejected input.
        message: String,
    },

    /// The record could not be encoded for storage.
    ///
    /// This indicates a programmer or schema error and is not retried.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Description of the serialization error.
        message: String,
        /// The underlying error that caused encoding to fail.
        #[source]
        source: Option<BoxError>,
    },

    /// The stored bytes do not decode to a valid record.
    ///
    /// Indicates data corruption or schema version skew. Logged distinctly
    /// from [`NotFound`](Self::NotFound) since it implies a data-integrity
    /// issue, not merely an absent key.
    #[error("Deserialization error: {message}")]
    Deserialization {
        /// Description of the deserialization error.
        message: String,
        /// The underlying error that caused decoding to fail.
        #[source]
        source: Option<BoxError>,
    },

    /// Connection or transport error talking to the backend.
    ///
    /// Transient; a caller may retry with backoff at a higher layer. The
    /// store itself performs no automatic retry.
    #[error("Backend error: {message}")]
    Backend {
        /// Description of the backend failure.
        message: String,
        /// The underlying error that caused this backend failure.
        #[source]
        source: Option<BoxError>,
    },

    /// The operation exceeded its configured time limit.
    #[error("Operation timeout")]
    Timeout,
}

impl HoardError {
    /// Creates a new `NotFound` error for the given token.
    #[must_use]
    pub fn not_found(token: impl Into<String>) -> Self {
        Self::NotFound { token: token.into() }
    }

    /// Creates a new `InvalidInput` error with the given message.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput { message: message.into() }
    }

    /// Creates a new `Serialization` error with the given message.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization { message: message.into(), source: None }
    }

    /// Creates a new `Serialization` error with a message and source error.
    #[must_use]
    pub fn serialization_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Serialization { message: message.into(), source: Some(Arc::new(source)) }
    }

    /// Creates a new `Deserialization` error with the given message.
    #[must_use]
    pub fn deserialization(message: impl Into<String>) -> Self {
        Self::Deserialization { message: message.into(), source: None }
    }

    /// Creates a new `Deserialization` error with a message and source error.
    #[must_use]
    pub fn deserialization_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Deserialization { message: message.into(), source: Some(Arc::new(source)) }
    }

    /// Creates a new `Backend` error with the given message.
    #[must_use]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend { message: message.into(), source: None }
    }

    /// Creates a new `Backend` error with a message and source error.
    #[must_use]
    pub fn backend_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Backend { message: message.into(), source: Some(Arc::new(source)) }
    }

    /// Creates a new `Timeout` error.
    #[must_use]
    pub fn timeout() -> Self {
        Self::Timeout
    }

    /// Returns `true` for failures a caller may reasonably retry with
    /// backoff ([`Backend`](Self::Backend) and [`Timeout`](Self::Timeout)).
    ///
    /// [`NotFound`](Self::NotFound) is deliberately not transient: a replayed
    /// token stays invalid no matter how often it is retried.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Backend { .. } | Self::Timeout)
    }
}
