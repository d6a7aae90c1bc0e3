//! The transaction store.
//!
//! [`Hoard`] wraps a [`HoardBackend`] with JSON serialization of
//! [`HoardCache`] records and the error mapping the protocol layer branches
//! on. It holds no state of its own beyond the backend handle; all atomicity
//! is delegated to the backend's `take` primitive.

use std::time::Duration;

use crate::{
    backend::HoardBackend,
    error::{HoardError, HoardResult},
    types::{HoardCache, Nut},
};

/// TTL-bounded, atomic cache of in-flight authentication transactions.
///
/// One nut maps to at most one record at any time. The lifecycle is
/// `absent → present → absent`: a record is created by [`save`](Self::save),
/// read non-destructively by [`get`](Self::get) any number of times, and
/// terminated by [`get_and_delete`](Self::get_and_delete), a fresh overwrite,
/// or TTL expiry. Under concurrency the token never passes through a state
/// where two consumers could both retrieve it.
///
/// The store performs no automatic retry; [`HoardError::is_transient`] tells
/// a caller which failures are worth retrying with backoff above this layer.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use hoard::{Hoard, HoardCache, MemoryBackend, Nut};
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let hoard = Hoard::new(MemoryBackend::new());
/// let nut = Nut::from("tok1");
///
/// hoard.save(&nut, &HoardCache::new("boom!"), Duration::from_secs(1)).await.unwrap();
/// let record = hoard.get(&nut).await.unwrap();
/// assert_eq!(record.state, "boom!");
///
/// // Consuming the token invalidates it for everyone.
/// let consumed = hoard.get_and_delete(&nut).await.unwrap();
/// assert_eq!(consumed.state, "boom!");
/// assert!(hoard.get_and_delete(&nut).await.is_err());
/// # });
/// ```
#[derive(Clone, Debug)]
pub struct Hoard<B> {
    backend: B,
}

impl<B: HoardBackend> Hoard<B> {
    /// Creates a store over the given backend.
    ///
    /// The backend is an injected dependency so tests can substitute
    /// [`MemoryBackend`](crate::MemoryBackend) for a production backend.
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Returns the underlying backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Serializes `record` and stores it under `nut`, expiring after `ttl`.
    ///
    /// Replaces any prior record unconditionally (last-write-wins, no
    /// optimistic concurrency) and resets the expiration.
    ///
    /// # Errors
    ///
    /// - [`HoardError::InvalidInput`] — `nut` is empty or `ttl` is zero
    /// - [`HoardError::Serialization`] — the record could not be encoded
    /// - [`HoardError::Backend`] / [`HoardError::Timeout`] — backend failure
    #[tracing::instrument(skip(self, record), fields(nut = %nut))]
    pub async fn save(&self, nut: &Nut, record: &HoardCache, ttl: Duration) -> HoardResult<()> {
        if nut.is_empty() {
            return Err(HoardError::invalid_input("nut must not be empty"));
        }
        if ttl.is_zero() {
            return Err(HoardError::invalid_input("ttl must be greater than zero"));
        }

        let bytes = serde_json::to_vec(record).map_err(|e| {
            HoardError::serialization_with_source(format!("failed encoding record for nut {nut}"), e)
        })?;

        self.backend.set_with_ttl(nut.as_str().to_owned(), bytes, ttl).await
    }

    /// Retrieves the record for `nut` without removing it.
    ///
    /// # Errors
    ///
    /// - [`HoardError::NotFound`] — nut absent or expired
    /// - [`HoardError::Deserialization`] — stored bytes are not a valid record
    /// - [`HoardError::Backend`] / [`HoardError::Timeout`] — backend failure
    #[tracing::instrument(skip(self), fields(nut = %nut))]
    pub async fn get(&self, nut: &Nut) -> HoardResult<HoardCache> {
        match self.backend.get(nut.as_str()).await? {
            Some(bytes) => decode(nut, &bytes),
            None => Err(HoardError::not_found(nut.as_str())),
        }
    }

    /// Atomically retrieves and removes the record for `nut`.
    ///
    /// This implements single-use-token semantics: exactly one of N
    /// concurrent callers receives the record, and no subsequent read by any
    /// operation observes it again. A second call for the same nut — a
    /// replayed token — returns [`HoardError::NotFound`], which callers must
    /// treat as "token already used or invalid", never as transient.
    ///
    /// # Errors
    ///
    /// - [`HoardError::NotFound`] — nut absent, expired, or already consumed
    /// - [`HoardError::Deserialization`] — stored bytes are not a valid record
    /// - [`HoardError::Backend`] / [`HoardError::Timeout`] — backend failure
    #[tracing::instrument(skip(self), fields(nut = %nut))]
    pub async fn get_and_delete(&self, nut: &Nut) -> HoardResult<HoardCache> {
        match self.backend.take(nut.as_str()).await? {
            Some(bytes) => decode(nut, &bytes),
            None => Err(HoardError::not_found(nut.as_str())),
        }
    }

    /// Verifies the backend is reachable.
    pub async fn health_check(&self) -> HoardResult<()> {
        self.backend.health_check().await
    }
}

/// Decodes stored bytes into a record, tagging failures with the nut.
fn decode(nut: &Nut, bytes: &[u8]) -> HoardResult<HoardCache> {
    serde_json::from_slice(bytes).map_err(|e| {
        tracing::warn!(nut = %nut, error = %e, "stored record failed to decode");
        HoardError::deserialization_with_source(format!("can't decode record for nut {nut}"), e)
    })
}
