//! Backend trait definition.
//!
//! This module defines the [`HoardBackend`] trait, the narrow key-value
//! contract the store requires from its backing engine. All backends
//! (MemoryBackend, RedisBackend, etc.) implement this trait.
//!
//! # Design Philosophy
//!
//! The trait is deliberately minimal:
//! - **Values are bytes**: serialization lives in the store, not the backend
//! - **Async by default**: every operation is one backend round trip
//! - **`Ok(None)` signals absence**: the distinguished not-found signal, kept
//!   separate from transport errors so the store can map it to
//!   [`HoardError::NotFound`](crate::HoardError::NotFound)
//! - **`take` is atomic**: the read and the delete occur as a single logical
//!   unit from the backend's perspective
//!
//! # Implementing a Backend
//!
//! 1. Implement the [`HoardBackend`] trait
//! 2. Map backend-specific errors to [`HoardError`](crate::HoardError)
//! 3. Run the [`conformance`](crate::conformance) suite against it
//!
//! See [`MemoryBackend`](crate::MemoryBackend) for a reference implementation.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::HoardResult;

/// Abstract TTL-capable key-value backend for the hoard.
///
/// Backends must be thread-safe (`Send + Sync`) and safe for unbounded
/// concurrent callers operating on disjoint or identical keys. Per-key
/// linearization of overlapping operations is the backend's responsibility;
/// the store holds no locks of its own.
#[async_trait]
pub trait HoardBackend: Send + Sync {
    /// Retrieves a value by key without removing it.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(bytes))` if the key exists and has not expired
    /// - `Ok(None)` if the key is absent or expired
    /// - `Err(...)` on backend errors
    #[must_use = "backend operations may fail and errors must be handled"]
    async fn get(&self, key: &str) -> HoardResult<Option<Bytes>>;

    /// Stores a key-value pair with automatic expiration.
    ///
    /// Replaces any prior value unconditionally (last-write-wins) and resets
    /// the expiration to `ttl` from now. The write is visible to concurrent
    /// `get`/`take` on the same key as soon as the backend acknowledges it.
    ///
    /// Callers never pass a zero `ttl`; the store rejects it before reaching
    /// the backend.
    #[must_use = "backend operations may fail and errors must be handled"]
    async fn set_with_ttl(&self, key: String, value: Vec<u8>, ttl: Duration) -> HoardResult<()>;

    /// Atomically reads and removes a key in one indivisible step.
    ///
    /// When N callers race on the same live key, exactly one receives
    /// `Ok(Some(bytes))`; the rest receive `Ok(None)`. No concurrent
    /// operation may observe the key as present once a `take` has consumed
    /// it, and a failed or cancelled `take` leaves the key either fully
    /// present or fully removed, never partially deleted.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(bytes))` with the removed value
    /// - `Ok(None)` if the key was absent, expired, or already taken
    /// - `Err(...)` on backend errors
    #[must_use = "backend operations may fail and errors must be handled"]
    async fn take(&self, key: &str) -> HoardResult<Option<Bytes>>;

    /// Verifies the backend is reachable and not deadlocked.
    #[must_use = "health check results indicate backend availability and must be inspected"]
    async fn health_check(&self) -> HoardResult<()>;
}
