//! In-memory backend implementation.
//!
//! This module provides [`MemoryBackend`], an in-memory implementation of
//! [`HoardBackend`] suitable for testing and development.
//!
//! # Features
//!
//! - **Thread-safe**: uses [`parking_lot::RwLock`] for concurrent access
//! - **TTL support**: a background task cleans up expired keys
//! - **Atomic take**: read-and-remove happens under a single write lock, so
//!   racing consumers see exactly one winner
//!
//! # Limitations
//!
//! - Data is not persisted; everything is lost when the process exits
//! - TTL cleanup runs every second, so physical removal is not precise —
//!   logically expired keys are filtered on read regardless

use std::{
    collections::BTreeMap,
    sync::Arc,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;
use tokio::{select, sync::watch, time::sleep};

use crate::{backend::HoardBackend, error::HoardResult};

/// Holds the shutdown signal sender. When dropped, the watch channel
/// closes and the cleanup task exits.
struct ShutdownGuard {
    shutdown_tx: watch::Sender<()>,
}

impl Drop for ShutdownGuard {
    fn drop(&mut self) {
        // Sending is a best-effort signal; the receiver may already be gone.
        let _ = self.shutdown_tx.send(());
    }
}

/// In-memory backend using [`BTreeMap`].
///
/// Primarily intended for testing the store and as the fake backend for the
/// [`conformance`](crate::conformance) suite, but usable for single-process
/// deployments where persistence is not required.
///
/// # Cloning
///
/// `MemoryBackend` is cheaply cloneable via [`Arc`]. All clones share the
/// same underlying data.
///
/// # Shutdown
///
/// The background TTL cleanup task stops automatically when all clones are
/// dropped (via the internal `ShutdownGuard`). [`shutdown`](Self::shutdown)
/// stops it explicitly when deterministic timing is needed.
#[derive(Clone)]
pub struct MemoryBackend {
    data: Arc<RwLock<BTreeMap<String, Bytes>>>,
    expirations: Arc<RwLock<BTreeMap<String, Instant>>>,
    /// Shared ownership of the shutdown sender. When the last clone drops,
    /// the sender is dropped, closing the watch channel and signaling the
    /// cleanup task to exit.
    shutdown_guard: Arc<ShutdownGuard>,
}

impl MemoryBackend {
    /// Creates a new in-memory backend.
    ///
    /// Spawns a background task that periodically removes keys whose TTL has
    /// elapsed. The task stops when all clones of the backend are dropped.
    ///
    /// # Example
    ///
    /// ```
    /// use hoard::MemoryBackend;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let backend = MemoryBackend::new();
    ///     // backend is now ready for use
    /// }
    /// ```
    #[must_use]
    pub fn new() -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(());
        let backend = Self {
            data: Arc::new(RwLock::new(BTreeMap::new())),
            expirations: Arc::new(RwLock::new(BTreeMap::new())),
            shutdown_guard: Arc::new(ShutdownGuard { shutdown_tx }),
        };

        let backend_clone = backend.clone();
        tokio::spawn(async move {
            backend_clone.cleanup_expired_keys(shutdown_rx).await;
        });

        backend
    }

    /// Background task to clean up expired keys.
    ///
    /// Runs every second. Exits when the shutdown signal is received, i.e.
    /// when the watch sender is dropped or [`shutdown`](Self::shutdown) is
    /// called.
    async fn cleanup_expired_keys(&self, mut shutdown_rx: watch::Receiver<()>) {
        loop {
            select! {
                _ = sleep(Duration::from_secs(1)) => {}
                _ = shutdown_rx.changed() => {
                    return;
                }
            }

            let now = Instant::now();
            let expired_keys: Vec<String> = {
                let expirations = self.expirations.read();
                expirations
                    .iter()
                    .filter(|(_, expiry)| **expiry <= now)
                    .map(|(key, _)| key.clone())
                    .collect()
            };

            if !expired_keys.is_empty() {
                tracing::debug!(count = expired_keys.len(), "removing expired keys");
                let mut data = self.data.write();
                let mut expirations = self.expirations.write();
                for key in expired_keys {
                    data.remove(&key);
                    expirations.remove(&key);
                }
            }
        }
    }

    /// Explicitly signals the background TTL cleanup task to stop.
    ///
    /// Optional — the task also stops when all clones are dropped.
    pub fn shutdown(&self) {
        let _ = self.shutdown_guard.shutdown_tx.send(());
    }

    /// Checks if a key has expired.
    fn is_expired(&self, key: &str) -> bool {
        let expirations = self.expirations.read();
        if let Some(expiry) = expirations.get(key) {
            return *expiry <= Instant::now();
        }
        false
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HoardBackend for MemoryBackend {
    async fn get(&self, key: &str) -> HoardResult<Option<Bytes>> {
        if self.is_expired(key) {
            return Ok(None);
        }

        let data = self.data.read();
        Ok(data.get(key).cloned())
    }

    async fn set_with_ttl(&self, key: String, value: Vec<u8>, ttl: Duration) -> HoardResult<()> {
        let mut data = self.data.write();
        let mut expirations = self.expirations.write();

        let expiry = Instant::now() + ttl;

        data.insert(key.clone(), Bytes::from(value));
        expirations.insert(key, expiry);

        Ok(())
    }

    async fn take(&self, key: &str) -> HoardResult<Option<Bytes>> {
        // Both maps are mutated under write locks held for the whole call,
        // so concurrent takes on the same key are linearized: the first to
        // acquire the lock removes the entry, the rest observe None.
        let mut data = self.data.write();
        let mut expirations = self.expirations.write();

        let expired = expirations.get(key).is_some_and(|expiry| *expiry <= Instant::now());

        let value = data.remove(key);
        expirations.remove(key);

        if expired {
            return Ok(None);
        }
        Ok(value)
    }

    async fn health_check(&self) -> HoardResult<()> {
        // Try to acquire the read lock to verify we're not deadlocked.
        let _unused = self.data.read();
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_then_get() {
        let backend = MemoryBackend::new();

        backend
            .set_with_ttl("key1".into(), b"value1".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();
        let value = backend.get("key1").await.unwrap();
        assert_eq!(value, Some(Bytes::from("value1")));
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.get("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_take_removes_key() {
        let backend = MemoryBackend::new();

        backend.set_with_ttl("k".into(), b"v".to_vec(), Duration::from_secs(60)).await.unwrap();

        let taken = backend.take("k").await.unwrap();
        assert_eq!(taken, Some(Bytes::from("v")));

        assert_eq!(backend.get("k").await.unwrap(), None);
        assert_eq!(backend.take("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_take_missing_returns_none() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.take("ghost").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_take_expired_returns_none() {
        let backend = MemoryBackend::new();

        backend.set_with_ttl("k".into(), b"v".to_vec(), Duration::from_millis(50)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(backend.take("k").await.unwrap(), None);
        // The expired entry is also physically gone after the take.
        assert!(!backend.data.read().contains_key("k"));
        assert!(!backend.expirations.read().contains_key("k"));
    }

    #[tokio::test]
    async fn test_ttl_expiry() {
        let backend = MemoryBackend::new();

        backend
            .set_with_ttl("temp".into(), b"value".to_vec(), Duration::from_millis(100))
            .await
            .unwrap();

        // Should exist immediately
        assert!(backend.get("temp").await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(200)).await;

        // Should be gone
        assert_eq!(backend.get("temp").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_overwrite_resets_ttl() {
        let backend = MemoryBackend::new();

        backend.set_with_ttl("k".into(), b"v1".to_vec(), Duration::from_millis(100)).await.unwrap();
        backend.set_with_ttl("k".into(), b"v2".to_vec(), Duration::from_secs(60)).await.unwrap();

        tokio::time::sleep(Duration::from_millis(200)).await;

        // Alive past the original expiry, holding the new value.
        assert_eq!(backend.get("k").await.unwrap(), Some(Bytes::from("v2")));
    }

    #[tokio::test]
    async fn test_clone_shares_data() {
        let backend1 = MemoryBackend::new();
        let backend2 = backend1.clone();

        backend1.set_with_ttl("k".into(), b"v".to_vec(), Duration::from_secs(60)).await.unwrap();

        assert_eq!(backend2.get("k").await.unwrap(), Some(Bytes::from("v")));
    }

    #[tokio::test]
    async fn test_health_check() {
        let backend = MemoryBackend::new();
        assert!(backend.health_check().await.is_ok());
    }

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_keys() {
        let backend = MemoryBackend::new();

        backend
            .set_with_ttl("cleanup-me".into(), b"v".to_vec(), Duration::from_millis(100))
            .await
            .unwrap();

        // Wait for the key to expire AND for the cleanup task to run (1s cycle).
        tokio::time::sleep(Duration::from_millis(1500)).await;

        // Physically removed, not just filtered on read.
        assert!(!backend.data.read().contains_key("cleanup-me"));
        assert!(!backend.expirations.read().contains_key("cleanup-me"));
    }

    #[tokio::test]
    async fn test_shutdown_stops_cleanup_task() {
        let backend = MemoryBackend::new();

        backend
            .set_with_ttl("ttl-key".into(), b"v".to_vec(), Duration::from_millis(100))
            .await
            .unwrap();

        backend.shutdown();

        // Give the task time to exit, then wait past the TTL.
        sleep(Duration::from_millis(50)).await;
        sleep(Duration::from_millis(1500)).await;

        // The entry is expired but not cleaned up — the task was stopped.
        assert!(
            backend.expirations.read().contains_key("ttl-key"),
            "cleanup task should not have removed the expired entry after shutdown"
        );

        // Reads still treat it as absent.
        assert_eq!(backend.get("ttl-key").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_shutdown_is_idempotent() {
        let backend = MemoryBackend::new();

        backend.shutdown();
        backend.shutdown();

        // Backend is still usable for data operations after shutdown.
        backend.set_with_ttl("k".into(), b"v".to_vec(), Duration::from_secs(60)).await.unwrap();
        assert_eq!(backend.get("k").await.unwrap(), Some(Bytes::from("v")));
    }

    #[tokio::test]
    async fn test_drop_stops_cleanup_task() {
        // Dropping all clones deallocates the ShutdownGuard, closing the
        // watch channel and signaling the task to exit without panics.
        let backend = MemoryBackend::new();
        let clone = backend.clone();

        backend.set_with_ttl("k".into(), b"v".to_vec(), Duration::from_secs(60)).await.unwrap();

        drop(clone);
        drop(backend);

        sleep(Duration::from_millis(100)).await;
    }
}
