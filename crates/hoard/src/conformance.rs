//! Conformance test suite for [`HoardBackend`] implementations.
//!
//! Async test functions that validate whether a backend correctly satisfies
//! the trait contract. Every backend — in-memory, Redis-backed, or
//! third-party — can run the same suite to ensure interoperability. The
//! functions panic on contract violations, so each is meant to be called
//! from a `#[tokio::test]` with a fresh backend instance:
//!
//! ```no_run
//! // Requires the `testutil` feature to be enabled.
//! use std::sync::Arc;
//!
//! use hoard::{conformance, MemoryBackend};
//!
//! # async fn run() {
//! conformance::take_consumes_exactly_once(&Arc::new(MemoryBackend::new())).await;
//! # }
//! ```
//!
//! # Test Categories
//!
//! | Category | Contract aspect |
//! |----------|-----------------|
//! | Basic | get/set round trips, absence signalling |
//! | TTL | expiration, overwrite resets expiry |
//! | Take | atomic consumption, post-take invisibility |
//! | Concurrent | exactly-one-winner under racing takes |

use std::{sync::Arc, time::Duration};

use bytes::Bytes;

use crate::backend::HoardBackend;

/// One-minute TTL used where expiry is not under test.
const LONG_TTL: Duration = Duration::from_secs(60);

// ============================================================================
// Basic — get/set semantics
// ============================================================================

/// `get` on a nonexistent key returns `Ok(None)`, never an error.
pub async fn get_returns_none_for_missing_key<B: HoardBackend>(backend: &B) {
    let result = backend.get("nonexistent").await;
    assert!(result.is_ok(), "get should not error on missing key: {result:?}");
    assert_eq!(result.expect("checked above"), None, "missing key should return None");
}

/// `set_with_ttl` then `get` round-trips the value.
pub async fn set_then_get_returns_value<B: HoardBackend>(backend: &B) {
    backend.set_with_ttl("k1".into(), b"v1".to_vec(), LONG_TTL).await.expect("set should succeed");
    let val = backend.get("k1").await.expect("get should succeed");
    assert_eq!(val, Some(Bytes::from("v1")));
}

/// `set_with_ttl` on an existing key overwrites the value.
pub async fn set_overwrites_existing<B: HoardBackend>(backend: &B) {
    backend.set_with_ttl("k1".into(), b"original".to_vec(), LONG_TTL).await.expect("set");
    backend.set_with_ttl("k1".into(), b"updated".to_vec(), LONG_TTL).await.expect("overwrite");
    let val = backend.get("k1").await.expect("get");
    assert_eq!(val, Some(Bytes::from("updated")));
}

/// `get` does not remove the key — repeated reads all succeed.
pub async fn get_is_non_destructive<B: HoardBackend>(backend: &B) {
    backend.set_with_ttl("k1".into(), b"v".to_vec(), LONG_TTL).await.expect("set");
    for _ in 0..3 {
        let val = backend.get("k1").await.expect("get");
        assert_eq!(val, Some(Bytes::from("v")), "get must not consume the key");
    }
}

// ============================================================================
// TTL — expiration behavior
// ============================================================================

/// A key is readable before its TTL elapses and absent afterwards.
pub async fn ttl_expires_key<B: HoardBackend>(backend: &B) {
    backend
        .set_with_ttl("ttl-key".into(), b"v".to_vec(), Duration::from_millis(200))
        .await
        .expect("set_with_ttl");

    let before = backend.get("ttl-key").await.expect("get before expiry");
    assert_eq!(before, Some(Bytes::from("v")), "key should be readable before the TTL elapses");

    tokio::time::sleep(Duration::from_millis(400)).await;

    let after = backend.get("ttl-key").await.expect("get after expiry");
    assert_eq!(after, None, "key should be absent after the TTL elapses");
}

/// Overwriting a key resets its expiration to the new TTL.
pub async fn overwrite_resets_ttl<B: HoardBackend>(backend: &B) {
    backend
        .set_with_ttl("reset".into(), b"v1".to_vec(), Duration::from_millis(200))
        .await
        .expect("first set");
    backend.set_with_ttl("reset".into(), b"v2".to_vec(), LONG_TTL).await.expect("second set");

    tokio::time::sleep(Duration::from_millis(400)).await;

    let val = backend.get("reset").await.expect("get");
    assert_eq!(val, Some(Bytes::from("v2")), "overwrite should reset the expiration");
}

/// An expired key behaves as if it never existed for `take` as well.
pub async fn take_expired_key_returns_none<B: HoardBackend>(backend: &B) {
    backend
        .set_with_ttl("expired".into(), b"v".to_vec(), Duration::from_millis(100))
        .await
        .expect("set_with_ttl");
    tokio::time::sleep(Duration::from_millis(300)).await;

    let taken = backend.take("expired").await.expect("take");
    assert_eq!(taken, None, "take of an expired key should return None");
}

// ============================================================================
// Take — atomic consumption
// ============================================================================

/// `take` returns the stored value and removes the key.
pub async fn take_returns_and_removes<B: HoardBackend>(backend: &B) {
    backend.set_with_ttl("once".into(), b"v".to_vec(), LONG_TTL).await.expect("set");

    let taken = backend.take("once").await.expect("take");
    assert_eq!(taken, Some(Bytes::from("v")));

    let get = backend.get("once").await.expect("get after take");
    assert_eq!(get, None, "key must be invisible after a successful take");

    let retake = backend.take("once").await.expect("second take");
    assert_eq!(retake, None, "a consumed key cannot be taken again");
}

/// `take` on a nonexistent key returns `Ok(None)`, never an error.
pub async fn take_missing_returns_none<B: HoardBackend>(backend: &B) {
    let result = backend.take("ghost").await;
    assert!(result.is_ok(), "take should not error on missing key: {result:?}");
    assert_eq!(result.expect("checked above"), None);
}

// ============================================================================
// Concurrent — the lost-update race
// ============================================================================

/// N racing `take` calls on the same key yield exactly one winner.
///
/// This is the property that makes single-use tokens replay-proof: two
/// concurrent consumers must never both read the value before either
/// deletes it.
pub async fn take_consumes_exactly_once<B: HoardBackend + 'static>(backend: &Arc<B>) {
    const CONTENDERS: usize = 16;

    backend.set_with_ttl("contended".into(), b"prize".to_vec(), LONG_TTL).await.expect("set");

    let mut handles = Vec::with_capacity(CONTENDERS);
    for _ in 0..CONTENDERS {
        let backend = Arc::clone(backend);
        handles.push(tokio::spawn(async move { backend.take("contended").await }));
    }

    let mut winners = 0usize;
    let mut losers = 0usize;
    for handle in handles {
        match handle.await.expect("task should not panic").expect("take should not error") {
            Some(bytes) => {
                assert_eq!(bytes, Bytes::from("prize"), "winner must see the stored value intact");
                winners += 1;
            },
            None => losers += 1,
        }
    }

    assert_eq!(winners, 1, "exactly one take should win, got {winners}");
    assert_eq!(losers, CONTENDERS - 1, "all other takes should observe None");
}
