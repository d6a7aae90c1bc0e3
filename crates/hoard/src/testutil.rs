//! Shared test utilities for store and backend testing.
//!
//! Feature-gated behind `testutil` to prevent leaking into production
//! builds.
//!
//! # Usage
//!
//! In integration tests, enable the feature in `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! hoard = { path = "../hoard", features = ["testutil"] }
//! ```

use std::time::Duration;

use crate::{
    memory::MemoryBackend,
    store::Hoard,
    types::{HoardCache, Nut},
};

/// Create a deterministic test nut from a prefix and index.
///
/// Produces tokens like `"prefix:000042"` (zero-padded to 6 digits).
#[must_use]
pub fn make_nut(prefix: &str, idx: usize) -> Nut {
    Nut::from(format!("{prefix}:{idx:06}"))
}

/// Create a test record tagged with a sequence number.
///
/// Produces records with state like `"state-042"` plus a `seq` extra field,
/// so tests can identify which save produced which record.
#[must_use]
pub fn make_record(seq: usize) -> HoardCache {
    HoardCache::new(format!("state-{seq:03}")).with_field("seq", serde_json::json!(seq))
}

/// Create a memory-backed [`Hoard`] pre-populated with `count` records.
///
/// Nuts are formatted as `"{prefix}:{idx:06}"`, each holding
/// [`make_record`]`(idx)` with a one-minute TTL.
///
/// # Panics
///
/// Panics if any `save` fails (should not happen with `MemoryBackend`).
pub async fn populated_hoard(prefix: &str, count: usize) -> Hoard<MemoryBackend> {
    let hoard = Hoard::new(MemoryBackend::new());
    for i in 0..count {
        hoard
            .save(&make_nut(prefix, i), &make_record(i), Duration::from_secs(60))
            .await
            .expect("populate save failed");
    }
    hoard
}

/// Assert that a [`HoardResult`](crate::HoardResult) is a
/// [`HoardError::NotFound`](crate::HoardError::NotFound).
///
/// # Examples
///
/// ```no_run
/// // Requires the `testutil` feature to be enabled.
/// use hoard::assert_not_found;
/// use hoard::{HoardError, HoardResult};
///
/// let result: HoardResult<()> = Err(HoardError::not_found("missing"));
/// assert_not_found!(result);
/// ```
#[macro_export]
macro_rules! assert_not_found {
    ($result:expr) => {
        assert!(
            matches!($result, Err($crate::HoardError::NotFound { .. })),
            "expected HoardError::NotFound, got: {:?}",
            $result,
        );
    };
    ($result:expr, $msg:expr) => {
        assert!(
            matches!($result, Err($crate::HoardError::NotFound { .. })),
            "{}: expected HoardError::NotFound, got: {:?}",
            $msg,
            $result,
        );
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_nut_is_zero_padded() {
        assert_eq!(make_nut("tok", 42).as_str(), "tok:000042");
    }

    #[tokio::test]
    async fn populated_hoard_holds_records() {
        let hoard = populated_hoard("tok", 3).await;
        let record = hoard.get(&make_nut("tok", 1)).await.expect("get");
        assert_eq!(record.state, "state-001");
        assert_eq!(record.extra["seq"], 1);
    }
}
