//! Transaction-token cache abstraction for authentication-flow servers.
//!
//! This crate provides the [`Hoard`] store and the [`HoardBackend`] trait
//! that together persist short-lived, single-use transaction state keyed by
//! an opaque token (a [`Nut`]). The protocol layer saves a record when a
//! login flow starts, polls it with non-destructive reads, and consumes it
//! exactly once at flow completion — the atomic consume is what makes a
//! replayed token reliably rejected.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                  Protocol Layer                     │
//! │        (auth flow handlers, token minting)          │
//! ├─────────────────────────────────────────────────────┤
//! │                      Hoard                          │
//! │      save / get / get_and_delete + JSON codec       │
//! ├─────────────────────────────────────────────────────┤
//! │                  HoardBackend trait                 │
//! │           (get, set_with_ttl, take)                 │
//! ├──────────────────┬──────────────────────────────────┤
//! │  MemoryBackend   │          RedisBackend            │
//! │    (testing)     │       (in `hoard-redis`)         │
//! └──────────────────┴──────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```
//! use std::time::Duration;
//! use hoard::{Hoard, HoardCache, MemoryBackend, Nut};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let hoard = Hoard::new(MemoryBackend::new());
//!     let nut = Nut::from("dDSDGHaSg3J7dbbQ");
//!
//!     // Store in-flight transaction state with a TTL
//!     hoard.save(&nut, &HoardCache::new("issued"), Duration::from_secs(300)).await?;
//!
//!     // Poll it as often as needed
//!     let record = hoard.get(&nut).await?;
//!     assert_eq!(record.state, "issued");
//!
//!     // Consume it exactly once at flow completion
//!     let record = hoard.get_and_delete(&nut).await?;
//!     assert_eq!(record.state, "issued");
//!
//!     // Any replay is now NotFound
//!     assert!(hoard.get_and_delete(&nut).await.is_err());
//!     Ok(())
//! }
//! ```
//!
//! # Available Backends
//!
//! | Backend | Use Case | Persistence |
//! |---------|----------|-------------|
//! | [`MemoryBackend`] | Testing, development | No |
//! | `RedisBackend` (in `hoard-redis`) | Production | Yes |
//!
//! # Error Handling
//!
//! All operations return [`HoardResult<T>`]. `NotFound` is the expected
//! steady-state outcome for replayed or expired tokens; see [`HoardError`]
//! for the full taxonomy and [`HoardError::is_transient`] for retry
//! classification.
//!
//! # Feature Flags
//!
//! - **`testutil`**: Enables the `testutil` module (nut/record generators, assertion macros) and
//!   the `conformance` suite for validating third-party backends. Enable this in
//!   `[dev-dependencies]` for integration tests.

#![deny(unsafe_code)]

pub mod backend;
#[cfg(any(test, feature = "testutil"))]
#[allow(clippy::expect_used)]
pub mod conformance;
pub mod error;
pub mod memory;
pub mod store;
#[cfg(any(test, feature = "testutil"))]
#[allow(clippy::expect_used)]
pub mod testutil;
pub mod types;

// Re-export primary types at crate root for convenience
pub use backend::HoardBackend;
pub use error::{BoxError, HoardError, HoardResult};
pub use memory::MemoryBackend;
pub use store::Hoard;
pub use types::{HoardCache, Nut};
