//! Redis-backed backend for the [`hoard`] transaction-token cache.
//!
//! This crate implements [`HoardBackend`](hoard::HoardBackend) over a Redis
//! server: values are stored with native TTL (`SET ... PX`) and the atomic
//! get-and-delete runs as a `MULTI`/`EXEC` transaction, so single-use-token
//! semantics hold across any number of server processes sharing the same
//! Redis.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//! use hoard::{Hoard, HoardCache, Nut};
//! use hoard_redis::{RedisBackend, RedisBackendConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = RedisBackend::connect(
//!         RedisBackendConfig::new("redis://localhost:6379"),
//!     ).await?;
//!
//!     let hoard = Hoard::new(backend);
//!     let nut = Nut::from("dDSDGHaSg3J7dbbQ");
//!     hoard.save(&nut, &HoardCache::new("issued"), Duration::from_secs(300)).await?;
//!     Ok(())
//! }
//! ```

#![deny(unsafe_code)]

pub mod backend;
pub mod config;
pub mod error;

pub use backend::RedisBackend;
pub use config::RedisBackendConfig;
pub use error::RedisHoardError;
