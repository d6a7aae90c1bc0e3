//! Redis-backed backend implementation.
//!
//! This module provides [`RedisBackend`], which implements the
//! [`HoardBackend`](hoard::HoardBackend) trait over a Redis server. TTL is
//! enforced natively by Redis (`SET ... PX`), and the atomic get-and-delete
//! uses a `MULTI`/`EXEC` pipeline so the read and the delete execute as a
//! single unit on the server.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use hoard::{HoardBackend, HoardResult};
use redis::{
    aio::{ConnectionManager, ConnectionManagerConfig},
    AsyncCommands, Client,
};

use crate::{
    config::RedisBackendConfig,
    error::{redis_error_to_hoard_error, RedisHoardError, Result},
};

/// Redis-backed implementation of [`HoardBackend`].
///
/// # Atomicity
///
/// Redis executes commands single-threaded per key, so overlapping
/// operations on the same token are linearized in server-received order.
/// [`take`](HoardBackend::take) wraps `GET` + `DEL` in a transaction
/// (`MULTI`/`EXEC`): no other client can observe the key between the read
/// and the delete, which is what guarantees exactly one winner among
/// concurrent consumers.
///
/// # Thread Safety
///
/// `RedisBackend` is `Send + Sync` and cheaply cloneable. The underlying
/// [`ConnectionManager`] multiplexes one connection across clones and
/// reconnects automatically after drops.
///
/// # Example
///
/// ```no_run
/// use hoard::{Hoard, HoardBackend};
/// use hoard_redis::{RedisBackend, RedisBackendConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = RedisBackendConfig::new("redis://localhost:6379");
///     let backend = RedisBackend::connect(config).await?;
///     backend.health_check().await?;
///
///     let hoard = Hoard::new(backend);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct RedisBackend {
    manager: ConnectionManager,
}

impl std::fmt::Debug for RedisBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisBackend").finish_non_exhaustive()
    }
}

impl RedisBackend {
    /// Connects to Redis with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the URL does not
    /// parse, or the initial connection cannot be established within the
    /// configured connect timeout.
    pub async fn connect(config: RedisBackendConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::open(config.url.as_str()).map_err(RedisHoardError::from)?;

        let manager_config = ConnectionManagerConfig::new()
            .set_connection_timeout(config.connect_timeout)
            .set_response_timeout(config.response_timeout);

        let manager = ConnectionManager::new_with_config(client, manager_config)
            .await
            .map_err(RedisHoardError::from)?;

        Ok(Self { manager })
    }

    /// Creates a backend from an existing connection manager.
    ///
    /// Useful when the service shares one Redis client across several
    /// components.
    #[must_use]
    pub fn from_manager(manager: ConnectionManager) -> Self {
        Self { manager }
    }

    /// Returns a cloned connection handle for issuing commands.
    fn connection(&self) -> ConnectionManager {
        self.manager.clone()
    }
}

#[async_trait]
impl HoardBackend for RedisBackend {
    async fn get(&self, key: &str) -> HoardResult<Option<Bytes>> {
        let mut conn = self.connection();
        let value: Option<Vec<u8>> =
            conn.get(key).await.map_err(redis_error_to_hoard_error)?;
        Ok(value.map(Bytes::from))
    }

    async fn set_with_ttl(&self, key: String, value: Vec<u8>, ttl: Duration) -> HoardResult<()> {
        let mut conn = self.connection();

        // Redis rejects PX 0; the store already refuses zero TTLs, but a
        // sub-millisecond duration would still truncate to zero here.
        let px = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1);

        let _: () = redis::cmd("SET")
            .arg(&key)
            .arg(value)
            .arg("PX")
            .arg(px)
            .query_async(&mut conn)
            .await
            .map_err(redis_error_to_hoard_error)?;

        Ok(())
    }

    async fn take(&self, key: &str) -> HoardResult<Option<Bytes>> {
        let mut conn = self.connection();

        // MULTI / GET / DEL / EXEC — the server applies both commands with
        // no other client's command interleaved, so concurrent takes on the
        // same key see exactly one non-nil GET.
        let (value, _deleted): (Option<Vec<u8>>, i64) = redis::pipe()
            .atomic()
            .get(key)
            .del(key)
            .query_async(&mut conn)
            .await
            .map_err(redis_error_to_hoard_error)?;

        Ok(value.map(Bytes::from))
    }

    async fn health_check(&self) -> HoardResult<()> {
        let mut conn = self.connection();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(redis_error_to_hoard_error)?;
        Ok(())
    }
}
