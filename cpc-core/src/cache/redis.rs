use std::time::Duration;

use async_trait::async_trait;
use cpc_types::CpcError;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use super::CacheBackend;

/// Shared backend on a Redis server, reached through a reconnecting
/// connection manager.
#[derive(Clone)]
pub struct RedisBackend {
    manager: ConnectionManager,
}

impl RedisBackend {
    /// Connect to `url` (e.g. `redis://127.0.0.1:6379`).
    ///
    /// # Errors
    /// Returns `Cache` when the URL is invalid or the server is unreachable.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "cpc::cache::redis_connect", skip(url))
    )]
    pub async fn connect(url: &str) -> Result<Self, CpcError> {
        let client = redis::Client::open(url)
            .map_err(|e| CpcError::Cache(format!("invalid redis url: {e}")))?;
        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| CpcError::Cache(format!("redis connection failed: {e}")))?;
        #[cfg(feature = "tracing")]
        tracing::info!("connected to redis");
        Ok(Self { manager })
    }
}

fn cache_err(op: &str, e: &redis::RedisError) -> CpcError {
    #[cfg(feature = "tracing")]
    tracing::error!(op, error = %e, "redis command failed");
    CpcError::Cache(format!("redis {op} failed: {e}"))
}

#[async_trait]
impl CacheBackend for RedisBackend {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CpcError> {
        let mut conn = self.manager.clone();
        conn.get::<_, Option<Vec<u8>>>(key)
            .await
            .map_err(|e| cache_err("GET", &e))
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CpcError> {
        let mut conn = self.manager.clone();
        // SET EX rejects a zero expiry.
        let secs = ttl.as_secs().max(1);
        conn.set_ex::<_, _, ()>(key, value, secs)
            .await
            .map_err(|e| cache_err("SET", &e))
    }

    async fn exists(&self, key: &str) -> Result<bool, CpcError> {
        let mut conn = self.manager.clone();
        conn.exists::<_, bool>(key)
            .await
            .map_err(|e| cache_err("EXISTS", &e))
    }
}
