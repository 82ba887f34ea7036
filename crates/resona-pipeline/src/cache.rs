//! Redis-backed snapshot cache.
//!
//! Holds the current snapshot per `(user, horizon)` under the bit-exact key
//! `top:<external_user_id>:<horizon>` so other readers of the same Redis can
//! interoperate. Every operation is best-effort: a Redis failure degrades to
//! a miss or a logged no-op, never an error for the caller.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `REDIS_ENABLED`: Set to "false" to disable caching (default: true)
//! - `REDIS_URL`: Redis connection URL (default: redis://localhost:6379)
//! - `RESONA_CACHE_TTL`: TTL in seconds (default: 3600)

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use resona_core::defaults::{CACHE_PREFIX, CACHE_TTL_SECS};
use resona_core::{Horizon, Snapshot, SnapshotCache};

/// Snapshot cache backed by Redis.
#[derive(Clone)]
pub struct RedisSnapshotCache {
    inner: Arc<CacheInner>,
}

struct CacheInner {
    /// Redis connection manager (None if disabled or unreachable).
    connection: RwLock<Option<ConnectionManager>>,
    ttl_seconds: u64,
    enabled: bool,
}

impl RedisSnapshotCache {
    /// Create a cache from environment configuration.
    pub async fn from_env() -> Self {
        let enabled = std::env::var("REDIS_ENABLED")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);
        if !enabled {
            info!("Redis snapshot cache disabled via REDIS_ENABLED=false");
            return Self::disabled();
        }

        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());

        let ttl_seconds: u64 = std::env::var("RESONA_CACHE_TTL")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(CACHE_TTL_SECS);

        Self::with_config(&redis_url, ttl_seconds).await
    }

    /// Create a cache against an explicit Redis URL and TTL.
    pub async fn with_config(redis_url: &str, ttl_seconds: u64) -> Self {
        let connection = match redis::Client::open(redis_url) {
            Ok(client) => match ConnectionManager::new(client).await {
                Ok(conn) => {
                    info!("Redis snapshot cache enabled (TTL: {}s)", ttl_seconds);
                    Some(conn)
                }
                Err(e) => {
                    warn!("Failed to connect to Redis, cache disabled: {}", e);
                    None
                }
            },
            Err(e) => {
                warn!("Invalid Redis URL, cache disabled: {}", e);
                None
            }
        };

        Self {
            inner: Arc::new(CacheInner {
                connection: RwLock::new(connection),
                ttl_seconds,
                enabled: true,
            }),
        }
    }

    /// Create a disabled cache (for testing or when Redis unavailable).
    pub fn disabled() -> Self {
        Self {
            inner: Arc::new(CacheInner {
                connection: RwLock::new(None),
                ttl_seconds: CACHE_TTL_SECS,
                enabled: false,
            }),
        }
    }

    /// Whether the cache is enabled and connected.
    pub async fn is_connected(&self) -> bool {
        self.inner.enabled && self.inner.connection.read().await.is_some()
    }

    /// Bit-exact cache key: `top:<external_user_id>:<horizon>`.
    pub fn cache_key(external_user_id: &str, horizon: Horizon) -> String {
        format!("{}{}:{}", CACHE_PREFIX, external_user_id, horizon.as_str())
    }

    /// Remove one `(user, horizon)` entry.
    pub async fn invalidate(&self, external_user_id: &str, horizon: Horizon) -> bool {
        let key = Self::cache_key(external_user_id, horizon);
        let mut conn_guard = self.inner.connection.write().await;
        let conn = match conn_guard.as_mut() {
            Some(c) => c,
            None => return false,
        };

        match conn.del::<_, ()>(&key).await {
            Ok(_) => {
                debug!("Cache INVALIDATE: {}", key);
                true
            }
            Err(e) => {
                error!("Redis DEL error: {}", e);
                false
            }
        }
    }

    /// Remove every snapshot entry (operational flush).
    ///
    /// Walks the keyspace with a cursor-based SCAN loop so the flush never
    /// blocks Redis the way a single KEYS call over a large keyspace would.
    pub async fn flush_snapshots(&self) -> bool {
        self.clear_by_prefix(CACHE_PREFIX).await
    }

    async fn clear_by_prefix(&self, prefix: &str) -> bool {
        let mut conn_guard = self.inner.connection.write().await;
        let conn = match conn_guard.as_mut() {
            Some(c) => c,
            None => return false,
        };

        let pattern = format!("{}*", prefix);
        let mut cursor: u64 = 0;
        let mut removed = 0usize;

        loop {
            let (next, keys): (u64, Vec<String>) = match redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(conn)
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    error!("Redis SCAN error: {}", e);
                    return false;
                }
            };

            if !keys.is_empty() {
                if let Err(e) = conn.del::<_, ()>(&keys[..]).await {
                    error!("Redis flush error: {}", e);
                    return false;
                }
                removed += keys.len();
            }

            cursor = next;
            if cursor == 0 {
                break;
            }
        }

        info!("Cache FLUSH: removed {} keys", removed);
        true
    }
}

#[async_trait]
impl SnapshotCache for RedisSnapshotCache {
    async fn get(&self, external_user_id: &str, horizon: Horizon) -> Option<Snapshot> {
        let key = Self::cache_key(external_user_id, horizon);
        let mut conn_guard = self.inner.connection.write().await;
        let conn = conn_guard.as_mut()?;

        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(data)) => match serde_json::from_str(&data) {
                Ok(snapshot) => {
                    debug!("Cache HIT: {}", key);
                    Some(snapshot)
                }
                Err(e) => {
                    warn!("Cache deserialization error for {}: {}", key, e);
                    None
                }
            },
            Ok(None) => {
                debug!("Cache MISS: {}", key);
                None
            }
            Err(e) => {
                error!("Redis GET error: {}", e);
                None
            }
        }
    }

    async fn set_with_ttl(
        &self,
        external_user_id: &str,
        horizon: Horizon,
        snapshot: &Snapshot,
    ) -> bool {
        let key = Self::cache_key(external_user_id, horizon);
        let mut conn_guard = self.inner.connection.write().await;
        let conn = match conn_guard.as_mut() {
            Some(c) => c,
            None => return false,
        };

        let serialized = match serde_json::to_string(snapshot) {
            Ok(s) => s,
            Err(e) => {
                error!("Cache serialization error: {}", e);
                return false;
            }
        };

        match conn
            .set_ex::<_, _, ()>(&key, serialized, self.inner.ttl_seconds)
            .await
        {
            Ok(_) => {
                debug!("Cache SET: {} (TTL: {}s)", key, self.inner.ttl_seconds);
                true
            }
            Err(e) => {
                error!("Redis SET error: {}", e);
                false
            }
        }
    }
}
