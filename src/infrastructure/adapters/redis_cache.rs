use crate::domain::errors::{DomainError, DomainResult};
use crate::ports::cache_port::CachePort;
use async_trait::async_trait;
use bb8::Pool;
use bb8_redis::RedisConnectionManager;
use redis::AsyncCommands;
use std::time::Duration;
use tracing::{info, warn};

/// Redis 连接池类型
pub type RedisPool = Pool<RedisConnectionManager>;

/// Redis 缓存实现，所有错误降级为未命中
#[derive(Clone)]
pub struct RedisCache {
    pool: RedisPool,
}

impl RedisCache {
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    /// 建立连接池；Redis 暂不可用时仍返回连接池，运行期按未命中处理
    pub async fn connect(redis_url: &str, max_connections: u32) -> DomainResult<Self> {
        info!("Initializing Redis cache pool: max_connections={}", max_connections);

        let manager = RedisConnectionManager::new(redis_url).map_err(|e| {
            DomainError::ConfigurationError(format!("Invalid REDIS_URL: {}", e))
        })?;

        let pool = Pool::builder()
            .max_size(max_connections)
            .connection_timeout(Duration::from_secs(2))
            .build_unchecked(manager);

        let cache = Self::new(pool);
        if let Err(e) = cache.ping().await {
            warn!("Initial Redis connection test failed, but continuing: {}", e);
        }
        Ok(cache)
    }

    async fn ping(&self) -> Result<(), String> {
        let mut conn = self.pool.get().await.map_err(|e| e.to_string())?;
        redis::cmd("PING")
            .query_async::<_, String>(&mut *conn)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

#[async_trait]
impl CachePort for RedisCache {
    async fn get(&self, key: &str) -> Option<String> {
        let mut conn = match self.pool.get().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!("Cache unavailable on get {}: {}", key, e);
                return None;
            }
        };

        match conn.get::<_, Option<String>>(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Cache get failed for {}: {}", key, e);
                None
            }
        }
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: u64) {
        let mut conn = match self.pool.get().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!("Cache unavailable on set {}: {}", key, e);
                return;
            }
        };

        if let Err(e) = conn.set_ex::<_, _, ()>(key, value, ttl_secs).await {
            warn!("Cache set failed for {}: {}", key, e);
        }
    }

    async fn delete(&self, key: &str) {
        let mut conn = match self.pool.get().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!("Cache unavailable on delete {}: {}", key, e);
                return;
            }
        };

        if let Err(e) = conn.del::<_, ()>(key).await {
            warn!("Cache delete failed for {}: {}", key, e);
        }
    }
}
