//! Redis connection pool management.

use std::time::Duration;

use deadpool_redis::Pool;
use tracing::info;

use regiongate_storage::CacheError;

use crate::config::RedisConfig;

/// Creates a Redis connection pool and verifies a first connection.
///
/// # Errors
///
/// Returns `CacheError::Connection` if the pool cannot be built or the
/// first connection fails. Callers are expected to fall back to a local
/// cache backend rather than refuse to start.
pub async fn create_pool(config: &RedisConfig) -> Result<Pool, CacheError> {
    info!(url = %config.url, "Connecting to Redis");

    let mut redis_config = deadpool_redis::Config::from_url(&config.url);
    let mut pool_config = redis_config.get_pool_config();
    pool_config.max_size = config.pool_size;
    pool_config.timeouts.wait = Some(Duration::from_millis(config.timeout_ms));
    pool_config.timeouts.create = Some(Duration::from_millis(config.timeout_ms));
    pool_config.timeouts.recycle = Some(Duration::from_millis(config.timeout_ms));
    redis_config.pool = Some(pool_config);

    let pool = redis_config
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .map_err(|e| CacheError::connection(format!("failed to create Redis pool: {e}")))?;

    // Fail here, not on the first request, so the caller can decide to
    // degrade at startup.
    pool.get()
        .await
        .map_err(|e| CacheError::connection(format!("failed to connect to Redis: {e}")))?;

    Ok(pool)
}
