//! Redis implementation of the prompt value cache.

use async_trait::async_trait;
use deadpool_redis::Pool;
use redis::AsyncCommands;

use regiongate_storage::{CacheError, PromptValueCache};

/// Redis key holding the current prompt text.
pub const PROMPT_KEY: &str = "PromptWords";

/// Redis-backed prompt value slot.
///
/// Stored without expiry: the value is valid until explicitly overwritten.
#[derive(Clone)]
pub struct RedisPromptCache {
    pool: Pool,
}

impl RedisPromptCache {
    /// Creates a cache over the given pool.
    #[must_use]
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PromptValueCache for RedisPromptCache {
    async fn get(&self) -> Result<Option<String>, CacheError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| CacheError::connection(e.to_string()))?;
        conn.get::<_, Option<String>>(PROMPT_KEY)
            .await
            .map_err(|e| CacheError::command(e.to_string()))
    }

    async fn set(&self, text: &str) -> Result<(), CacheError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| CacheError::connection(e.to_string()))?;
        conn.set::<_, _, ()>(PROMPT_KEY, text)
            .await
            .map_err(|e| CacheError::command(e.to_string()))
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
