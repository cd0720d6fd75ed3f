//! Redis implementation of the dual-set membership cache.

use async_trait::async_trait;
use deadpool_redis::{Connection, Pool};
use redis::AsyncCommands;

use regiongate_storage::{CacheError, MembershipCache, RegionCode};

/// Redis set holding codes known to be allowed.
pub const ALLOWED_SET_KEY: &str = "ratelimit_regions:allowed";

/// Redis set holding codes known to be absent from the store.
pub const DENIED_SET_KEY: &str = "ratelimit_regions:denied";

/// Redis-backed dual-set membership cache.
///
/// Set commands are atomic on the Redis side, which is all the atomicity
/// the protocol relies on; the allowed/denied pair is kept disjoint
/// best-effort by the coordinator, not by this backend.
#[derive(Clone)]
pub struct RedisMembershipCache {
    pool: Pool,
}

impl RedisMembershipCache {
    /// Creates a cache over the given pool.
    #[must_use]
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    async fn conn(&self) -> Result<Connection, CacheError> {
        self.pool
            .get()
            .await
            .map_err(|e| CacheError::connection(e.to_string()))
    }

    async fn is_member(&self, key: &str, code: &RegionCode) -> Result<bool, CacheError> {
        let mut conn = self.conn().await?;
        conn.sismember(key, code.as_str())
            .await
            .map_err(|e| CacheError::command(e.to_string()))
    }

    async fn add_member(&self, key: &str, code: &RegionCode) -> Result<(), CacheError> {
        let mut conn = self.conn().await?;
        conn.sadd::<_, _, ()>(key, code.as_str())
            .await
            .map_err(|e| CacheError::command(e.to_string()))
    }

    async fn remove_member(&self, key: &str, code: &RegionCode) -> Result<(), CacheError> {
        let mut conn = self.conn().await?;
        conn.srem::<_, _, ()>(key, code.as_str())
            .await
            .map_err(|e| CacheError::command(e.to_string()))
    }
}

#[async_trait]
impl MembershipCache for RedisMembershipCache {
    async fn is_allowed(&self, code: &RegionCode) -> Result<bool, CacheError> {
        self.is_member(ALLOWED_SET_KEY, code).await
    }

    async fn is_denied(&self, code: &RegionCode) -> Result<bool, CacheError> {
        self.is_member(DENIED_SET_KEY, code).await
    }

    async fn add_allowed(&self, code: &RegionCode) -> Result<(), CacheError> {
        self.add_member(ALLOWED_SET_KEY, code).await
    }

    async fn remove_allowed(&self, code: &RegionCode) -> Result<(), CacheError> {
        self.remove_member(ALLOWED_SET_KEY, code).await
    }

    async fn add_denied(&self, code: &RegionCode) -> Result<(), CacheError> {
        self.add_member(DENIED_SET_KEY, code).await
    }

    async fn remove_denied(&self, code: &RegionCode) -> Result<(), CacheError> {
        self.remove_member(DENIED_SET_KEY, code).await
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
