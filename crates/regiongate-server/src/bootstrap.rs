//! Backend wiring: turns an `AppConfig` into a running application state.

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use regiongate_cache_redis::{RedisConfig, RedisMembershipCache, RedisPromptCache};
use regiongate_db_memory::{MemoryMembershipCache, MemoryPromptCache, MemoryRegionStore};
use regiongate_db_postgres::PostgresRegionStore;
use regiongate_storage::{
    MembershipCache, MembershipCoordinator, PromptText, PromptValueCache, RegionStore,
};

use crate::config::{AppConfig, StorageBackend};
use crate::secrets::AdminSecret;
use crate::server::AppState;

/// Builds the full application state from configuration.
///
/// Fails fast on anything authoritative: an unreachable store or an
/// undecryptable admin secret refuses startup. The cache tier is the
/// opposite: Redis trouble degrades to the in-memory backends with a
/// warning, and the server keeps serving.
pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<AppState> {
    let admin = AdminSecret::from_encrypted(
        &cfg.admin.secret_ciphertext,
        &cfg.admin.secret_nonce,
        &cfg.admin.key_hex,
    )
    .context("failed to recover admin secret")?;

    let store = build_store(cfg).await?;
    let (membership_cache, prompt_cache) = build_caches(&cfg.redis).await;

    let memberships = Arc::new(MembershipCoordinator::new(store, membership_cache));
    let prompt = Arc::new(PromptText::new(prompt_cache, &cfg.prompt.fallback_path));

    Ok(AppState {
        memberships,
        prompt,
        admin,
    })
}

async fn build_store(cfg: &AppConfig) -> anyhow::Result<Arc<dyn RegionStore>> {
    match cfg.storage.backend {
        StorageBackend::Postgres => {
            let pg = cfg
                .storage
                .postgres
                .clone()
                .context("storage.postgres config is required for the postgres backend")?;
            let store = PostgresRegionStore::new(pg)
                .await
                .map_err(|e| anyhow::anyhow!("postgres initialization failed: {e}"))?;
            info!(backend = store.backend_name(), "region store ready");
            Ok(Arc::new(store))
        }
        StorageBackend::Memory => {
            warn!("using in-memory region store; records will not survive a restart");
            Ok(Arc::new(MemoryRegionStore::new()))
        }
    }
}

/// Creates the membership and prompt cache backends.
///
/// Redis disabled or unreachable falls back to local in-memory caches; the
/// store stays authoritative either way, so this only costs performance.
pub async fn build_caches(
    redis: &RedisConfig,
) -> (Arc<dyn MembershipCache>, Arc<dyn PromptValueCache>) {
    if !redis.enabled {
        info!("Redis disabled, using local cache only");
        return local_caches();
    }

    match regiongate_cache_redis::create_pool(redis).await {
        Ok(pool) => {
            info!("Connected to Redis");
            (
                Arc::new(RedisMembershipCache::new(pool.clone())),
                Arc::new(RedisPromptCache::new(pool)),
            )
        }
        Err(e) => {
            warn!(error = %e, "Failed to connect to Redis. Falling back to local cache.");
            local_caches()
        }
    }
}

fn local_caches() -> (Arc<dyn MembershipCache>, Arc<dyn PromptValueCache>) {
    (
        Arc::new(MemoryMembershipCache::new()),
        Arc::new(MemoryPromptCache::new()),
    )
}
