//! PostgreSQL implementation of the `RegionStore` trait.

use async_trait::async_trait;
use sqlx_core::query::query;
use sqlx_core::query_scalar::query_scalar;
use sqlx_postgres::PgPool;

use regiongate_storage::{RegionCode, RegionStore, StoreError};

use crate::config::PostgresConfig;
use crate::error::classify_sqlx_error;
use crate::migrations;
use crate::pool;

/// PostgreSQL region store backend.
///
/// The unique constraint on `region_code` is what makes insert idempotent:
/// `ON CONFLICT DO NOTHING` turns a duplicate into a storage-layer no-op
/// instead of a uniqueness failure.
#[derive(Debug, Clone)]
pub struct PostgresRegionStore {
    pool: PgPool,
}

impl PostgresRegionStore {
    /// Creates a new `PostgresRegionStore` with the given configuration.
    ///
    /// This will:
    /// 1. Create a connection pool
    /// 2. Ensure the schema exists (if configured)
    ///
    /// # Errors
    ///
    /// Returns an error if the connection pool cannot be created or the
    /// schema setup fails.
    pub async fn new(config: PostgresConfig) -> Result<Self, StoreError> {
        let pool = pool::create_pool(&config).await?;

        if config.run_migrations {
            migrations::run(&pool).await?;
        }

        Ok(Self { pool })
    }

    /// Creates a new `PostgresRegionStore` from an existing connection pool.
    ///
    /// This allows sharing a connection pool between multiple components.
    /// Schema setup is not run automatically when using this constructor.
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl RegionStore for PostgresRegionStore {
    async fn insert(&self, code: &RegionCode) -> Result<(), StoreError> {
        query(
            "INSERT INTO ratelimit_regions (region_code) VALUES ($1) \
             ON CONFLICT (region_code) DO NOTHING",
        )
        .bind(code.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| classify_sqlx_error(&e))?;

        Ok(())
    }

    async fn delete(&self, code: &RegionCode) -> Result<(), StoreError> {
        // Zero rows affected means the code was already absent; deletion
        // is idempotent, so that is still success.
        query("DELETE FROM ratelimit_regions WHERE region_code = $1")
            .bind(code.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| classify_sqlx_error(&e))?;

        Ok(())
    }

    async fn count(&self, code: &RegionCode) -> Result<i64, StoreError> {
        let count: i64 =
            query_scalar("SELECT COUNT(*) FROM ratelimit_regions WHERE region_code = $1")
                .bind(code.as_str())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| classify_sqlx_error(&e))?;

        Ok(count)
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
