//! Schema setup for the region table.

use sqlx_core::query::query;
use sqlx_postgres::PgPool;
use tracing::{debug, instrument};

use crate::error::{PostgresError, Result};

/// The region membership table.
///
/// `region_code` carries the uniqueness the whole protocol leans on;
/// records are inserted and deleted, never updated in place.
const CREATE_REGIONS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS ratelimit_regions (
    id BIGSERIAL PRIMARY KEY,
    region_code VARCHAR(32) UNIQUE NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
)
";

/// Ensures the schema exists; idempotent, safe to run on every startup.
#[instrument(skip(pool))]
pub async fn run(pool: &PgPool) -> Result<()> {
    query(CREATE_REGIONS_TABLE)
        .execute(pool)
        .await
        .map_err(|e| PostgresError::Migration(e.to_string()))?;

    debug!("region table ready");

    Ok(())
}
