//! Error types for the PostgreSQL region store backend.

use regiongate_storage::StoreError;
use sqlx_core::error::Error as SqlxError;

/// Errors specific to the PostgreSQL region store backend.
#[derive(Debug, thiserror::Error)]
pub enum PostgresError {
    /// Database connection error.
    #[error("Database connection error: {0}")]
    Connection(#[from] SqlxError),

    /// Schema setup error.
    #[error("Migration error: {0}")]
    Migration(String),

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem.
        message: String,
    },

    /// Pool error.
    #[error("Pool error: {message}")]
    Pool {
        /// Description of the pool problem.
        message: String,
    },
}

impl PostgresError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a new pool error.
    #[must_use]
    pub fn pool(message: impl Into<String>) -> Self {
        Self::Pool {
            message: message.into(),
        }
    }
}

impl From<PostgresError> for StoreError {
    fn from(err: PostgresError) -> Self {
        match err {
            PostgresError::Connection(e) => classify_sqlx_error(&e),
            PostgresError::Migration(e) => StoreError::query(format!("Migration error: {e}")),
            PostgresError::Config { message } => {
                StoreError::connection(format!("Configuration error: {message}"))
            }
            PostgresError::Pool { message } => {
                StoreError::connection(format!("Pool error: {message}"))
            }
        }
    }
}

/// Maps a sqlx error onto the store error taxonomy.
///
/// Connectivity and pool-acquisition failures become `Connection`, pool
/// acquire timeouts become `Timeout`, everything else is a `Query` failure.
pub fn classify_sqlx_error(err: &SqlxError) -> StoreError {
    match err {
        SqlxError::PoolTimedOut => StoreError::timeout(err.to_string()),
        SqlxError::Io(_) | SqlxError::PoolClosed | SqlxError::WorkerCrashed | SqlxError::Tls(_) => {
            StoreError::connection(err.to_string())
        }
        _ => StoreError::query(err.to_string()),
    }
}

/// Result type alias for PostgreSQL operations.
pub type Result<T> = std::result::Result<T, PostgresError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PostgresError::config("invalid URL");
        assert!(err.to_string().contains("Configuration error"));

        let err = PostgresError::pool("pool exhausted");
        assert!(err.to_string().contains("Pool error"));
    }

    #[test]
    fn test_conversion_to_store_error() {
        let pg_err = PostgresError::config("test error");
        let store_err: StoreError = pg_err.into();
        assert!(matches!(store_err, StoreError::Connection { .. }));

        let pg_err = PostgresError::Migration("ddl failed".into());
        let store_err: StoreError = pg_err.into();
        assert!(matches!(store_err, StoreError::Query { .. }));
    }

    #[test]
    fn test_sqlx_classification() {
        assert!(matches!(
            classify_sqlx_error(&SqlxError::PoolTimedOut),
            StoreError::Timeout { .. }
        ));
        assert!(matches!(
            classify_sqlx_error(&SqlxError::PoolClosed),
            StoreError::Connection { .. }
        ));
        assert!(matches!(
            classify_sqlx_error(&SqlxError::RowNotFound),
            StoreError::Query { .. }
        ));
    }
}
