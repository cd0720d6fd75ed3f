//! PostgreSQL backend for the RegionGate region store.
//!
//! Provides [`PostgresRegionStore`], an implementation of the
//! `regiongate-storage` `RegionStore` trait on top of a sqlx connection
//! pool, plus pool construction and idempotent schema setup.

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod store;

pub use config::PostgresConfig;
pub use error::{PostgresError, classify_sqlx_error};
pub use pool::{create_pool, test_connection};
pub use store::PostgresRegionStore;
