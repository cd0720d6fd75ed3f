//! HTTP server for the RegionGate membership service.
//!
//! Wires the `regiongate-storage` protocols to an axum application:
//! membership check is public, open/close/prompt sit behind a shared-secret
//! header recovered by decrypting configured ciphertext at startup.

pub mod bootstrap;
pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod secrets;
pub mod server;

pub use bootstrap::{build_caches, build_state};
pub use config::{
    AdminConfig, AppConfig, LoggingConfig, PromptConfig, ServerConfig, StorageBackend,
    StorageConfig,
};
pub use middleware::ADMIN_SECRET_HEADER;
pub use observability::{apply_logging_level, init_tracing, init_tracing_with_level};
pub use secrets::AdminSecret;
pub use server::{AppState, RegiongateServer, ServerBuilder, build_app};
