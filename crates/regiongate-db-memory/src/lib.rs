//! In-memory backends for the RegionGate service.
//!
//! Implements the `regiongate-storage` traits without any external service:
//! a papaya-backed region store and dashmap-backed cache sets. The server
//! uses these when Redis is disabled or unreachable; the tests use them to
//! exercise the full protocol without infrastructure.

pub mod cache;
pub mod store;

pub use cache::{MemoryMembershipCache, MemoryPromptCache};
pub use store::MemoryRegionStore;
