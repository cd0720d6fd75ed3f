//! Storage and cache abstractions for the RegionGate membership service.
//!
//! This crate defines the domain types, the error taxonomy, the traits all
//! store and cache backends implement, and the two core protocols:
//!
//! - [`MembershipCoordinator`]: cache-aside reads and write-through
//!   mutations across the durable region store and the volatile dual-set
//!   membership cache, with negative caching for absent codes.
//! - [`PromptText`]: a single read-through cached value backed by a
//!   durable file when the cache is cold.
//!
//! Consistency between store and cache is eventual by design: no lock or
//! transaction spans the two, and stale cache entries self-heal on the next
//! read-through miss.

pub mod coordinator;
pub mod error;
pub mod prompt;
pub mod traits;
pub mod types;

pub use coordinator::MembershipCoordinator;
pub use error::{
    CacheError, ErrorCategory, InvalidRegionCode, MembershipError, PromptError, StoreError,
};
pub use prompt::PromptText;
pub use traits::{MembershipCache, PromptValueCache, RegionStore};
pub use types::{
    CacheSync, Lookup, LookupSource, MAX_REGION_CODE_LEN, MembershipState, RegionCode,
    RegionRecord,
};
