//! Storage and cache traits for region membership.
//!
//! All backends must be thread-safe (`Send + Sync`); the connections they
//! hold are shared, long-lived, externally pooled resources.

use async_trait::async_trait;

use crate::error::{CacheError, StoreError};
use crate::types::RegionCode;

/// The durable source of truth for allowed region codes.
///
/// Every operation is a synchronous round-trip to the persistent store; any
/// connectivity or query failure is a [`StoreError`] and fatal to the
/// enclosing operation.
#[async_trait]
pub trait RegionStore: Send + Sync {
    /// Inserts the code if absent.
    ///
    /// Inserting an already-present code is a no-op at the storage layer -
    /// idempotent insert-if-not-exists, never a uniqueness failure.
    async fn insert(&self, code: &RegionCode) -> Result<(), StoreError>;

    /// Deletes the code if present.
    ///
    /// Deleting an absent code is not an error; deletion is idempotent.
    async fn delete(&self, code: &RegionCode) -> Result<(), StoreError>;

    /// Returns the number of persistent records for the code.
    ///
    /// Uniqueness means this is 0 or 1; existence is answered as
    /// `count > 0`.
    async fn count(&self, code: &RegionCode) -> Result<i64, StoreError>;

    /// Returns the name of this store backend for logging.
    fn backend_name(&self) -> &'static str;
}

/// Dual-set volatile cache for fast positive and negative membership
/// answers.
///
/// The two sets are intended to be disjoint, but that is best-effort, not
/// enforced atomically; every mutation path that adds to one set also
/// attempts removal from the other.
#[async_trait]
pub trait MembershipCache: Send + Sync {
    /// Membership probe against the allowed set.
    ///
    /// Transport failures are [`CacheError`], which callers treat as
    /// "unknown" and fall back to the store: never as "false".
    async fn is_allowed(&self, code: &RegionCode) -> Result<bool, CacheError>;

    /// Membership probe against the denied set.
    async fn is_denied(&self, code: &RegionCode) -> Result<bool, CacheError>;

    /// Adds the code to the allowed set.
    async fn add_allowed(&self, code: &RegionCode) -> Result<(), CacheError>;

    /// Removes the code from the allowed set.
    async fn remove_allowed(&self, code: &RegionCode) -> Result<(), CacheError>;

    /// Adds the code to the denied set.
    async fn add_denied(&self, code: &RegionCode) -> Result<(), CacheError>;

    /// Removes the code from the denied set.
    async fn remove_denied(&self, code: &RegionCode) -> Result<(), CacheError>;

    /// Returns the name of this cache backend for logging.
    fn backend_name(&self) -> &'static str;
}

/// Volatile cache slot for the prompt text value.
///
/// No TTL: the cached value is valid until explicitly overwritten.
#[async_trait]
pub trait PromptValueCache: Send + Sync {
    /// Returns the cached value, `None` when the slot is empty.
    async fn get(&self) -> Result<Option<String>, CacheError>;

    /// Overwrites the cached value.
    async fn set(&self, text: &str) -> Result<(), CacheError>;

    /// Returns the name of this cache backend for logging.
    fn backend_name(&self) -> &'static str;
}
