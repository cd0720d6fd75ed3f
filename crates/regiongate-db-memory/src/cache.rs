//! In-memory cache backends.
//!
//! Used when Redis is disabled or unreachable (single-instance mode) and by
//! the integration tests. Same contracts as the Redis backends, without the
//! network failure modes.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashSet;
use tokio::sync::RwLock;

use regiongate_storage::{CacheError, MembershipCache, PromptValueCache, RegionCode};

/// In-memory dual-set membership cache.
#[derive(Debug, Default)]
pub struct MemoryMembershipCache {
    allowed: DashSet<String>,
    denied: DashSet<String>,
}

impl MemoryMembershipCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every entry from both sets.
    ///
    /// The cache is a disposable projection; flushing costs a store
    /// round-trip per code until the sets are repopulated, nothing more.
    pub fn flush(&self) {
        self.allowed.clear();
        self.denied.clear();
    }
}

#[async_trait]
impl MembershipCache for MemoryMembershipCache {
    async fn is_allowed(&self, code: &RegionCode) -> Result<bool, CacheError> {
        Ok(self.allowed.contains(code.as_str()))
    }

    async fn is_denied(&self, code: &RegionCode) -> Result<bool, CacheError> {
        Ok(self.denied.contains(code.as_str()))
    }

    async fn add_allowed(&self, code: &RegionCode) -> Result<(), CacheError> {
        self.allowed.insert(code.as_str().to_string());
        Ok(())
    }

    async fn remove_allowed(&self, code: &RegionCode) -> Result<(), CacheError> {
        self.allowed.remove(code.as_str());
        Ok(())
    }

    async fn add_denied(&self, code: &RegionCode) -> Result<(), CacheError> {
        self.denied.insert(code.as_str().to_string());
        Ok(())
    }

    async fn remove_denied(&self, code: &RegionCode) -> Result<(), CacheError> {
        self.denied.remove(code.as_str());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "in-memory"
    }
}

/// In-memory prompt value slot.
#[derive(Debug, Default)]
pub struct MemoryPromptCache {
    value: Arc<RwLock<Option<String>>>,
}

impl MemoryPromptCache {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PromptValueCache for MemoryPromptCache {
    async fn get(&self) -> Result<Option<String>, CacheError> {
        Ok(self.value.read().await.clone())
    }

    async fn set(&self, text: &str) -> Result<(), CacheError> {
        *self.value.write().await = Some(text.to_string());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "in-memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> RegionCode {
        RegionCode::new(s).unwrap()
    }

    #[tokio::test]
    async fn membership_sets_are_independent() {
        let cache = MemoryMembershipCache::new();
        let region = code("REGION_A");

        cache.add_allowed(&region).await.unwrap();
        assert!(cache.is_allowed(&region).await.unwrap());
        assert!(!cache.is_denied(&region).await.unwrap());

        cache.add_denied(&region).await.unwrap();
        cache.remove_allowed(&region).await.unwrap();
        assert!(!cache.is_allowed(&region).await.unwrap());
        assert!(cache.is_denied(&region).await.unwrap());
    }

    #[tokio::test]
    async fn flush_empties_both_sets() {
        let cache = MemoryMembershipCache::new();
        cache.add_allowed(&code("A")).await.unwrap();
        cache.add_denied(&code("B")).await.unwrap();

        cache.flush();

        assert!(!cache.is_allowed(&code("A")).await.unwrap());
        assert!(!cache.is_denied(&code("B")).await.unwrap());
    }

    #[tokio::test]
    async fn prompt_slot_round_trip() {
        let cache = MemoryPromptCache::new();
        assert_eq!(cache.get().await.unwrap(), None);

        cache.set("hello").await.unwrap();
        assert_eq!(cache.get().await.unwrap().as_deref(), Some("hello"));

        cache.set("overwritten").await.unwrap();
        assert_eq!(cache.get().await.unwrap().as_deref(), Some("overwritten"));
    }
}
