//! In-memory region store backed by a papaya lock-free map.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use papaya::HashMap as PapayaHashMap;
use time::OffsetDateTime;

use regiongate_storage::{RegionCode, RegionRecord, RegionStore, StoreError};

/// In-memory implementation of [`RegionStore`].
///
/// Keeps full [`RegionRecord`]s, with store-assigned monotonic ids, so it
/// behaves like the relational backend: idempotent insert and delete,
/// existence answered by count.
#[derive(Debug)]
pub struct MemoryRegionStore {
    records: PapayaHashMap<String, RegionRecord>,
    next_id: AtomicI64,
}

impl Default for MemoryRegionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRegionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: PapayaHashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of records currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.pin().len()
    }

    /// Returns `true` when the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the record for a code, if present.
    #[must_use]
    pub fn record(&self, code: &RegionCode) -> Option<RegionRecord> {
        self.records.pin().get(code.as_str()).cloned()
    }
}

#[async_trait]
impl RegionStore for MemoryRegionStore {
    async fn insert(&self, code: &RegionCode) -> Result<(), StoreError> {
        let guard = self.records.pin();
        if guard.get(code.as_str()).is_some() {
            // Insert-if-absent: a duplicate is a no-op, not an error.
            return Ok(());
        }
        let record = RegionRecord {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            region_code: code.as_str().to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        guard.insert(code.as_str().to_string(), record);
        Ok(())
    }

    async fn delete(&self, code: &RegionCode) -> Result<(), StoreError> {
        self.records.pin().remove(code.as_str());
        Ok(())
    }

    async fn count(&self, code: &RegionCode) -> Result<i64, StoreError> {
        Ok(i64::from(self.records.pin().get(code.as_str()).is_some()))
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
    async fn insert_is_idempotent() {
        let store = MemoryRegionStore::new();
        let region = code("REGION_A");

        store.insert(&region).await.unwrap();
        let first = store.record(&region).unwrap();

        store.insert(&region).await.unwrap();
        let second = store.record(&region).unwrap();

        // Never two records, and the original record is untouched.
        assert_eq!(store.len(), 1);
        assert_eq!(first, second);
        assert_eq!(store.count(&region).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = MemoryRegionStore::new();
        let region = code("REGION_A");

        store.insert(&region).await.unwrap();
        store.delete(&region).await.unwrap();
        store.delete(&region).await.unwrap();

        assert_eq!(store.count(&region).await.unwrap(), 0);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn ids_are_monotonic() {
        let store = MemoryRegionStore::new();
        store.insert(&code("A")).await.unwrap();
        store.insert(&code("B")).await.unwrap();

        let a = store.record(&code("A")).unwrap();
        let b = store.record(&code("B")).unwrap();
        assert!(b.id > a.id);
    }

    #[tokio::test]
    async fn codes_are_case_sensitive() {
        let store = MemoryRegionStore::new();
        store.insert(&code("region")).await.unwrap();

        assert_eq!(store.count(&code("region")).await.unwrap(), 1);
        assert_eq!(store.count(&code("REGION")).await.unwrap(), 0);
    }
}
