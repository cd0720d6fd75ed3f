//! Cache-aside coordination between the region store and the membership
//! cache.
//!
//! The store is the single source of truth; the cache is a disposable,
//! rebuildable projection. No lock spans the two: a crash or race between
//! a store write and its cache follow-up leaves a stale entry that
//! self-heals on the next read-through miss. The store itself is the
//! serialization point for durable truth.

use std::sync::Arc;

use tracing::warn;

use crate::error::MembershipError;
use crate::traits::{MembershipCache, RegionStore};
use crate::types::{CacheSync, Lookup, LookupSource, MembershipState, RegionCode};

/// Orchestrates reads and writes across the durable store and the volatile
/// dual-set cache.
///
/// Mutations write through the store first, then adjust both cache sets
/// best-effort. Reads consult the cache first and fall back to the store,
/// repopulating the matching set on the way out (negative caching keeps
/// repeated misses for absent codes off the store).
#[derive(Clone)]
pub struct MembershipCoordinator {
    store: Arc<dyn RegionStore>,
    cache: Arc<dyn MembershipCache>,
}

impl MembershipCoordinator {
    /// Creates a coordinator over the given store and cache backends.
    pub fn new(store: Arc<dyn RegionStore>, cache: Arc<dyn MembershipCache>) -> Self {
        Self { store, cache }
    }

    /// Opens a region: inserts the code into the store and warms the
    /// allowed set.
    ///
    /// The allowed-set probe up front is a best-effort short-circuit for
    /// duplicates, not a correctness guarantee: the store's
    /// insert-if-absent stays authoritative, so a cold cache just means the
    /// second insert becomes a store-level no-op.
    ///
    /// # Errors
    ///
    /// Returns `MembershipError::AlreadyExists` on the cache short-circuit
    /// and `MembershipError::Store` if the store write fails.
    pub async fn insert(&self, code: &RegionCode) -> Result<CacheSync, MembershipError> {
        match self.cache.is_allowed(code).await {
            Ok(true) => return Err(MembershipError::already_exists(code.as_str())),
            Ok(false) => {}
            Err(e) => {
                warn!(code = %code, error = %e, "allowed-set probe failed, deferring to store");
            }
        }

        self.store.insert(code).await?;

        let mut sync = CacheSync::Synced;
        if let Err(e) = self.cache.add_allowed(code).await {
            warn!(code = %code, error = %e, "failed to add code to allowed set");
            sync = CacheSync::Degraded;
        }
        // Clear any stale negative entry left by an earlier delete.
        if let Err(e) = self.cache.remove_denied(code).await {
            warn!(code = %code, error = %e, "failed to clear code from denied set");
            sync = CacheSync::Degraded;
        }
        Ok(sync)
    }

    /// Closes a region: deletes the code from the store and negative-caches
    /// it.
    ///
    /// Deleting an absent code succeeds: deletion is idempotent. The code
    /// is proactively added to the denied set so repeated checks for the
    /// now-absent code stay off the store.
    ///
    /// # Errors
    ///
    /// Returns `MembershipError::Store` if the store delete fails.
    pub async fn delete(&self, code: &RegionCode) -> Result<CacheSync, MembershipError> {
        self.store.delete(code).await?;

        let mut sync = CacheSync::Synced;
        if let Err(e) = self.cache.remove_allowed(code).await {
            warn!(code = %code, error = %e, "failed to remove code from allowed set");
            sync = CacheSync::Degraded;
        }
        if let Err(e) = self.cache.add_denied(code).await {
            warn!(code = %code, error = %e, "failed to add code to denied set");
            sync = CacheSync::Degraded;
        }
        Ok(sync)
    }

    /// Checks whether a region code is allowed.
    ///
    /// Cache hits on either set answer without a store round-trip; on a
    /// miss (or cache failure) the store count is authoritative and the
    /// matching set is repopulated best-effort. The returned
    /// [`Lookup::source`] records which path answered.
    ///
    /// # Errors
    ///
    /// Returns `MembershipError::Store` if the fallback store query fails.
    pub async fn exists(&self, code: &RegionCode) -> Result<Lookup, MembershipError> {
        match self.cached_state(code).await {
            MembershipState::Allowed => {
                return Ok(Lookup {
                    allowed: true,
                    source: LookupSource::Cache,
                });
            }
            MembershipState::Denied => {
                return Ok(Lookup {
                    allowed: false,
                    source: LookupSource::Cache,
                });
            }
            MembershipState::Unknown => {}
        }

        let count = self.store.count(code).await?;
        let allowed = count > 0;

        // Repopulate whichever set matches; failure does not affect the
        // returned answer.
        let repopulate = if allowed {
            self.cache.add_allowed(code).await
        } else {
            self.cache.add_denied(code).await
        };
        if let Err(e) = repopulate {
            warn!(code = %code, allowed, error = %e, "failed to repopulate membership cache");
        }

        Ok(Lookup {
            allowed,
            source: LookupSource::Store,
        })
    }

    /// Probes both cache sets and derives the membership state.
    ///
    /// Any probe failure degrades that probe to "unknown", never to
    /// "false".
    pub async fn cached_state(&self, code: &RegionCode) -> MembershipState {
        match self.cache.is_allowed(code).await {
            Ok(true) => return MembershipState::Allowed,
            Ok(false) => {}
            Err(e) => {
                warn!(code = %code, error = %e, "allowed-set probe failed");
            }
        }
        match self.cache.is_denied(code).await {
            Ok(true) => MembershipState::Denied,
            Ok(false) => MembershipState::Unknown,
            Err(e) => {
                warn!(code = %code, error = %e, "denied-set probe failed");
                MembershipState::Unknown
            }
        }
    }
}
