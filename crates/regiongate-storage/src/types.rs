//! Domain types for region membership.

use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::InvalidRegionCode;

/// Maximum length of a region code in bytes.
///
/// The persistent column is `VARCHAR(32)`; rejecting longer codes at the
/// boundary keeps the store from ever having to truncate.
pub const MAX_REGION_CODE_LEN: usize = 32;

/// An opaque, case-sensitive region identifier.
///
/// Uniqueness is enforced by the store. This type only guarantees that the
/// code is non-empty and fits the persistent column; no normalization is
/// applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegionCode(String);

impl RegionCode {
    /// Validates and wraps a raw code.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRegionCode` if the code is empty or longer than
    /// [`MAX_REGION_CODE_LEN`] bytes.
    pub fn new(code: impl Into<String>) -> Result<Self, InvalidRegionCode> {
        let code = code.into();
        if code.is_empty() {
            return Err(InvalidRegionCode::Empty);
        }
        if code.len() > MAX_REGION_CODE_LEN {
            return Err(InvalidRegionCode::TooLong {
                len: code.len(),
                max: MAX_REGION_CODE_LEN,
            });
        }
        Ok(Self(code))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RegionCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A persistent region record as stored by the authoritative store.
///
/// Records are created on insert and deleted on delete, never updated in
/// place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRecord {
    /// Store-assigned monotonic identifier.
    pub id: i64,
    /// The unique region code.
    pub region_code: String,
    /// Creation timestamp, assigned by the store.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Derived membership fact for a region code.
///
/// `Denied` and `Unknown` are observationally identical to callers (both
/// mean "not allowed") but are cached differently: `Denied` is a
/// negative-cache hit, `Unknown` forces a store lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipState {
    /// The code is in the allowed set.
    Allowed,
    /// The code is in the denied set.
    Denied,
    /// Neither set holds the code, or the cache could not be reached.
    Unknown,
}

impl MembershipState {
    /// Returns `true` only for `Allowed`.
    #[must_use]
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Where a membership check found its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupSource {
    /// Answered from the cache, no store round-trip.
    Cache,
    /// Answered from the authoritative store.
    Store,
}

/// Result of a membership check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookup {
    /// Whether the code is allowed.
    pub allowed: bool,
    /// Where the answer came from.
    pub source: LookupSource,
}

/// Advisory outcome of the best-effort cache maintenance that follows a
/// successful mutation.
///
/// `Degraded` means the store write succeeded but one or more cache updates
/// failed; the stale entry self-heals on the next read-through miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSync {
    /// All cache updates applied.
    Synced,
    /// At least one cache update failed and was absorbed.
    Degraded,
}

impl CacheSync {
    /// Returns `true` if any cache update failed.
    #[must_use]
    pub fn is_degraded(self) -> bool {
        matches!(self, Self::Degraded)
    }
}
