//! Error types for the membership storage and cache layers.
//!
//! The taxonomy separates authoritative-data errors, which propagate to the
//! caller, from acceleration-layer errors, which are absorbed after a log
//! line while the operation falls back to the authoritative path.

use std::fmt;

/// A region code that failed boundary validation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InvalidRegionCode {
    /// The code is the empty string.
    #[error("region code is empty")]
    Empty,

    /// The code does not fit the persistent column.
    #[error("region code is {len} bytes, maximum is {max}")]
    TooLong {
        /// Length of the rejected code in bytes.
        len: usize,
        /// Maximum accepted length in bytes.
        max: usize,
    },
}

/// Errors from the authoritative region store.
///
/// Store errors are always fatal to the enclosing operation and must be
/// surfaced, never swallowed.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store is unreachable or the connection was lost.
    #[error("store connection error: {message}")]
    Connection {
        /// Description of the connection failure.
        message: String,
    },

    /// The store rejected or failed the query.
    #[error("store query error: {message}")]
    Query {
        /// Description of the query failure.
        message: String,
    },

    /// The operation was cancelled or ran out of time.
    ///
    /// Timeout policy lives at the transport boundary; this variant is how
    /// it is propagated instead of hanging.
    #[error("store operation timed out: {message}")]
    Timeout {
        /// Description of the timeout.
        message: String,
    },
}

impl StoreError {
    /// Creates a new `Connection` error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a new `Query` error.
    #[must_use]
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Creates a new `Timeout` error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Returns the error category for logging.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Connection { .. } => ErrorCategory::Infrastructure,
            Self::Query { .. } => ErrorCategory::Query,
            Self::Timeout { .. } => ErrorCategory::Timeout,
        }
    }
}

/// Categories of store errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Connectivity problem.
    Infrastructure,
    /// Query-level failure.
    Query,
    /// Cancelled or timed out.
    Timeout,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Query => write!(f, "query"),
            Self::Timeout => write!(f, "timeout"),
        }
    }
}

/// Errors from the volatile cache backend.
///
/// Cache errors are advisory: membership probes treat them as "unknown"
/// (never as "false") and fall back to the store, mutations log and
/// continue. They are never surfaced to callers.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The cache backend is unreachable.
    #[error("cache connection error: {message}")]
    Connection {
        /// Description of the connection failure.
        message: String,
    },

    /// A cache command failed.
    #[error("cache command error: {message}")]
    Command {
        /// Description of the command failure.
        message: String,
    },
}

impl CacheError {
    /// Creates a new `Connection` error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a new `Command` error.
    #[must_use]
    pub fn command(message: impl Into<String>) -> Self {
        Self::Command {
            message: message.into(),
        }
    }
}

/// Errors surfaced by membership operations.
#[derive(Debug, thiserror::Error)]
pub enum MembershipError {
    /// The code is already present in the allowed set.
    ///
    /// Raised only by the cache-accelerated duplicate check in insert; the
    /// store itself treats a duplicate insert as a no-op.
    #[error("region code already exists: {code}")]
    AlreadyExists {
        /// The conflicting code.
        code: String,
    },

    /// The authoritative store failed; fatal.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl MembershipError {
    /// Creates a new `AlreadyExists` error.
    #[must_use]
    pub fn already_exists(code: impl Into<String>) -> Self {
        Self::AlreadyExists { code: code.into() }
    }

    /// Returns `true` if this is the recoverable conflict variant.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }
}

/// Errors from the prompt text cache.
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    /// The cache was cold and the fallback file could not be read.
    #[error("prompt text unavailable: {message}")]
    Unavailable {
        /// Description of the fallback failure.
        message: String,
    },

    /// The cache write failed during a write-through update; fatal because
    /// the update was the explicit administrative intent.
    #[error("prompt cache write failed: {0}")]
    Cache(#[from] CacheError),

    /// The fallback file write failed during a write-through update; fatal
    /// because the cache value alone is not durable.
    #[error("prompt file write failed: {0}")]
    File(#[from] std::io::Error),
}

impl PromptError {
    /// Creates a new `Unavailable` error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Returns `true` if this read should map to "service unavailable".
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_display_and_category() {
        let err = StoreError::connection("refused");
        assert_eq!(err.to_string(), "store connection error: refused");
        assert_eq!(err.category(), ErrorCategory::Infrastructure);

        let err = StoreError::query("syntax");
        assert_eq!(err.category(), ErrorCategory::Query);

        let err = StoreError::timeout("deadline elapsed");
        assert_eq!(err.category(), ErrorCategory::Timeout);
    }

    #[test]
    fn membership_conflict_is_typed_not_string_matched() {
        let err = MembershipError::already_exists("REGION_A");
        assert!(err.is_conflict());
        assert_eq!(err.to_string(), "region code already exists: REGION_A");

        let err: MembershipError = StoreError::connection("down").into();
        assert!(!err.is_conflict());
    }

    #[test]
    fn prompt_error_predicates() {
        assert!(PromptError::unavailable("no file").is_unavailable());

        let err: PromptError = CacheError::command("SET failed").into();
        assert!(!err.is_unavailable());
        assert!(err.to_string().contains("prompt cache write failed"));
    }

    #[test]
    fn category_display() {
        assert_eq!(ErrorCategory::Infrastructure.to_string(), "infrastructure");
        assert_eq!(ErrorCategory::Query.to_string(), "query");
        assert_eq!(ErrorCategory::Timeout.to_string(), "timeout");
    }
}
