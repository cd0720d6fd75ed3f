//! Read-through prompt text cache with a durable file fallback.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs;
use tracing::warn;

use crate::error::PromptError;
use crate::traits::PromptValueCache;

/// A single mutable prompt text with two storage locations.
///
/// The volatile cache is authoritative when warm; the file is the durable
/// source of truth and the fallback when the cache is cold. Reads trim
/// surrounding whitespace from the file copy; writes persist the text
/// verbatim to both locations.
pub struct PromptText {
    cache: Arc<dyn PromptValueCache>,
    fallback_path: PathBuf,
}

impl PromptText {
    /// Creates a prompt cache over the given backend and fallback file.
    pub fn new(cache: Arc<dyn PromptValueCache>, fallback_path: impl Into<PathBuf>) -> Self {
        Self {
            cache,
            fallback_path: fallback_path.into(),
        }
    }

    /// Returns the current prompt text.
    ///
    /// A warm, non-empty cache value is returned as-is. Otherwise the
    /// fallback file is read, trimmed of surrounding whitespace, and the
    /// cache is refilled best-effort.
    ///
    /// # Errors
    ///
    /// Returns `PromptError::Unavailable` if the cache is cold and the
    /// fallback file cannot be read.
    pub async fn get(&self) -> Result<String, PromptError> {
        match self.cache.get().await {
            Ok(Some(text)) if !text.is_empty() => return Ok(text),
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "prompt cache read failed, falling back to file");
            }
        }

        let raw = fs::read_to_string(&self.fallback_path).await.map_err(|e| {
            PromptError::unavailable(format!("{}: {e}", self.fallback_path.display()))
        })?;
        let text = raw.trim().to_string();

        if let Err(e) = self.cache.set(&text).await {
            warn!(error = %e, "prompt cache refill failed");
        }

        Ok(text)
    }

    /// Write-through update: cache first, then the fallback file.
    ///
    /// # Errors
    ///
    /// Both writes are fatal: a failed cache write would leave reads
    /// serving the old value against the explicit administrative intent,
    /// and the cache value alone does not survive a cache restart.
    pub async fn set(&self, text: &str) -> Result<(), PromptError> {
        self.cache.set(text).await?;
        fs::write(&self.fallback_path, text).await?;
        Ok(())
    }

    /// Path of the durable fallback file.
    #[must_use]
    pub fn fallback_path(&self) -> &Path {
        &self.fallback_path
    }
}
