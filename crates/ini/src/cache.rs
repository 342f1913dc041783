use crate::codec;
use crate::document::IniDocument;
use crate::error::IniError;
use moka::sync::Cache;
use sha2::{Digest, Sha256};
use std::sync::{Arc, OnceLock};
use tracing::{debug, trace};

/// Upper bound of cached documents in the process-wide cache.
pub const DEFAULT_CACHE_CAPACITY: u64 = 256;

type ContentHash = [u8; 32];

static GLOBAL: OnceLock<IniCache> = OnceLock::new();

/// A bounded parse cache keyed by the SHA-256 of the INI text.
///
/// Clones share the same underlying cache.
#[derive(Debug, Clone)]
pub struct IniCache {
    documents: Cache<ContentHash, Arc<IniDocument>>,
}

impl Default for IniCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl IniCache {
    #[must_use]
    pub fn new(capacity: u64) -> Self {
        Self { documents: Cache::new(capacity) }
    }

    /// The cache used by [`crate::loads`] and [`crate::load`].
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(Self::default)
    }

    /// Parses `text`, reusing a cached document for identical content.
    ///
    /// Failed parses are not cached.
    ///
    /// # Errors
    /// See [`crate::parse`].
    pub fn loads(&self, text: &str) -> Result<Arc<IniDocument>, IniError> {
        let key = content_hash(text);

        if let Some(document) = self.documents.get(&key) {
            trace!(hash = %short_hash(&key), "INI cache hit");
            return Ok(document);
        }

        let document = Arc::new(codec::parse(text)?);
        self.documents.insert(key, Arc::clone(&document));
        debug!(hash = %short_hash(&key), sections = document.len(), "INI cache miss, parsed");

        Ok(document)
    }

    /// Whether a document for exactly this text is cached.
    #[must_use]
    pub fn contains(&self, text: &str) -> bool {
        self.documents.contains_key(&content_hash(text))
    }

    /// Number of cached documents after pending maintenance has run.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.documents.run_pending_tasks();
        self.documents.entry_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.documents.invalidate_all();
        self.documents.run_pending_tasks();
    }
}

/// Empties the process-wide cache.
pub fn clear_cache() {
    IniCache::global().clear();
}

fn content_hash(text: &str) -> ContentHash {
    Sha256::digest(text.as_bytes()).into()
}

fn short_hash(hash: &ContentHash) -> String {
    hex::encode(&hash[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_text_shares_one_document() {
        let cache = IniCache::new(8);
        let first = cache.loads("[a]\nk = v\n").unwrap();
        let second = cache.loads("[a]\nk = v\n").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failed_parses_are_not_cached() {
        let cache = IniCache::new(8);
        assert!(cache.loads("stray = 1\n").is_err());
        assert!(!cache.contains("stray = 1\n"));
        assert!(cache.is_empty());
    }

    #[test]
    fn clear_drops_every_entry() {
        let cache = IniCache::new(8);
        cache.loads("[a]\nk = 1\n").unwrap();
        cache.loads("[b]\nk = 2\n").unwrap();
        cache.clear();

        assert!(cache.is_empty());
        assert!(!cache.contains("[a]\nk = 1\n"));
    }
}
