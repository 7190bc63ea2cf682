//! Process-lifetime memoization of backend translation results.
//!
//! No eviction and no TTL: the working set is the distinct literal strings
//! shown to users, bounded by the UI surface rather than request volume.

use std::collections::HashMap;
use std::sync::{
    Mutex,
    PoisonError,
};

use crate::types::LanguageCode;

/// `(source text, target language)` → translated text.
#[derive(Debug, Default)]
pub struct TranslationCache {
    inner: Mutex<CacheInner>,
}

/// Entries and counters behind the cache lock.
#[derive(Debug, Default)]
struct CacheInner {
    /// target language → source text → translated text
    entries: HashMap<LanguageCode, HashMap<String, String>>,
    hits: u64,
    misses: u64,
}

/// Hit/miss counters, observable for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl TranslationCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock helper tolerating poisoning (entries stay usable).
    fn lock(&self) -> std::sync::MutexGuard<'_, CacheInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cached translation for `(text, language)`, counting the lookup.
    #[must_use]
    pub fn get(&self, text: &str, language: &LanguageCode) -> Option<String> {
        let mut inner = self.lock();
        let found = inner.entries.get(language).and_then(|by_text| by_text.get(text)).cloned();
        if found.is_some() {
            inner.hits += 1;
        } else {
            inner.misses += 1;
        }
        found
    }

    /// Stores a resolved translation. Last write wins when concurrent
    /// lookups for the same key each reached the backend; results for
    /// identical input are identical, so the race is benign.
    pub fn put(&self, text: &str, language: &LanguageCode, translated: String) {
        let mut inner = self.lock();
        inner.entries.entry(language.clone()).or_default().insert(text.to_string(), translated);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().entries.values().map(HashMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        CacheStats {
            hits: inner.hits,
            misses: inner.misses,
            entries: inner.entries.values().map(HashMap::len).sum(),
        }
    }

    /// Drops all entries and counters. Test lifecycle only; production
    /// entries live for the whole process.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.hits = 0;
        inner.misses = 0;
    }
}
