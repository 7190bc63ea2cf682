//! Language preference resolution from prioritized signals.
//!
//! Priority is fixed: explicit query override, cookie, local storage,
//! browser locale, document language tag. The first signal naming an
//! available language wins; everything else falls back to the configured
//! default. The order is policy (explicit user choice beats inferred
//! signals) and must not change.

use std::sync::{
    Mutex,
    PoisonError,
};

use crate::types::{
    Language,
    LanguageCode,
};

/// Access to the persisted language preference and the surrounding
/// environment signals.
///
/// Injected so resolution is testable without a real browser environment;
/// in the frontend this wraps the query string, cookies, local storage and
/// the `navigator`/`<html lang>` values.
pub trait PreferenceStore: Send + Sync {
    /// Explicit per-request override (e.g. a `?lang=` query parameter).
    fn query_param(&self) -> Option<String>;

    /// Language cookie from a previous session.
    fn cookie(&self) -> Option<String>;

    /// Locally persisted preference.
    fn local_storage(&self) -> Option<String>;

    /// Browser-reported locale, possibly region-qualified (`fr-FR`).
    fn browser_locale(&self) -> Option<String>;

    /// Page-level language tag.
    fn document_language(&self) -> Option<String>;

    /// Writes the resolved code back to cookie and local storage so later
    /// resolutions are stable within a session.
    fn persist(&self, code: &LanguageCode);
}

/// Resolves the active language from the store's signals.
///
/// The resolved code is persisted as a side effect, but a fresh query
/// override on the next resolution still outranks it.
pub fn resolve(
    store: &dyn PreferenceStore,
    available: &[Language],
    default_language: &LanguageCode,
) -> LanguageCode {
    let signals = [
        ("querystring", store.query_param()),
        ("cookie", store.cookie()),
        ("localStorage", store.local_storage()),
        ("navigator", store.browser_locale()),
        ("htmlTag", store.document_language()),
    ];

    for (name, signal) in signals {
        let Some(raw) = signal else {
            continue;
        };
        let code = LanguageCode::new(&raw);
        if let Some(matched) = match_available(&code, available) {
            tracing::debug!("Resolved language '{}' from {} signal", matched, name);
            store.persist(&matched);
            return matched;
        }
        tracing::debug!("Ignoring {} signal '{}': not an available language", name, raw);
    }

    tracing::debug!("No preference signal matched; falling back to '{}'", default_language);
    store.persist(default_language);
    default_language.clone()
}

/// Matches a signal against the available set, exact code first, then the
/// primary subtag of a region-qualified code (`fr-fr` matches `fr`).
fn match_available(code: &LanguageCode, available: &[Language]) -> Option<LanguageCode> {
    if let Some(language) = available.iter().find(|language| &language.code == code) {
        return Some(language.code.clone());
    }

    let primary = code.primary_subtag();
    available
        .iter()
        .find(|language| language.code.as_str() == primary)
        .map(|language| language.code.clone())
}

/// In-memory [`PreferenceStore`] for tests and non-browser embeddings.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    inner: Mutex<StoreInner>,
}

/// Mutable signal slots behind the store lock.
#[derive(Debug, Default)]
struct StoreInner {
    query_param: Option<String>,
    cookie: Option<String>,
    local_storage: Option<String>,
    browser_locale: Option<String>,
    document_language: Option<String>,
}

impl MemoryPreferenceStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock helper tolerating poisoning (state stays usable for reads).
    fn lock(&self) -> std::sync::MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_query_param(&self, value: Option<&str>) {
        self.lock().query_param = value.map(ToString::to_string);
    }

    pub fn set_cookie(&self, value: Option<&str>) {
        self.lock().cookie = value.map(ToString::to_string);
    }

    pub fn set_local_storage(&self, value: Option<&str>) {
        self.lock().local_storage = value.map(ToString::to_string);
    }

    pub fn set_browser_locale(&self, value: Option<&str>) {
        self.lock().browser_locale = value.map(ToString::to_string);
    }

    pub fn set_document_language(&self, value: Option<&str>) {
        self.lock().document_language = value.map(ToString::to_string);
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn query_param(&self) -> Option<String> {
        self.lock().query_param.clone()
    }

    fn cookie(&self) -> Option<String> {
        self.lock().cookie.clone()
    }

    fn local_storage(&self) -> Option<String> {
        self.lock().local_storage.clone()
    }

    fn browser_locale(&self) -> Option<String> {
        self.lock().browser_locale.clone()
    }

    fn document_language(&self) -> Option<String> {
        self.lock().document_language.clone()
    }

    fn persist(&self, code: &LanguageCode) {
        let mut inner = self.lock();
        inner.cookie = Some(code.to_string());
        inner.local_storage = Some(code.to_string());
    }
}
