//! Session-scoped translation context.
//!
//! Owns the active language, the resource bundle, the translation cache and
//! the backend handle. Consumers observe language changes through a watch
//! channel; display elements call [`TranslationContext::translate`] lazily.

use std::sync::Arc;

use tokio::sync::watch;

use crate::backend::Translator;
use crate::bundle::ResourceBundle;
use crate::cache::{
    CacheStats,
    TranslationCache,
};
use crate::config::I18nSettings;
use crate::resolver::{
    self,
    PreferenceStore,
};
use crate::types::{
    Language,
    LanguageCode,
};

/// Application-scoped translation state.
///
/// Exactly one language is active at any time; `set_language` is the only
/// mutation path and rejects codes outside the available set.
pub struct TranslationContext {
    settings: I18nSettings,
    bundle: ResourceBundle,
    cache: TranslationCache,
    translator: Arc<dyn Translator>,
    store: Arc<dyn PreferenceStore>,

    /// Active language; receivers are the subscription mechanism.
    current: watch::Sender<LanguageCode>,

    /// Language resolved at init, restored by `reset()`.
    initial: LanguageCode,
}

impl TranslationContext {
    /// Builds the context, resolving the initial language from the store's
    /// preference signals.
    #[must_use]
    pub fn init(
        settings: I18nSettings,
        bundle: ResourceBundle,
        translator: Arc<dyn Translator>,
        store: Arc<dyn PreferenceStore>,
    ) -> Self {
        let initial = resolver::resolve(
            store.as_ref(),
            &settings.available_languages,
            &settings.default_language,
        );
        tracing::debug!("Translation context initialized with language '{}'", initial);

        let (current, _) = watch::channel(initial.clone());
        Self {
            settings,
            bundle,
            cache: TranslationCache::new(),
            translator,
            store,
            current,
            initial,
        }
    }

    #[must_use]
    pub fn current_language(&self) -> LanguageCode {
        self.current.borrow().clone()
    }

    /// Ordered list offered to language switchers.
    #[must_use]
    pub fn available_languages(&self) -> &[Language] {
        &self.settings.available_languages
    }

    #[must_use]
    pub const fn base_language(&self) -> &LanguageCode {
        &self.settings.base_language
    }

    /// Subscribes to language changes. The receiver yields the current
    /// value immediately on first borrow and wakes on every accepted
    /// `set_language`.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LanguageCode> {
        self.current.subscribe()
    }

    /// Switches the active language.
    ///
    /// A code outside the available set is rejected: logged, no state
    /// change, no persistence, and `false` returned. An accepted switch
    /// notifies every subscriber and persists the choice.
    pub fn set_language(&self, code: &LanguageCode) -> bool {
        if !self.settings.is_available(code) {
            tracing::warn!("Rejecting unknown language code '{}'", code);
            return false;
        }

        let changed = self.current.send_replace(code.clone()) != *code;
        if changed {
            tracing::debug!("Active language changed to '{}'", code);
        }
        self.store.persist(code);
        true
    }

    /// Translates `text` into the active language.
    ///
    /// Base-language text is returned unchanged without touching cache or
    /// backend. Otherwise: cache hit, or a backend call whose result is
    /// cached. Backend failures degrade to the original text and never
    /// reach the caller as errors.
    pub async fn translate(&self, text: &str) -> String {
        let language = self.current_language();
        if language == self.settings.base_language {
            return text.to_string();
        }

        if let Some(cached) = self.cache.get(text, &language) {
            return cached;
        }

        match self.translator.translate(text, &language).await {
            Ok(translated) => {
                self.cache.put(text, &language, translated.clone());
                translated
            }
            Err(error) => {
                tracing::warn!("Translation failed for language '{}': {}", language, error);
                text.to_string()
            }
        }
    }

    /// Static dictionary lookup for the active language, with the
    /// requested → default → key fallback chain.
    #[must_use]
    pub fn lookup(&self, key: &str) -> String {
        self.bundle.text(&self.current_language(), key)
    }

    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Restores the initial resolved language and drops cached
    /// translations. Test lifecycle hook.
    pub fn reset(&self) {
        let _previous = self.current.send_replace(self.initial.clone());
        self.cache.clear();
        tracing::debug!("Translation context reset to '{}'", self.initial);
    }
}

impl std::fmt::Debug for TranslationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationContext")
            .field("current", &self.current_language())
            .field("available_languages", &self.settings.available_languages.len())
            .field("cache", &self.cache.stats())
            .field("translator", &"<dyn Translator>")
            .field("store", &"<dyn PreferenceStore>")
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{
        AtomicUsize,
        Ordering,
    };

    use async_trait::async_trait;
    use googletest::prelude::*;

    use super::*;
    use crate::backend::TranslateError;
    use crate::resolver::MemoryPreferenceStore;

    /// Backend double: fixed responses, call counter, optional failure.
    struct FakeTranslator {
        responses: HashMap<(String, String), String>,
        calls: AtomicUsize,
        fail: bool,
    }

    impl FakeTranslator {
        fn new(responses: &[(&str, &str, &str)]) -> Self {
            let responses = responses
                .iter()
                .map(|(text, lang, out)| {
                    (((*text).to_string(), (*lang).to_string()), (*out).to_string())
                })
                .collect();
            Self { responses, calls: AtomicUsize::new(0), fail: false }
        }

        fn failing() -> Self {
            Self { responses: HashMap::new(), calls: AtomicUsize::new(0), fail: true }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Translator for FakeTranslator {
        async fn translate(
            &self,
            text: &str,
            target: &LanguageCode,
        ) -> Result<String, TranslateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(TranslateError::Api { status: 500 });
            }
            let key = (text.to_string(), target.to_string());
            Ok(self.responses.get(&key).cloned().unwrap_or_else(|| format!("[{target}] {text}")))
        }
    }

    fn bundle() -> ResourceBundle {
        let mut dictionaries = HashMap::new();
        dictionaries.insert(
            LanguageCode::new("en"),
            HashMap::from([("menu".to_string(), "Menu".to_string())]),
        );
        dictionaries.insert(
            LanguageCode::new("fr"),
            HashMap::from([("menu".to_string(), "Menyu".to_string())]),
        );
        ResourceBundle::from_dictionaries(dictionaries, LanguageCode::new("en"))
    }

    fn context_with(translator: Arc<FakeTranslator>) -> TranslationContext {
        TranslationContext::init(
            I18nSettings::default(),
            bundle(),
            translator,
            Arc::new(MemoryPreferenceStore::new()),
        )
    }

    #[googletest::test]
    fn init_resolves_default_language() {
        let context = context_with(Arc::new(FakeTranslator::new(&[])));

        assert_that!(context.current_language().as_str(), eq("en"));
    }

    #[googletest::test]
    fn set_language_rejects_unknown_code() {
        let context = context_with(Arc::new(FakeTranslator::new(&[])));

        let accepted = context.set_language(&LanguageCode::new("xx"));

        expect_that!(accepted, eq(false));
        expect_that!(context.current_language().as_str(), eq("en"));
    }

    #[googletest::test]
    fn set_language_updates_state_and_persists() {
        let store = Arc::new(MemoryPreferenceStore::new());
        let context = TranslationContext::init(
            I18nSettings::default(),
            bundle(),
            Arc::new(FakeTranslator::new(&[])),
            Arc::clone(&store) as Arc<dyn PreferenceStore>,
        );

        let accepted = context.set_language(&LanguageCode::new("fr"));

        expect_that!(accepted, eq(true));
        expect_that!(context.current_language().as_str(), eq("fr"));
        expect_that!(store.cookie(), some(eq("fr")));
    }

    #[tokio::test]
    async fn translate_base_language_is_identity_without_backend_call() {
        let translator = Arc::new(FakeTranslator::new(&[]));
        let context = context_with(Arc::clone(&translator));

        let result = context.translate("Hello").await;

        assert_eq!(result, "Hello");
        assert_eq!(translator.call_count(), 0);
    }

    #[tokio::test]
    async fn translate_caches_after_first_backend_call() {
        let translator = Arc::new(FakeTranslator::new(&[("Hello", "fr", "Bonjour")]));
        let context = context_with(Arc::clone(&translator));
        assert!(context.set_language(&LanguageCode::new("fr")));

        let first = context.translate("Hello").await;
        let second = context.translate("Hello").await;

        assert_eq!(first, "Bonjour");
        assert_eq!(second, "Bonjour");
        assert_eq!(translator.call_count(), 1);
        assert_eq!(context.cache_stats().hits, 1);
    }

    #[tokio::test]
    async fn translate_backend_failure_falls_back_to_source_text() {
        let translator = Arc::new(FakeTranslator::failing());
        let context = context_with(Arc::clone(&translator));
        assert!(context.set_language(&LanguageCode::new("fr")));

        let result = context.translate("Hello").await;

        assert_eq!(result, "Hello");
        assert_eq!(context.cache_stats().entries, 0);
    }

    #[tokio::test]
    async fn translate_failure_is_not_cached_and_retries() {
        let translator = Arc::new(FakeTranslator::failing());
        let context = context_with(Arc::clone(&translator));
        assert!(context.set_language(&LanguageCode::new("fr")));

        let _first = context.translate("Hello").await;
        let _second = context.translate("Hello").await;

        assert_eq!(translator.call_count(), 2);
    }

    #[googletest::test]
    fn subscribe_sees_language_changes() {
        let context = context_with(Arc::new(FakeTranslator::new(&[])));
        let receiver = context.subscribe();

        assert!(context.set_language(&LanguageCode::new("de")));

        assert_that!(receiver.has_changed().unwrap(), eq(true));
        assert_that!(receiver.borrow().as_str(), eq("de"));
    }

    #[googletest::test]
    fn lookup_uses_active_language_with_fallback() {
        let context = context_with(Arc::new(FakeTranslator::new(&[])));

        expect_that!(context.lookup("menu"), eq("Menu"));

        assert!(context.set_language(&LanguageCode::new("fr")));
        expect_that!(context.lookup("menu"), eq("Menyu"));
        expect_that!(context.lookup("missing"), eq("missing"));
    }

    #[tokio::test]
    async fn reset_restores_initial_language_and_clears_cache() {
        let translator = Arc::new(FakeTranslator::new(&[("Hello", "fr", "Bonjour")]));
        let context = context_with(Arc::clone(&translator));
        assert!(context.set_language(&LanguageCode::new("fr")));
        let _warm = context.translate("Hello").await;

        context.reset();

        assert_eq!(context.current_language().as_str(), "en");
        assert_eq!(context.cache_stats().entries, 0);
    }
}
