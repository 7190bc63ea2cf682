//! Display element for a single translated text node.
//!
//! The Rust rendition of the frontend `Trans` wrapper: a three-state
//! machine (`Idle → Pending → Resolved`) with a per-instance request
//! sequence. Only the resolution matching the newest issued sequence
//! commits, so a slow earlier request can never clobber a faster later
//! one, and nothing commits after unmount.

use std::sync::atomic::{
    AtomicBool,
    AtomicU64,
    Ordering,
};
use std::sync::{
    Arc,
    Mutex,
    PoisonError,
};

use crate::context::TranslationContext;

/// Lifecycle of a translated text node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    /// Showing the source text; no request issued yet.
    Idle,
    /// A translation request is in flight; the previously rendered text
    /// stays visible (no flash of empty content).
    Pending,
    /// Showing the result of the newest request.
    Resolved,
}

/// One mounted text node observing the translation context.
pub struct TransText {
    context: Arc<TranslationContext>,
    inner: Mutex<Inner>,

    /// Monotonically increasing request sequence; the newest wins.
    seq: AtomicU64,

    /// Cleared on unmount; resolutions arriving afterwards are discarded.
    mounted: AtomicBool,
}

/// Source and rendered text behind the element lock.
#[derive(Debug)]
struct Inner {
    source: String,
    rendered: String,
    state: DisplayState,
}

impl TransText {
    /// Mounts a node showing `source` until a translation resolves.
    #[must_use]
    pub fn new(context: Arc<TranslationContext>, source: impl Into<String>) -> Self {
        let source = source.into();
        Self {
            context,
            inner: Mutex::new(Inner {
                rendered: source.clone(),
                source,
                state: DisplayState::Idle,
            }),
            seq: AtomicU64::new(0),
            mounted: AtomicBool::new(true),
        }
    }

    /// Lock helper tolerating poisoning (text stays renderable).
    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The text currently rendered to the user.
    #[must_use]
    pub fn display(&self) -> String {
        self.lock().rendered.clone()
    }

    #[must_use]
    pub fn state(&self) -> DisplayState {
        self.lock().state
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    /// Detaches the node; in-flight resolutions are silently dropped.
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }

    /// Issues a translation request for the current source text and, if
    /// still the newest request on resolution, commits the result.
    pub async fn refresh(&self) {
        if !self.is_mounted() {
            return;
        }

        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let source = {
            let mut inner = self.lock();
            inner.state = DisplayState::Pending;
            inner.source.clone()
        };

        let translated = self.context.translate(&source).await;
        self.commit(seq, translated);
    }

    /// Replaces the source text and re-resolves. The previously rendered
    /// text stays visible while the new request is pending.
    pub async fn set_source(&self, source: impl Into<String>) {
        {
            let mut inner = self.lock();
            inner.source = source.into();
        }
        self.refresh().await;
    }

    /// Applies a resolution unless the node unmounted or a newer request
    /// superseded it in the meantime.
    fn commit(&self, seq: u64, translated: String) {
        if !self.is_mounted() {
            tracing::trace!("Discarding translation for unmounted node");
            return;
        }
        if seq != self.seq.load(Ordering::SeqCst) {
            tracing::trace!("Discarding stale translation (request {} superseded)", seq);
            return;
        }

        let mut inner = self.lock();
        inner.rendered = translated;
        inner.state = DisplayState::Resolved;
    }

    /// Drives the node: resolves once on mount, then re-resolves on every
    /// language change until the context is dropped or the node unmounts.
    pub async fn drive(&self) {
        let mut languages = self.context.subscribe();
        self.refresh().await;

        while languages.changed().await.is_ok() {
            if !self.is_mounted() {
                break;
            }
            self.refresh().await;
        }
    }
}

impl std::fmt::Debug for TransText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("TransText")
            .field("source", &inner.source)
            .field("rendered", &inner.rendered)
            .field("state", &inner.state)
            .field("mounted", &self.is_mounted())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use async_trait::async_trait;
    use googletest::prelude::*;

    use super::*;
    use crate::backend::{
        TranslateError,
        Translator,
    };
    use crate::bundle::ResourceBundle;
    use crate::config::I18nSettings;
    use crate::resolver::MemoryPreferenceStore;
    use crate::types::LanguageCode;

    /// Echoes `[lang] text` after a per-language delay.
    struct DelayedTranslator {
        delays: HashMap<String, Duration>,
    }

    impl DelayedTranslator {
        fn new(delays: &[(&str, u64)]) -> Self {
            let delays = delays
                .iter()
                .map(|(lang, ms)| ((*lang).to_string(), Duration::from_millis(*ms)))
                .collect();
            Self { delays }
        }
    }

    #[async_trait]
    impl Translator for DelayedTranslator {
        async fn translate(
            &self,
            text: &str,
            target: &LanguageCode,
        ) -> Result<String, TranslateError> {
            if let Some(delay) = self.delays.get(target.as_str()) {
                tokio::time::sleep(*delay).await;
            }
            Ok(format!("[{target}] {text}"))
        }
    }

    fn context(delays: &[(&str, u64)]) -> Arc<TranslationContext> {
        Arc::new(TranslationContext::init(
            I18nSettings::default(),
            ResourceBundle::from_dictionaries(HashMap::new(), LanguageCode::new("en")),
            Arc::new(DelayedTranslator::new(delays)),
            Arc::new(MemoryPreferenceStore::new()),
        ))
    }

    #[googletest::test]
    fn new_node_is_idle_and_shows_source() {
        let node = TransText::new(context(&[]), "Hello");

        expect_that!(node.display(), eq("Hello"));
        expect_that!(node.is_mounted(), eq(true));
        assert_eq!(node.state(), DisplayState::Idle);
    }

    #[tokio::test]
    async fn refresh_at_base_language_resolves_to_source() {
        let node = TransText::new(context(&[]), "Hello");

        node.refresh().await;

        assert_eq!(node.display(), "Hello");
        assert_eq!(node.state(), DisplayState::Resolved);
    }

    #[tokio::test]
    async fn refresh_resolves_to_translation() {
        let ctx = context(&[]);
        assert!(ctx.set_language(&LanguageCode::new("fr")));
        let node = TransText::new(ctx, "Hello");

        node.refresh().await;

        assert_eq!(node.display(), "[fr] Hello");
        assert_eq!(node.state(), DisplayState::Resolved);
    }

    #[tokio::test]
    async fn previous_text_stays_visible_while_pending() {
        let ctx = context(&[("fr", 50)]);
        assert!(ctx.set_language(&LanguageCode::new("fr")));
        let node = Arc::new(TransText::new(Arc::clone(&ctx), "Hello"));

        let pending = tokio::spawn({
            let node = Arc::clone(&node);
            async move { node.refresh().await }
        });
        tokio::time::sleep(Duration::from_millis(5)).await;

        assert_eq!(node.state(), DisplayState::Pending);
        assert_eq!(node.display(), "Hello");

        pending.await.unwrap();
        assert_eq!(node.display(), "[fr] Hello");
    }

    #[tokio::test]
    async fn stale_resolution_is_discarded_in_favor_of_newest() {
        let ctx = context(&[("fr", 50), ("de", 5)]);
        assert!(ctx.set_language(&LanguageCode::new("fr")));
        let node = Arc::new(TransText::new(Arc::clone(&ctx), "Hello"));

        let slow = tokio::spawn({
            let node = Arc::clone(&node);
            async move { node.refresh().await }
        });
        tokio::time::sleep(Duration::from_millis(5)).await;

        // Switch language and issue a newer, faster request before the
        // first resolves.
        assert!(ctx.set_language(&LanguageCode::new("de")));
        node.refresh().await;
        slow.await.unwrap();

        assert_eq!(node.display(), "[de] Hello");
        assert_eq!(node.state(), DisplayState::Resolved);
    }

    #[tokio::test]
    async fn resolution_after_unmount_is_discarded() {
        let ctx = context(&[("fr", 30)]);
        assert!(ctx.set_language(&LanguageCode::new("fr")));
        let node = Arc::new(TransText::new(Arc::clone(&ctx), "Hello"));

        let pending = tokio::spawn({
            let node = Arc::clone(&node);
            async move { node.refresh().await }
        });
        tokio::time::sleep(Duration::from_millis(5)).await;
        node.unmount();
        pending.await.unwrap();

        assert_eq!(node.display(), "Hello");
        assert_eq!(node.state(), DisplayState::Pending);
    }

    #[tokio::test]
    async fn set_source_re_resolves_with_new_text() {
        let ctx = context(&[]);
        assert!(ctx.set_language(&LanguageCode::new("fr")));
        let node = TransText::new(ctx, "Hello");
        node.refresh().await;

        node.set_source("Goodbye").await;

        assert_eq!(node.display(), "[fr] Goodbye");
    }

    #[tokio::test]
    async fn drive_re_resolves_on_language_change() {
        let ctx = context(&[]);
        let node = Arc::new(TransText::new(Arc::clone(&ctx), "Hello"));

        let driver = tokio::spawn({
            let node = Arc::clone(&node);
            async move { node.drive().await }
        });
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(node.display(), "Hello");

        assert!(ctx.set_language(&LanguageCode::new("fr")));
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(node.display(), "[fr] Hello");

        node.unmount();
        assert!(ctx.set_language(&LanguageCode::new("de")));
        driver.await.unwrap();
        assert_eq!(node.display(), "[fr] Hello");
    }
}
