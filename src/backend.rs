//! External translation backend interface.
//!
//! The backend is a collaborator behind HTTPS; every failure mode (network,
//! rate limit, timeout, malformed body) surfaces as a [`TranslateError`]
//! that the context downgrades to the untranslated source text.

use std::time::Duration;

use async_trait::async_trait;
use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::config::BackendConfig;
use crate::types::LanguageCode;

#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("Translation request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Translation request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Translation backend returned status {status}")]
    Api { status: u16 },

    #[error("Malformed translation response: {0}")]
    MalformedResponse(String),
}

/// Translation provider interface.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translates `text` into `target`.
    async fn translate(&self, text: &str, target: &LanguageCode)
    -> Result<String, TranslateError>;
}

/// Request body: `{"text": ..., "targetLang": ...}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TranslateRequest<'a> {
    text: &'a str,
    target_lang: &'a str,
}

/// Response body: `{"translatedText": ...}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    translated_text: String,
}

/// HTTP client for the translation backend route.
#[derive(Debug, Clone)]
pub struct HttpTranslator {
    client: reqwest::Client,
    endpoint: String,

    /// Bound on the whole request; elapsing is treated like any other
    /// backend failure.
    timeout: Duration,
}

impl HttpTranslator {
    #[must_use]
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self { client: reqwest::Client::new(), endpoint: endpoint.into(), timeout }
    }

    #[must_use]
    pub fn from_settings(config: &BackendConfig) -> Self {
        Self::new(&config.endpoint, Duration::from_millis(config.timeout_ms))
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(
        &self,
        text: &str,
        target: &LanguageCode,
    ) -> Result<String, TranslateError> {
        let request = TranslateRequest { text, target_lang: target.as_str() };

        let response = tokio::time::timeout(
            self.timeout,
            self.client.post(&self.endpoint).json(&request).send(),
        )
        .await
        .map_err(|_elapsed| TranslateError::Timeout(self.timeout))??;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslateError::Api { status: status.as_u16() });
        }

        let body: TranslateResponse = response
            .json()
            .await
            .map_err(|e| TranslateError::MalformedResponse(e.to_string()))?;

        Ok(body.translated_text)
    }
}
