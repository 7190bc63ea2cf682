//! Core types used throughout the project.

use serde::{
    Deserialize,
    Serialize,
};

/// A short language identifier (e.g. `en`, `fr`, `zh`).
///
/// Codes are normalized to lowercase on construction so that signals from
/// different sources (`fr-FR` from a browser, `fr` from a cookie) compare
/// predictably.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Creates a normalized language code.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_lowercase())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The primary subtag of a region-qualified code.
    ///
    /// `fr-FR` and `fr_FR` both yield `fr`; a bare `fr` yields itself.
    #[must_use]
    pub fn primary_subtag(&self) -> &str {
        self.0.split(['-', '_']).next().unwrap_or(&self.0)
    }
}

impl From<String> for LanguageCode {
    fn from(code: String) -> Self {
        Self::new(code)
    }
}

impl From<&str> for LanguageCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<LanguageCode> for String {
    fn from(code: LanguageCode) -> Self {
        code.0
    }
}

impl AsRef<str> for LanguageCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An entry of the ordered available-language list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    pub code: LanguageCode,

    /// Human-readable name shown in a language switcher (e.g. "Français").
    pub label: String,
}

impl Language {
    #[must_use]
    pub fn new(code: impl Into<LanguageCode>, label: impl Into<String>) -> Self {
        Self { code: code.into(), label: label.into() }
    }
}
