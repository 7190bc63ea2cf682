use std::path::PathBuf;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::types::{
    Language,
    LanguageCode,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "availableLanguages[0]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Numbered one-per-line rendering of validation errors.
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Settings for the translation pipeline.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct I18nSettings {
    /// Languages offered by the application, in switcher order.
    pub available_languages: Vec<Language>,

    /// Fallback when no preference signal matches an available language.
    pub default_language: LanguageCode,

    /// The language source texts are written in. Translating into it is a
    /// no-op and never reaches the backend.
    pub base_language: LanguageCode,

    /// Directory holding one `<code>.json` resource file per language.
    pub resource_dir: PathBuf,

    /// Separator used when flattening nested resource files.
    pub key_separator: String,

    pub backend: BackendConfig,
}

/// Connection settings for the external translation backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackendConfig {
    /// Endpoint accepting `{"text", "targetLang"}` POST requests.
    pub endpoint: String,

    /// Per-request bound; an elapsed request degrades like any other
    /// backend failure.
    pub timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self { endpoint: "http://localhost:3000/api/translate".to_string(), timeout_ms: 10_000 }
    }
}

impl I18nSettings {
    /// Whether `code` is one of the configured available languages.
    #[must_use]
    pub fn is_available(&self, code: &LanguageCode) -> bool {
        self.available_languages.iter().any(|lang| &lang.code == code)
    }

    /// # Errors
    /// - Empty or duplicated available-language set
    /// - Default or base language outside the available set
    /// - Empty separator, endpoint, or zero timeout
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.available_languages.is_empty() {
            errors.push(ValidationError::new(
                "availableLanguages",
                "At least one language is required. Example: [{\"code\": \"en\", \"label\": \"English\"}]",
            ));
        }

        let mut seen = std::collections::HashSet::new();
        for (index, language) in self.available_languages.iter().enumerate() {
            if language.code.as_str().is_empty() {
                errors.push(ValidationError::new(
                    format!("availableLanguages[{index}].code"),
                    "The language code cannot be empty",
                ));
            }
            if !seen.insert(&language.code) {
                errors.push(ValidationError::new(
                    format!("availableLanguages[{index}].code"),
                    format!("Duplicate language code '{}'", language.code),
                ));
            }
        }

        if !self.available_languages.is_empty() && !self.is_available(&self.default_language) {
            errors.push(ValidationError::new(
                "defaultLanguage",
                format!(
                    "'{}' is not in availableLanguages. Add it to the list or pick an available code",
                    self.default_language
                ),
            ));
        }

        if !self.available_languages.is_empty() && !self.is_available(&self.base_language) {
            errors.push(ValidationError::new(
                "baseLanguage",
                format!(
                    "'{}' is not in availableLanguages. Add it to the list or pick an available code",
                    self.base_language
                ),
            ));
        }

        if self.key_separator.is_empty() {
            errors.push(ValidationError::new(
                "keySeparator",
                "The separator cannot be empty. Please specify a separator, for example: \".\" (dot)",
            ));
        }

        if self.backend.endpoint.is_empty() {
            errors.push(ValidationError::new(
                "backend.endpoint",
                "The endpoint cannot be empty. Example: \"https://example.com/api/translate\"",
            ));
        }

        if self.backend.timeout_ms == 0 {
            errors.push(ValidationError::new(
                "backend.timeoutMs",
                "The timeout must be greater than zero (milliseconds)",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl Default for I18nSettings {
    fn default() -> Self {
        Self {
            available_languages: vec![
                Language::new("en", "English"),
                Language::new("fr", "Français"),
                Language::new("sn", "Shona"),
                Language::new("es", "Español"),
                Language::new("de", "Deutsch"),
                Language::new("pt", "Português"),
                Language::new("zh", "中文"),
                Language::new("ko", "한국어"),
                Language::new("ja", "日本語"),
            ],
            default_language: LanguageCode::new("en"),
            base_language: LanguageCode::new("en"),
            resource_dir: PathBuf::from("locales"),
            key_separator: ".".to_string(),
            backend: BackendConfig::default(),
        }
    }
}
