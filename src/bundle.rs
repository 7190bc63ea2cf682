//! Static resource bundle: per-language key→string dictionaries loaded once
//! at application start and immutable afterwards.

use std::collections::HashMap;
use std::path::{
    Path,
    PathBuf,
};

use serde_json::Value;
use thiserror::Error;

use crate::types::{
    Language,
    LanguageCode,
};

/// A missing or malformed resource file is a configuration error and fatal
/// at startup, never recovered from at runtime.
#[derive(Error, Debug)]
pub enum BundleError {
    #[error("Missing resource file for language '{language}': {path:?}")]
    MissingResource { language: LanguageCode, path: PathBuf },

    #[error("Failed to read resource file for language '{language}': {source}")]
    IoError {
        language: LanguageCode,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse resource file for language '{language}': {source}")]
    ParseError {
        language: LanguageCode,
        #[source]
        source: serde_json::Error,
    },
}

/// Immutable per-language translation dictionaries.
#[derive(Debug, Clone)]
pub struct ResourceBundle {
    /// Flattened key → string dictionary per language.
    dictionaries: HashMap<LanguageCode, HashMap<String, String>>,

    /// Fallback language for missing keys.
    default_language: LanguageCode,
}

impl ResourceBundle {
    /// Loads `<dir>/<code>.json` for every configured language.
    ///
    /// Nested resource files are flattened with `separator`
    /// (`{"footer": {"learn": ...}}` → `footer.learn`).
    ///
    /// # Errors
    /// Fails fast on the first missing or malformed resource file.
    pub fn load(
        dir: &Path,
        languages: &[Language],
        default_language: LanguageCode,
        separator: &str,
    ) -> Result<Self, BundleError> {
        let mut dictionaries = HashMap::new();

        for language in languages {
            let path = dir.join(format!("{}.json", language.code));
            if !path.exists() {
                return Err(BundleError::MissingResource {
                    language: language.code.clone(),
                    path,
                });
            }

            let content = std::fs::read_to_string(&path).map_err(|source| {
                BundleError::IoError { language: language.code.clone(), source }
            })?;
            let json: Value = serde_json::from_str(&content).map_err(|source| {
                BundleError::ParseError { language: language.code.clone(), source }
            })?;

            let keys = flatten_json(&json, separator, None);
            tracing::debug!("Loaded {} resource keys for '{}'", keys.len(), language.code);
            dictionaries.insert(language.code.clone(), keys);
        }

        Ok(Self { dictionaries, default_language })
    }

    /// Builds a bundle from already-flattened dictionaries.
    #[must_use]
    pub fn from_dictionaries(
        dictionaries: HashMap<LanguageCode, HashMap<String, String>>,
        default_language: LanguageCode,
    ) -> Self {
        Self { dictionaries, default_language }
    }

    /// Exact dictionary lookup, no fallback.
    #[must_use]
    pub fn lookup(&self, language: &LanguageCode, key: &str) -> Option<&str> {
        self.dictionaries.get(language)?.get(key).map(String::as_str)
    }

    /// Dictionary lookup with the fallback chain: requested language,
    /// then the default language, then the key itself.
    #[must_use]
    pub fn text(&self, language: &LanguageCode, key: &str) -> String {
        self.lookup(language, key)
            .or_else(|| self.lookup(&self.default_language, key))
            .map_or_else(|| key.to_string(), ToString::to_string)
    }

    /// Languages with a loaded dictionary.
    #[must_use]
    pub fn languages(&self) -> Vec<&LanguageCode> {
        self.dictionaries.keys().collect()
    }

    #[must_use]
    pub const fn default_language(&self) -> &LanguageCode {
        &self.default_language
    }
}

/// Flatten nested JSON object into separator-joined key map.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use langzone_i18n::bundle::flatten_json;
///
/// let json = json!({
///     "footer": {
///         "learn": "Learn",
///         "courses": "Courses"
///     }
/// });
///
/// let flattened = flatten_json(&json, ".", None);
/// assert_eq!(flattened.get("footer.learn"), Some(&"Learn".to_string()));
/// assert_eq!(flattened.get("footer.courses"), Some(&"Courses".to_string()));
/// ```
#[must_use]
pub fn flatten_json(
    json: &Value,
    separator: &str,
    prefix: Option<&str>,
) -> HashMap<String, String> {
    let mut result = HashMap::new();
    flatten_json_value(json, separator, prefix, &mut result);
    result
}

/// Recursive worker behind [`flatten_json`].
fn flatten_json_value(
    json: &Value,
    separator: &str,
    prefix: Option<&str>,
    result: &mut HashMap<String, String>,
) {
    match json {
        Value::Object(map) => {
            for (key, value) in map {
                let full_key =
                    prefix.map_or_else(|| key.clone(), |p| format!("{p}{separator}{key}"));
                flatten_json_value(value, separator, Some(&full_key), result);
            }
        }
        Value::Array(arr) => {
            for (index, value) in arr.iter().enumerate() {
                let full_key =
                    prefix.map_or_else(|| format!("[{index}]"), |p| format!("{p}[{index}]"));
                flatten_json_value(value, separator, Some(&full_key), result);
            }
        }
        Value::String(s) => {
            if let Some(key) = prefix {
                result.insert(key.to_string(), s.clone());
            }
        }
        _ => {
            if let Some(key) = prefix {
                result.insert(key.to_string(), json.to_string());
            }
        }
    }
}
