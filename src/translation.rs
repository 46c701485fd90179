//! Message translation used for generic, user-facing error messages.

use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

use crate::errors::{CatalogError, TranslationError};

/// Key of the generic message returned for masked server errors
pub const INTERNAL_SERVER_ERROR: &str = "Internal server error";

/// Key of the message returned for a validation failure without violations
pub const VALIDATION_FAILED: &str = "Validation failed";

/// Translates message keys; shared read-only across requests
pub trait Translator: Send + Sync {
    fn trans(&self, key: &str, locale: &str) -> Result<String, TranslationError>;
}

/// In-memory catalog: locale -> key -> message
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    messages: HashMap<String, HashMap<String, String>>,
    fallback_locale: String,
    strict: bool,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::builtin("en")
    }
}

impl MessageCatalog {
    /// Empty catalog that answers every key with the key itself
    pub fn empty(fallback_locale: impl Into<String>) -> Self {
        Self {
            messages: HashMap::new(),
            fallback_locale: fallback_locale.into(),
            strict: false,
        }
    }

    /// Catalog with the messages this crate emits on its own
    pub fn builtin(fallback_locale: impl Into<String>) -> Self {
        let mut catalog = Self::empty(fallback_locale);
        for (locale, key, message) in [
            ("en", INTERNAL_SERVER_ERROR, "Internal server error"),
            ("en", VALIDATION_FAILED, "Validation failed"),
            ("fr", INTERNAL_SERVER_ERROR, "Erreur interne du serveur"),
            ("fr", VALIDATION_FAILED, "La validation a échoué"),
            ("de", INTERNAL_SERVER_ERROR, "Interner Serverfehler"),
            ("de", VALIDATION_FAILED, "Validierung fehlgeschlagen"),
        ] {
            catalog.insert(locale, key, message);
        }
        catalog
    }

    /// Missing keys become errors instead of echoing the key
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn insert(
        &mut self,
        locale: impl Into<String>,
        key: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.messages
            .entry(locale.into())
            .or_default()
            .insert(key.into(), message.into());
    }

    /// Merge a JSON catalog (`{"fr": {"key": "message"}}`) over the current entries
    pub fn merge_json(&mut self, json: &str, source: &str) -> Result<usize, CatalogError> {
        let parsed: HashMap<String, HashMap<String, String>> =
            serde_json::from_str(json).map_err(|e| CatalogError::Parse {
                path: source.to_string(),
                source: e,
            })?;

        let mut count = 0;
        for (locale, entries) in parsed {
            for (key, message) in entries {
                self.insert(locale.clone(), key, message);
                count += 1;
            }
        }
        Ok(count)
    }

    /// Load a JSON catalog file over the built-in messages
    pub fn load(
        path: impl AsRef<Path>,
        fallback_locale: impl Into<String>,
    ) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let path_str = path.display().to_string();
        let json = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path_str.clone(),
            source: e,
        })?;

        let mut catalog = Self::builtin(fallback_locale);
        let count = catalog.merge_json(&json, &path_str)?;
        info!(path = %path_str, entries = count, "Translation catalog loaded");
        Ok(catalog)
    }

    /// Exact locale, then its primary subtag (`fr-CA` -> `fr`), then the fallback
    fn lookup(&self, key: &str, locale: &str) -> Option<&String> {
        let primary = locale.split(['-', '_']).next().unwrap_or(locale);
        [locale, primary, self.fallback_locale.as_str()]
            .into_iter()
            .find_map(|candidate| self.messages.get(candidate).and_then(|m| m.get(key)))
    }
}

impl Translator for MessageCatalog {
    fn trans(&self, key: &str, locale: &str) -> Result<String, TranslationError> {
        match self.lookup(key, locale) {
            Some(message) => Ok(message.clone()),
            None if self.strict => Err(TranslationError::MissingKey {
                key: key.to_string(),
                locale: locale.to_string(),
            }),
            None => {
                debug!(key = key, locale = locale, "No translation, using key");
                Ok(key.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_translations() {
        let catalog = MessageCatalog::builtin("en");
        assert_eq!(
            catalog.trans(INTERNAL_SERVER_ERROR, "en").unwrap(),
            "Internal server error"
        );
        assert_eq!(
            catalog.trans(INTERNAL_SERVER_ERROR, "fr").unwrap(),
            "Erreur interne du serveur"
        );
    }

    #[test]
    fn test_region_falls_back_to_primary_language() {
        let catalog = MessageCatalog::builtin("en");
        assert_eq!(
            catalog.trans(INTERNAL_SERVER_ERROR, "de-AT").unwrap(),
            "Interner Serverfehler"
        );
        assert_eq!(
            catalog.trans(INTERNAL_SERVER_ERROR, "fr_CA").unwrap(),
            "Erreur interne du serveur"
        );
    }

    #[test]
    fn test_unknown_locale_uses_fallback() {
        let catalog = MessageCatalog::builtin("en");
        assert_eq!(
            catalog.trans(INTERNAL_SERVER_ERROR, "ja").unwrap(),
            "Internal server error"
        );
    }

    #[test]
    fn test_missing_key_lenient_echoes_key() {
        let catalog = MessageCatalog::empty("en");
        assert_eq!(catalog.trans("Some key", "en").unwrap(), "Some key");
    }

    #[test]
    fn test_missing_key_strict_fails() {
        let catalog = MessageCatalog::empty("en").strict(true);
        let err = catalog.trans("Some key", "fr").unwrap_err();
        assert!(err.to_string().contains("Some key"));
        assert!(err.to_string().contains("fr"));
    }

    #[test]
    fn test_merge_json_overrides_builtin() {
        let mut catalog = MessageCatalog::builtin("en");
        let count = catalog
            .merge_json(
                r#"{"en": {"Internal server error": "Something went wrong"}, "es": {"Internal server error": "Error interno del servidor"}}"#,
                "inline",
            )
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(
            catalog.trans(INTERNAL_SERVER_ERROR, "en").unwrap(),
            "Something went wrong"
        );
        assert_eq!(
            catalog.trans(INTERNAL_SERVER_ERROR, "es").unwrap(),
            "Error interno del servidor"
        );
    }

    #[test]
    fn test_merge_json_rejects_garbage() {
        let mut catalog = MessageCatalog::empty("en");
        let err = catalog.merge_json("not json", "inline").unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = MessageCatalog::load("/nonexistent/catalog.json", "en").unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
