//! Localized text values and language fallback resolution.
//!
//! # Responsibility
//! - Hold per-language values of one content field as a sparse map.
//! - Resolve the value shown for a requested language.
//!
//! # Invariants
//! - Resolution never fails and always returns an owned string.
//! - Fallback order is deterministic for a given input: requested language,
//!   then `DEFAULT_LANGUAGE`, then the first non-empty value in canonical
//!   language order, then `""`.
//! - Empty strings are treated as absent values.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

/// Language every localized field must carry at creation time.
pub const DEFAULT_LANGUAGE: &str = "tr";

/// Languages the site ships with, in canonical fallback order.
///
/// Codes outside this list are still accepted and sort after these,
/// lexicographically.
pub const KNOWN_LANGUAGES: &[&str] = &["tr", "en", "fr", "ar", "ru", "de"];

static LANGUAGE_CODE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z]{2,3}(-[A-Za-z0-9]{2,8})?$").expect("valid language code regex")
});

/// Returns whether `code` is an acceptable language key.
pub fn is_valid_language_code(code: &str) -> bool {
    LANGUAGE_CODE_RE.is_match(code)
}

fn is_known_language(code: &str) -> bool {
    KNOWN_LANGUAGES.iter().any(|known| *known == code)
}

/// Sparse language -> text map for one content field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<String, String>);

impl LocalizedText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a value from `(language, text)` pairs. Later pairs win.
    pub fn from_pairs<I, L, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (L, T)>,
        L: Into<String>,
        T: Into<String>,
    {
        let mut text = Self::new();
        for (language, value) in pairs {
            text.set(language, value);
        }
        text
    }

    /// Sets one language value, replacing any previous value.
    pub fn set(&mut self, language: impl Into<String>, value: impl Into<String>) {
        self.0.insert(language.into(), value.into());
    }

    /// Returns the raw value for one language, empty or not.
    pub fn get(&self, language: &str) -> Option<&str> {
        self.0.get(language).map(String::as_str)
    }

    /// Returns the value for `language` only when it is non-empty.
    pub fn non_empty(&self, language: &str) -> Option<&str> {
        self.get(language).filter(|value| !value.trim().is_empty())
    }

    /// Returns whether the default-language value is present and non-empty.
    pub fn has_default(&self) -> bool {
        self.non_empty(DEFAULT_LANGUAGE).is_some()
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Resolves the text shown for `language`.
    pub fn resolve(&self, language: &str) -> String {
        resolve(self, language)
    }

    /// Iterates non-empty values in canonical fallback order.
    fn canonical_values(&self) -> impl Iterator<Item = &str> {
        let known = KNOWN_LANGUAGES
            .iter()
            .filter_map(move |language| self.non_empty(language));
        let others = self
            .0
            .iter()
            .filter(|(language, _)| !is_known_language(language))
            .map(|(_, value)| value.as_str())
            .filter(|value| !value.trim().is_empty());
        known.chain(others)
    }
}

/// Resolves a localized value for the requested language.
///
/// Order: requested -> `tr` -> first non-empty in canonical order -> `""`.
pub fn resolve(text: &LocalizedText, language: &str) -> String {
    text.non_empty(language)
        .or_else(|| text.non_empty(DEFAULT_LANGUAGE))
        .or_else(|| text.canonical_values().next())
        .unwrap_or_default()
        .to_string()
}
