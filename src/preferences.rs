//! Preference normalization and resolution
//!
//! Turns raw caller-supplied language tags (free-form strings or a single
//! `,`-delimited header value) into an ordered, deduplicated list of
//! catalog-recognized codes. Unknown codes and duplicates are expected
//! steady-state input — a client advertising an unsupported locale is not an
//! error — so they are silently dropped, never raised.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use crate::catalog::Catalog;

/// Runs of non-alphanumeric characters separate locale-tag segments.
static TAG_SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9]+").expect("separator pattern is valid"));

/// Split a single delimited preference string into raw tags.
///
/// Tags are comma-separated; each tag's trailing `;`-delimited suffix (e.g.
/// a quality parameter) is discarded. Empty tags are dropped.
///
/// # Examples
///
/// ```
/// use intl_map::preferences::split_raw_header;
///
/// assert_eq!(
///     split_raw_header("fr-CA, en;q=0.8, "),
///     vec!["fr-CA".to_string(), "en".to_string()]
/// );
/// ```
#[must_use]
pub fn split_raw_header(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|tag| tag.split(';').next().unwrap_or("").trim())
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalize raw locale tags into candidate catalog codes.
///
/// Each tag is split on separator runs, then emitted as progressively
/// shorter `_`-joined, lower-cased prefixes — `"fr-CA"` becomes `["fr_ca",
/// "fr"]`. With `expand_generic` false only the full join is produced.
/// Duplicates are preserved at this stage; resolution deduplicates.
#[must_use]
pub fn normalize<S: AsRef<str>>(raw: &[S], expand_generic: bool) -> Vec<String> {
    let mut candidates = Vec::new();
    for tag in raw {
        let mut segments: Vec<&str> = TAG_SEPARATORS
            .split(tag.as_ref())
            .filter(|s| !s.is_empty())
            .collect();
        while !segments.is_empty() {
            candidates.push(segments.join("_").to_lowercase());
            segments.pop();
            if !expand_generic {
                break;
            }
        }
    }
    candidates
}

/// The caller's resolved, deduplicated, catalog-validated ordered
/// language-code list. Immutable value object.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Preferences {
    codes: Vec<String>,
}

impl Preferences {
    /// Resolve raw tags against a catalog: normalize, filter to known codes,
    /// keep first-seen order, drop duplicates.
    ///
    /// # Examples
    ///
    /// ```
    /// use intl_map::{Catalog, CatalogDefinition, MessageSet, Preferences};
    ///
    /// let catalog = Catalog::from_definition(
    ///     CatalogDefinition::new(MessageSet::new("English"))
    ///         .with_language("fr", MessageSet::new("Français"))
    ///         .with_language("eo", MessageSet::new("Esperanto")),
    /// )
    /// .unwrap();
    ///
    /// let prefs = Preferences::resolve(&catalog, &["eo", "dummy", "fr"], true);
    /// assert_eq!(prefs.codes(), &["eo".to_string(), "fr".to_string()]);
    /// ```
    #[must_use]
    pub fn resolve<S: AsRef<str>>(catalog: &Catalog, raw: &[S], expand_generic: bool) -> Self {
        let mut codes: Vec<String> = Vec::new();
        for candidate in normalize(raw, expand_generic) {
            if catalog.contains(&candidate) && !codes.contains(&candidate) {
                codes.push(candidate);
            } else {
                trace!(code = %candidate, "dropping unknown or duplicate preference");
            }
        }
        Self { codes }
    }

    /// The resolved codes, most preferred first.
    #[must_use]
    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    /// Iterate over codes, most preferred first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogDefinition, MessageSet};
    use pretty_assertions::assert_eq;

    fn catalog() -> Catalog {
        Catalog::from_definition(
            CatalogDefinition::new(MessageSet::new("English"))
                .with_alias("en")
                .with_language("fr", MessageSet::new("Français"))
                .with_language("fr_ca", MessageSet::new("Français (Canada)"))
                .with_language("eo", MessageSet::new("Esperanto")),
        )
        .expect("valid definition")
    }

    #[test]
    fn normalize_expands_generics() {
        assert_eq!(normalize(&["fr-CA"], true), vec!["fr_ca", "fr"]);
    }

    #[test]
    fn normalize_without_expansion() {
        assert_eq!(normalize(&["fr-CA"], false), vec!["fr_ca"]);
    }

    #[test]
    fn normalize_lowercases_and_joins_with_underscore() {
        assert_eq!(
            normalize(&["zh-Hans-CN"], true),
            vec!["zh_hans_cn", "zh_hans", "zh"]
        );
    }

    #[test]
    fn normalize_collapses_separator_runs() {
        assert_eq!(normalize(&["fr--CA"], false), vec!["fr_ca"]);
    }

    #[test]
    fn normalize_keeps_duplicates() {
        assert_eq!(
            normalize(&["fr", "fr-CA"], true),
            vec!["fr", "fr_ca", "fr"]
        );
    }

    #[test]
    fn split_header_discards_quality_suffixes() {
        assert_eq!(
            split_raw_header("fr-CA,fr;q=0.9,en;q=0.8"),
            vec!["fr-CA", "fr", "en"]
        );
    }

    #[test]
    fn split_header_drops_empty_tags() {
        assert_eq!(split_raw_header(" , en , "), vec!["en"]);
        assert!(split_raw_header("").is_empty());
    }

    #[test]
    fn resolve_drops_unknown_codes_preserving_order() {
        let prefs = Preferences::resolve(&catalog(), &["eo", "dummy", "fr"], true);
        assert_eq!(prefs.codes(), &["eo".to_string(), "fr".to_string()]);
    }

    #[test]
    fn resolve_deduplicates_expansion_overlap() {
        let prefs = Preferences::resolve(&catalog(), &["fr-CA", "fr"], true);
        assert_eq!(prefs.codes(), &["fr_ca".to_string(), "fr".to_string()]);
    }

    #[test]
    fn resolve_empty_input() {
        let prefs = Preferences::resolve(&catalog(), &[] as &[&str], true);
        assert!(prefs.is_empty());
    }
}
