//! Translation view: a catalog bound to resolved preferences
//!
//! A [`TranslationView`] answers "give me the text for key K with arguments
//! A" queries by walking the resolved preference list and falling back to
//! the default set. The catalog is shared by `Arc` and never copied.
//!
//! Two lifecycle modes are supported: [`TranslationView::with_preferences`]
//! returns a new sibling view and leaves the original untouched, while
//! [`TranslationView::change_preferences`] mutates the view in place and
//! fires its change hooks — the seam an external reactive layer wraps. The
//! core performs no dependency tracking of its own.
//!
//! A view has a single logical owner; mutating one view from several threads
//! concurrently requires external locking. Observers only read the committed
//! preference value after a change completes.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::catalog::Catalog;
use crate::error::{IntlError, Result};
use crate::message::{Message, Value};
use crate::preferences::Preferences;

/// Control names used by the view's own API surface. A default message set
/// containing any of them cannot be exposed as a key surface.
pub const RESERVED_KEYS: [&str; 4] = ["preferences", "catalog", "change_preferences", "message"];

/// Change-notification hook.
type ChangeHook = Box<dyn Fn(&Preferences) + Send + Sync>;

/// The bound object combining a [`Catalog`] and [`Preferences`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use intl_map::{Catalog, CatalogDefinition, Message, MessageSet, TranslationView, Value};
///
/// let catalog = Catalog::from_definition(
///     CatalogDefinition::new(
///         MessageSet::new("English")
///             .with("welcome", "Welcome!")
///             .with("hello", Message::template("Hello {0}")),
///     )
///     .with_alias("en")
///     .with_language(
///         "fr",
///         MessageSet::new("Français")
///             .with("welcome", "Bienvenue !")
///             .with("hello", Message::template("Bonjour {0}")),
///     ),
/// )
/// .unwrap();
///
/// let view = TranslationView::new(Arc::new(catalog), &["fr-CA"], true).unwrap();
/// assert_eq!(view.translate("hello", &[Value::from("me")]).unwrap(), "Bonjour me");
/// ```
pub struct TranslationView {
    catalog: Arc<Catalog>,
    preferences: Preferences,
    /// Key surface captured from the default set at construction.
    keys: Vec<String>,
    observers: Vec<ChangeHook>,
}

impl TranslationView {
    /// Bind a catalog and raw preferences into a view.
    ///
    /// Fails with [`IntlError::ReservedKey`] when the default set contains a
    /// key colliding with one of [`RESERVED_KEYS`]. Pass an empty slice for
    /// no preferences (every lookup then uses the default set).
    pub fn new<S: AsRef<str>>(
        catalog: Arc<Catalog>,
        raw_preferences: &[S],
        expand_generic: bool,
    ) -> Result<Self> {
        let mut keys = Vec::with_capacity(catalog.messages().len());
        for key in catalog.messages().keys() {
            if RESERVED_KEYS.contains(&key) {
                return Err(IntlError::ReservedKey {
                    key: key.to_string(),
                });
            }
            keys.push(key.to_string());
        }
        let preferences = Preferences::resolve(&catalog, raw_preferences, expand_generic);
        Ok(Self {
            catalog,
            preferences,
            keys,
            observers: Vec::new(),
        })
    }

    /// Immutable preference change: a sibling view sharing this view's
    /// catalog and key surface, with freshly resolved preferences.
    ///
    /// Change hooks are not carried over; they belong to the donor.
    #[must_use]
    pub fn with_preferences<S: AsRef<str>>(&self, raw: &[S], expand_generic: bool) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
            preferences: Preferences::resolve(&self.catalog, raw, expand_generic),
            keys: self.keys.clone(),
            observers: Vec::new(),
        }
    }

    /// Mutable preference change: recompute and overwrite the preference
    /// field in place, then fire every registered change hook with the
    /// committed value.
    pub fn change_preferences<S: AsRef<str>>(&mut self, raw: &[S], expand_generic: bool) {
        self.preferences = Preferences::resolve(&self.catalog, raw, expand_generic);
        for hook in &self.observers {
            hook(&self.preferences);
        }
    }

    /// Register a hook fired after each [`change_preferences`] commit.
    ///
    /// [`change_preferences`]: Self::change_preferences
    pub fn on_change(&mut self, hook: impl Fn(&Preferences) + Send + Sync + 'static) {
        self.observers.push(Box::new(hook));
    }

    /// The resolved preference list.
    #[must_use]
    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// The underlying shared catalog.
    #[must_use]
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// The key surface: every key of the catalog's default set.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// Resolve the message definition for a key, in the most preferred
    /// language defining it.
    ///
    /// Walks the preferences in order and falls through to the default set.
    /// Fails with [`IntlError::UndefinedMessage`] when not even the default
    /// set defines the key.
    pub fn message(&self, key: &str) -> Result<&Message> {
        for code in self.preferences.iter() {
            if let Some(message) = self.catalog.messages_for(code).get(key) {
                return Ok(message);
            }
            trace!(code, key, "preference does not define key, falling back");
        }
        self.catalog
            .messages()
            .get(key)
            .ok_or_else(|| IntlError::UndefinedMessage {
                key: key.to_string(),
            })
    }

    /// Resolve and produce the message text.
    ///
    /// A literal is returned unchanged — excess arguments are ignored. A
    /// formatter is applied to `args`. An empty string literal is a valid
    /// message, not a miss.
    pub fn translate(&self, key: &str, args: &[Value]) -> Result<String> {
        Ok(self.message(key)?.render(args))
    }

    /// Zero-argument convenience for [`translate`](Self::translate).
    pub fn t(&self, key: &str) -> Result<String> {
        self.translate(key, &[])
    }
}

impl fmt::Debug for TranslationView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationView")
            .field("preferences", &self.preferences)
            .field("keys", &self.keys)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Additions, CatalogDefinition, MessageSet};
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    fn sample_catalog() -> Arc<Catalog> {
        Arc::new(
            Catalog::from_definition(
                CatalogDefinition::new(
                    MessageSet::new("English")
                        .with("welcome", "Welcome!")
                        .with("hello", Message::template("Hello {0}")),
                )
                .with_alias("en")
                .with_language(
                    "fr",
                    MessageSet::new("Français")
                        .with("welcome", "Bienvenue !")
                        .with("hello", Message::template("Bonjour {0}")),
                )
                .with_language(
                    "fr_ca",
                    MessageSet::new("Français (Canada)")
                        .with("hello", Message::template("Allo {0}")),
                )
                .with_language(
                    "eo",
                    MessageSet::new("Esperanto")
                        .with("welcome", "Bonvenon!")
                        .with("hello", Message::template("Saluton {0}")),
                ),
            )
            .expect("valid definition"),
        )
    }

    fn view(raw: &[&str], expand: bool) -> TranslationView {
        TranslationView::new(sample_catalog(), raw, expand).expect("view builds")
    }

    #[test]
    fn default_string_without_preferences() {
        let v = view(&[], true);
        assert_eq!(
            v.translate("hello", &[Value::from("me")]).unwrap(),
            "Hello me"
        );
    }

    #[test]
    fn preferred_language_wins() {
        let v = view(&["fr-CA"], true);
        assert_eq!(
            v.translate("hello", &[Value::from("me")]).unwrap(),
            "Allo me"
        );
    }

    #[test]
    fn falls_back_to_generic_language() {
        let v = view(&["fr-CA"], true);
        assert_eq!(v.t("welcome").unwrap(), "Bienvenue !");
    }

    #[test]
    fn no_generic_fallback_when_disabled() {
        let v = view(&["fr-CA"], false);
        assert_eq!(v.t("welcome").unwrap(), "Welcome!");
    }

    #[test]
    fn multiple_preferences_resolve_in_order() {
        let v = view(&["fr_CA", "eo", "fr"], false);
        assert_eq!(v.t("welcome").unwrap(), "Bonvenon!");
        assert_eq!(
            v.translate("hello", &[Value::from("me")]).unwrap(),
            "Allo me"
        );
    }

    #[test]
    fn unknown_preferences_are_forgotten() {
        let v = view(&["eo", "dummy", "fr"], true);
        assert_eq!(
            v.preferences().codes(),
            &["eo".to_string(), "fr".to_string()]
        );
    }

    #[test]
    fn reserved_keys_fail_construction() {
        for reserved in RESERVED_KEYS {
            let catalog = Arc::new(Catalog::new(
                MessageSet::new("Reserved").with(reserved, "forbidden"),
            ));
            let result = TranslationView::new(catalog, &[] as &[&str], true);
            assert_eq!(
                result.err().map(|e| e.to_string()),
                Some(format!(
                    "reserved key '{reserved}' is not permitted in a message set"
                ))
            );
        }
    }

    #[test]
    fn undefined_message_is_an_error() {
        let v = view(&["fr"], true);
        assert_eq!(
            v.t("missing").err(),
            Some(IntlError::UndefinedMessage {
                key: "missing".to_string()
            })
        );
    }

    #[test]
    fn empty_string_literal_is_valid() {
        let catalog = Arc::new(Catalog::new(MessageSet::new("Empty").with("value", "")));
        let v = TranslationView::new(catalog, &[] as &[&str], true).unwrap();
        assert_eq!(v.t("value").unwrap(), "");
    }

    #[test]
    fn key_surface_enumerates_default_set() {
        let v = view(&[], true);
        let keys: Vec<&str> = v.keys().collect();
        assert_eq!(keys, vec!["$", "welcome", "hello"]);
    }

    #[test]
    fn sibling_view_is_distinct_with_equal_content() {
        let v = view(&[], true);
        let sibling = v.with_preferences(&["fr"], true);
        assert_eq!(v.t("welcome").unwrap(), "Welcome!");
        assert_eq!(sibling.t("welcome").unwrap(), "Bienvenue !");
        assert!(v.preferences().is_empty());

        let twin = v.with_preferences(&[] as &[&str], true);
        assert_eq!(twin.preferences(), v.preferences());
    }

    #[test]
    fn change_preferences_mutates_in_place_and_notifies() {
        let observed: Arc<Mutex<Vec<Vec<String>>>> = Arc::new(Mutex::new(Vec::new()));
        let mut v = view(&[], true);
        let sink = Arc::clone(&observed);
        v.on_change(move |prefs| {
            sink.lock().expect("sink lock").push(prefs.codes().to_vec());
        });

        assert_eq!(v.t("welcome").unwrap(), "Welcome!");
        v.change_preferences(&["fr"], true);
        assert_eq!(v.t("welcome").unwrap(), "Bienvenue !");
        v.change_preferences(&[] as &[&str], true);
        assert_eq!(v.t("welcome").unwrap(), "Welcome!");

        let seen = observed.lock().expect("sink lock");
        assert_eq!(*seen, vec![vec!["fr".to_string()], vec![]]);
    }

    #[test]
    fn merged_catalog_reaches_new_keys_through_view() {
        let merged = sample_catalog()
            .merge(Additions::new().language(
                "fr",
                MessageSet::partial().with("bye", "Au revoir"),
            ))
            .expect("merge succeeds");
        let v = TranslationView::new(Arc::new(merged), &["fr"], true).expect("view builds");
        assert_eq!(v.t("bye").unwrap(), "Au revoir");
    }
}
