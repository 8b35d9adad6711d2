//! Message catalog: one message set per language plus a default designation
//!
//! A [`Catalog`] is immutable. Every change goes through [`Catalog::merge`],
//! which builds a brand-new catalog and leaves the receiver untouched, so a
//! catalog can be shared by reference across any number of concurrently
//! reading views. Serialization output is memoized per language code; the
//! cache is write-once and recomputation is idempotent, so no locking beyond
//! [`OnceLock`] is needed.
//!
//! The code `"default"` is the internal name of the unnamed default set and
//! can never be a real language code.

use std::collections::HashMap;
use std::sync::OnceLock;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::error::{IntlError, Result};
use crate::message::{quote, Message};

/// Reserved internal code for the unnamed default message set.
pub const DEFAULT_SLOT: &str = "default";

/// Reserved key holding a language's human-readable display name.
pub const NAME_KEY: &str = "$";

// ============================================================================
// Message Set
// ============================================================================

/// All message definitions for one language, keyed by message name.
///
/// The `$` key holds the language display name and, when present, must be a
/// literal — validated whenever a set is committed into a catalog. "Partial"
/// sets omit keys present in other languages.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MessageSet {
    entries: IndexMap<String, Message>,
}

impl MessageSet {
    /// Create a set seeded with its `$` display name.
    ///
    /// # Examples
    ///
    /// ```
    /// use intl_map::MessageSet;
    ///
    /// let en = MessageSet::new("English").with("welcome", "Welcome!");
    /// assert_eq!(en.display_name(), Some("English"));
    /// ```
    pub fn new(display_name: impl Into<String>) -> Self {
        let mut set = Self::default();
        set.insert(NAME_KEY, Message::literal(display_name));
        set
    }

    /// Create a partial set with no display name, for merging new keys into
    /// an already-known language.
    #[must_use]
    pub fn partial() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, message: impl Into<Message>) -> Self {
        self.insert(key, message);
        self
    }

    /// Insert a message, replacing any previous entry for the key.
    pub fn insert(&mut self, key: impl Into<String>, message: impl Into<Message>) {
        self.entries.insert(key.into(), message.into());
    }

    /// Look up a message by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Message> {
        self.entries.get(key)
    }

    /// Whether the set defines the given key.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// The `$` display name, if present as a literal.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        match self.entries.get(NAME_KEY) {
            Some(Message::Literal(name)) => Some(name),
            _ => None,
        }
    }

    /// Iterate over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Message)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Enforce the `$`-is-a-literal invariant.
    fn validate(&self) -> Result<()> {
        match self.entries.get(NAME_KEY) {
            Some(Message::Formatter(_)) => Err(IntlError::ReservedKey {
                key: NAME_KEY.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

impl FromIterator<(String, Message)> for MessageSet {
    fn from_iter<I: IntoIterator<Item = (String, Message)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

// ============================================================================
// Catalog definition
// ============================================================================

/// One language's slot in a definition: its own messages, or a marker that
/// the code is an alias for the default set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageDefinition {
    Messages(MessageSet),
    AliasOfDefault,
}

/// A full multi-language catalog definition: the unnamed default set plus a
/// mapping from language code to [`LanguageDefinition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogDefinition {
    default: MessageSet,
    languages: IndexMap<String, LanguageDefinition>,
}

impl CatalogDefinition {
    /// Start a definition from its default message set.
    pub fn new(default: MessageSet) -> Self {
        Self {
            default,
            languages: IndexMap::new(),
        }
    }

    /// Add a language's message set. The code `"default"` addresses the
    /// default slot instead of naming a language.
    #[must_use]
    pub fn with_language(mut self, code: impl Into<String>, set: MessageSet) -> Self {
        let code = code.into();
        if code == DEFAULT_SLOT {
            self.default = set;
        } else {
            self.languages.insert(code, LanguageDefinition::Messages(set));
        }
        self
    }

    /// Mark a code as an alias for the default language.
    ///
    /// The reserved code `"default"` already names the default slot and is
    /// ignored here.
    #[must_use]
    pub fn with_alias(mut self, code: impl Into<String>) -> Self {
        let code = code.into();
        if code != DEFAULT_SLOT {
            self.languages
                .insert(code, LanguageDefinition::AliasOfDefault);
        }
        self
    }

    /// The default message set.
    #[must_use]
    pub fn default_messages(&self) -> &MessageSet {
        &self.default
    }

    /// The per-language definitions in insertion order.
    #[must_use]
    pub fn languages(&self) -> &IndexMap<String, LanguageDefinition> {
        &self.languages
    }
}

/// Incremental additions for [`Catalog::merge`]: optional default-slot
/// messages, partial per-language sets, and optional alias-of-default
/// markers. Insertion order is preserved and meaningful.
#[derive(Debug, Clone, Default)]
pub struct Additions {
    default: Option<MessageSet>,
    languages: IndexMap<String, LanguageDefinition>,
}

impl Additions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add messages to the default slot directly.
    #[must_use]
    pub fn default_messages(mut self, set: MessageSet) -> Self {
        self.default = Some(set);
        self
    }

    /// Add a (possibly partial) message set for a language. The code
    /// `"default"` addresses the default slot.
    #[must_use]
    pub fn language(mut self, code: impl Into<String>, set: MessageSet) -> Self {
        let code = code.into();
        if code == DEFAULT_SLOT {
            self.default = Some(set);
        } else {
            self.languages.insert(code, LanguageDefinition::Messages(set));
        }
        self
    }

    /// Mark a code as an alias for the default language.
    ///
    /// The reserved code `"default"` already names the default slot and is
    /// ignored here.
    #[must_use]
    pub fn alias_of_default(mut self, code: impl Into<String>) -> Self {
        let code = code.into();
        if code != DEFAULT_SLOT {
            self.languages
                .insert(code, LanguageDefinition::AliasOfDefault);
        }
        self
    }
}

impl From<CatalogDefinition> for Additions {
    fn from(def: CatalogDefinition) -> Self {
        Self {
            default: Some(def.default),
            languages: def.languages,
        }
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// The full collection of message sets across languages plus a
/// default-language designation.
///
/// # Examples
///
/// ```
/// use intl_map::{Additions, Catalog, MessageSet};
///
/// let en = MessageSet::new("English")
///     .with("welcome", "Welcome!");
/// let catalog = Catalog::with_default_code(en, "en")
///     .merge(
///         Additions::new()
///             .language("fr", MessageSet::new("Français").with("welcome", "Bienvenue !")),
///     )
///     .unwrap();
///
/// assert_eq!(catalog.availables(), vec!["en", "fr"]);
/// assert_eq!(catalog.default_code(), Some("en"));
/// ```
#[derive(Debug, Clone)]
pub struct Catalog {
    default: MessageSet,
    languages: IndexMap<String, LanguageDefinition>,
    /// Per-code serialized fragments, keyed by language code (plus the
    /// `"default"` slot). Write-once; the catalog is append-only w.r.t. this
    /// cache and entries are never invalidated.
    fragments: HashMap<String, OnceLock<String>>,
}

impl Catalog {
    /// Wrap a bare message set as the default language. Always succeeds.
    pub fn new(default: MessageSet) -> Self {
        Self::assemble(default, IndexMap::new())
    }

    /// Wrap a bare message set as the default language, also reachable under
    /// the given code. Always succeeds.
    ///
    /// The reserved code `"default"` is ignored, leaving the catalog without
    /// an external default code.
    pub fn with_default_code(default: MessageSet, code: impl Into<String>) -> Self {
        let code = code.into();
        let mut languages = IndexMap::new();
        if code != DEFAULT_SLOT {
            languages.insert(code, LanguageDefinition::AliasOfDefault);
        }
        Self::assemble(default, languages)
    }

    /// Build a catalog from a full multi-language definition.
    ///
    /// Fails with [`IntlError::MultipleDefaults`] when more than one code is
    /// marked alias-of-default, and with [`IntlError::ReservedKey`] when any
    /// set binds `$` to a non-literal.
    pub fn from_definition(definition: CatalogDefinition) -> Result<Self> {
        definition.default.validate()?;
        let mut alias: Option<&str> = None;
        for (code, def) in &definition.languages {
            match def {
                LanguageDefinition::AliasOfDefault => {
                    if let Some(existing) = alias {
                        return Err(IntlError::MultipleDefaults {
                            existing: existing.to_string(),
                            conflicting: code.clone(),
                        });
                    }
                    alias = Some(code);
                }
                LanguageDefinition::Messages(set) => set.validate()?,
            }
        }
        Ok(Self::assemble(definition.default, definition.languages))
    }

    fn assemble(default: MessageSet, languages: IndexMap<String, LanguageDefinition>) -> Self {
        let mut fragments = HashMap::with_capacity(languages.len() + 1);
        fragments.insert(DEFAULT_SLOT.to_string(), OnceLock::new());
        for (code, def) in &languages {
            if matches!(def, LanguageDefinition::Messages(_)) {
                fragments.insert(code.clone(), OnceLock::new());
            }
        }
        debug!(languages = languages.len(), "catalog assembled");
        Self {
            default,
            languages,
            fragments,
        }
    }

    /// Whether the catalog knows the given language code.
    ///
    /// Always false for the reserved `"default"` code.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        code != DEFAULT_SLOT && self.languages.contains_key(code)
    }

    /// All known language codes in insertion order, default slot excluded.
    #[must_use]
    pub fn availables(&self) -> Vec<&str> {
        self.languages.keys().map(String::as_str).collect()
    }

    /// The default message set.
    #[must_use]
    pub fn messages(&self) -> &MessageSet {
        &self.default
    }

    /// The message set for a language, or the default set when the code is
    /// unknown or aliases the default.
    #[must_use]
    pub fn messages_for(&self, code: &str) -> &MessageSet {
        match self.languages.get(code) {
            Some(LanguageDefinition::Messages(set)) if code != DEFAULT_SLOT => set,
            _ => &self.default,
        }
    }

    /// The external code aliasing the default language, if any.
    #[must_use]
    pub fn default_code(&self) -> Option<&str> {
        self.languages
            .iter()
            .find(|(_, def)| matches!(def, LanguageDefinition::AliasOfDefault))
            .map(|(code, _)| code.as_str())
    }

    // ------------------------------------------------------------------
    // Merge
    // ------------------------------------------------------------------

    /// Merge additional messages or languages, producing a new catalog.
    ///
    /// Processing precedence is fixed: default slot first, then the
    /// alias-of-default code, then the remaining codes in insertion order.
    /// Additions addressed to the alias code apply to the default set. An
    /// alias marker may be adopted only while the receiver has none and the
    /// code does not already carry its own messages. A not-yet-known
    /// language must bring its `$` display name. Every key
    /// newly added to a non-default language is back-filled into the default
    /// set unless the default set already defines it, keeping the default
    /// set the structural superset of all known keys.
    ///
    /// All-or-nothing: on error the receiver is unaffected.
    pub fn merge(&self, additions: Additions) -> Result<Catalog> {
        let mut default = self.default.clone();
        let mut languages = self.languages.clone();

        // Default slot first, so explicit default values win over back-fill.
        if let Some(set) = &additions.default {
            set.validate()?;
            for (key, message) in set.iter() {
                default.insert(key, message.clone());
            }
        }

        // Alias markers next; adopting one is only legal while none exists.
        let mut alias = self.default_code().map(str::to_string);
        for (code, def) in &additions.languages {
            if !matches!(def, LanguageDefinition::AliasOfDefault) {
                continue;
            }
            match &alias {
                Some(existing) if existing != code => {
                    return Err(IntlError::MultipleDefaults {
                        existing: existing.clone(),
                        conflicting: code.clone(),
                    });
                }
                Some(_) => {}
                None => {
                    // A code that already carries its own messages is a real
                    // language; designating it would discard them.
                    if matches!(
                        languages.get(code.as_str()),
                        Some(LanguageDefinition::Messages(_))
                    ) {
                        return Err(IntlError::AliasShadowsLanguage { code: code.clone() });
                    }
                    languages.insert(code.clone(), LanguageDefinition::AliasOfDefault);
                    alias = Some(code.clone());
                }
            }
        }

        // Sets addressed to the alias code merge straight into the default.
        let alias_addressed = |code: &str| alias.as_deref() == Some(code);
        for (code, def) in &additions.languages {
            let LanguageDefinition::Messages(set) = def else {
                continue;
            };
            if !alias_addressed(code) {
                continue;
            }
            set.validate()?;
            for (key, message) in set.iter() {
                default.insert(key, message.clone());
            }
        }

        // Remaining languages in insertion order.
        for (code, def) in &additions.languages {
            let LanguageDefinition::Messages(set) = def else {
                continue;
            };
            if alias_addressed(code) {
                continue;
            }
            set.validate()?;
            let known = matches!(
                languages.get(code.as_str()),
                Some(LanguageDefinition::Messages(_))
            );
            if !known && set.display_name().is_none() {
                return Err(IntlError::MissingLanguageName { code: code.clone() });
            }
            let target = match languages
                .entry(code.clone())
                .or_insert_with(|| LanguageDefinition::Messages(MessageSet::partial()))
            {
                LanguageDefinition::Messages(target) => target,
                // Unreachable: alias-addressed codes were consumed above and
                // no new alias can shadow a message set.
                LanguageDefinition::AliasOfDefault => continue,
            };
            for (key, message) in set.iter() {
                target.insert(key, message.clone());
            }
            for (key, message) in set.iter() {
                if key != NAME_KEY && !default.contains_key(key) {
                    trace!(code = %code, key, "back-filling key into default set");
                    default.insert(key, message.clone());
                }
            }
        }

        debug!(
            added = additions.languages.len(),
            total = languages.len(),
            "catalog merged"
        );
        Ok(Self::assemble(default, languages))
    }

    // ------------------------------------------------------------------
    // Serialization
    // ------------------------------------------------------------------

    /// Serialize every language in full.
    ///
    /// The output is a re-parseable object literal; identical catalogs yield
    /// byte-identical text (fragments are memoized per code).
    #[must_use]
    pub fn serialize(&self) -> String {
        self.serialize_inner(None)
    }

    /// Serialize the default set and the requested codes in full; every
    /// other known language is reduced to a `{"$": "<name>"}` stub so the
    /// available-language list stays enumerable without shipping unused
    /// translations. The alias-of-default code is always included. Unknown
    /// and duplicate request codes are silently ignored.
    #[must_use]
    pub fn serialize_subset(&self, codes: &[&str]) -> String {
        self.serialize_inner(Some(codes))
    }

    fn serialize_inner(&self, requested: Option<&[&str]>) -> String {
        let wanted = |code: &str| match requested {
            None => true,
            Some(codes) => codes.contains(&code),
        };

        let mut out = String::from("{");
        out.push_str(&format!(
            "{}: {}",
            quote(DEFAULT_SLOT),
            self.fragment(DEFAULT_SLOT, &self.default)
        ));
        for (code, def) in &self.languages {
            out.push_str(", ");
            out.push_str(&quote(code));
            out.push_str(": ");
            match def {
                LanguageDefinition::AliasOfDefault => out.push_str(&quote(DEFAULT_SLOT)),
                LanguageDefinition::Messages(set) if wanted(code) => {
                    out.push_str(&self.fragment(code, set));
                }
                LanguageDefinition::Messages(set) => out.push_str(&stub(set)),
            }
        }
        out.push('}');
        out
    }

    fn fragment(&self, code: &str, set: &MessageSet) -> String {
        match self.fragments.get(code) {
            Some(cell) => cell
                .get_or_init(|| {
                    trace!(code, "serializing message set");
                    set_body(set)
                })
                .clone(),
            // Codes outside the cache map cannot occur; recompute anyway.
            None => set_body(set),
        }
    }
}

/// Full object-literal body for one message set.
fn set_body(set: &MessageSet) -> String {
    let entries: Vec<String> = set
        .iter()
        .map(|(key, message)| format!("{}: {}", quote(key), message.serial_form()))
        .collect();
    format!("{{{}}}", entries.join(", "))
}

/// Display-name-only stub for a non-requested language.
fn stub(set: &MessageSet) -> String {
    match set.display_name() {
        Some(name) => format!("{{{}: {}}}", quote(NAME_KEY), quote(name)),
        None => "{}".to_string(),
    }
}
