//! intl-map Library
//!
//! Typed message catalogs with language-preference resolution:
//! - Immutable, mergeable per-language message catalogs
//! - Preference normalization with generic-locale expansion
//! - Translation views with lookup-with-fallback and change hooks
//! - Compact, re-parseable catalog serialization for remote bootstrap
//!
//! All operations are synchronous, pure computations over immutable or
//! locally-owned state; a [`Catalog`] is safely shared by reference across
//! any number of concurrently reading views.

pub mod catalog;
pub mod error;
pub mod message;
pub mod parse;
pub mod preferences;
pub mod view;

pub use catalog::{
    Additions, Catalog, CatalogDefinition, LanguageDefinition, MessageSet, DEFAULT_SLOT, NAME_KEY,
};
pub use error::{IntlError, Result};
pub use message::{FormatFn, Formatter, Message, Value};
pub use parse::{parse_catalog, parse_definition};
pub use preferences::{normalize, split_raw_header, Preferences};
pub use view::{TranslationView, RESERVED_KEYS};
