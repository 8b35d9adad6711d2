//! `intl-map` Error Types
//!
//! Centralized error handling using thiserror for type-safe errors.
//!
//! Only genuinely exceptional conditions surface here. Unknown preference
//! codes, duplicate preferences, and unknown codes in a serialization
//! request are steady-state inputs and are silently filtered instead.

use thiserror::Error;

/// Top-level error type for `intl-map`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntlError {
    #[error("reserved key '{key}' is not permitted in a message set")]
    ReservedKey { key: String },

    #[error("definition has multiple defaults: '{existing}' and '{conflicting}'")]
    MultipleDefaults {
        existing: String,
        conflicting: String,
    },

    #[error("language '{code}' already has messages and cannot alias the default")]
    AliasShadowsLanguage { code: String },

    #[error("merged language '{code}' has no name")]
    MissingLanguageName { code: String },

    #[error("message '{key}' is not defined for any language")]
    UndefinedMessage { key: String },

    #[error("parse error at byte {offset}: {reason}")]
    Parse { reason: String, offset: usize },
}

/// Result type alias for `intl-map` operations
pub type Result<T> = std::result::Result<T, IntlError>;
