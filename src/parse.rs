//! Parsing serialized catalog text
//!
//! [`Catalog::serialize`](crate::Catalog::serialize) emits an object literal
//! a remote consumer can evaluate to bootstrap its own catalog. This module
//! is the receiving half of that contract: a small scanner over the emitted
//! grammar producing a [`CatalogDefinition`] again.
//!
//! ```text
//! { "<code>": <entry>, ... }            must contain a "default" entry
//! <entry>  := "default"                 alias-of-default marker
//!           | { "<key>": <value>, ... }
//! <value>  := <json string>             literal
//!           | (...args) => "<template>" positional-template formatter
//! ```
//!
//! String escapes are JSON escapes. Function texts outside the emitted
//! arrow-template shape are rejected: this parser consumes what `serialize`
//! produces, nothing more — evaluating richer function bodies is the job of
//! a script-capable consumer.

use indexmap::IndexMap;

use crate::catalog::{Catalog, CatalogDefinition, LanguageDefinition, MessageSet, DEFAULT_SLOT};
use crate::error::{IntlError, Result};
use crate::message::Message;

/// Parse serialized catalog text into a definition.
pub fn parse_definition(text: &str) -> Result<CatalogDefinition> {
    Scanner::new(text).definition()
}

/// Parse serialized catalog text straight into a catalog.
///
/// # Examples
///
/// ```
/// use intl_map::{parse_catalog, Catalog, MessageSet};
///
/// let original = Catalog::with_default_code(
///     MessageSet::new("English").with("welcome", "Welcome!"),
///     "en",
/// );
/// let copy = parse_catalog(&original.serialize()).unwrap();
/// assert_eq!(copy.availables(), original.availables());
/// ```
pub fn parse_catalog(text: &str) -> Result<Catalog> {
    Catalog::from_definition(parse_definition(text)?)
}

const ARROW_PARAMS: &str = "(...args)";
const ARROW: &str = "=>";

struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn definition(mut self) -> Result<CatalogDefinition> {
        let mut default: Option<MessageSet> = None;
        let mut languages: IndexMap<String, LanguageDefinition> = IndexMap::new();

        self.expect('{')?;
        loop {
            let code = self.string()?;
            self.expect(':')?;
            self.skip_ws();
            match self.peek() {
                Some('"') => {
                    let target = self.string()?;
                    if target != DEFAULT_SLOT {
                        return Err(self.error(format!(
                            "language '{code}' references unknown target '{target}'"
                        )));
                    }
                    languages.insert(code, LanguageDefinition::AliasOfDefault);
                }
                Some('{') => {
                    let set = self.message_set()?;
                    if code == DEFAULT_SLOT {
                        default = Some(set);
                    } else {
                        languages.insert(code, LanguageDefinition::Messages(set));
                    }
                }
                _ => return Err(self.error("expected message set or alias".to_string())),
            }
            if !self.separator('}')? {
                break;
            }
        }
        self.skip_ws();
        if self.pos != self.src.len() {
            return Err(self.error("trailing characters after definition".to_string()));
        }

        let Some(default) = default else {
            return Err(self.error("definition has no default message set".to_string()));
        };
        let mut def = CatalogDefinition::new(default);
        for (code, entry) in languages {
            def = match entry {
                LanguageDefinition::AliasOfDefault => def.with_alias(code),
                LanguageDefinition::Messages(set) => def.with_language(code, set),
            };
        }
        Ok(def)
    }

    fn message_set(&mut self) -> Result<MessageSet> {
        let mut set = MessageSet::partial();
        self.expect('{')?;
        self.skip_ws();
        if self.peek() == Some('}') {
            self.pos += 1;
            return Ok(set);
        }
        loop {
            let key = self.string()?;
            self.expect(':')?;
            self.skip_ws();
            let message = match self.peek() {
                Some('"') => Message::literal(self.string()?),
                Some('(') => self.formatter()?,
                _ => return Err(self.error(format!("expected value for key '{key}'"))),
            };
            set.insert(key, message);
            if !self.separator('}')? {
                return Ok(set);
            }
        }
    }

    /// The one function-literal shape `serialize` emits:
    /// `(...args) => "<template>"`.
    fn formatter(&mut self) -> Result<Message> {
        self.skip_ws();
        if !self.rest().starts_with(ARROW_PARAMS) {
            return Err(self.error("unsupported function literal".to_string()));
        }
        self.pos += ARROW_PARAMS.len();
        self.skip_ws();
        if !self.rest().starts_with(ARROW) {
            return Err(self.error("expected '=>' in function literal".to_string()));
        }
        self.pos += ARROW.len();
        let template = self.string()?;
        Ok(Message::template(template))
    }

    /// A JSON-escaped quoted string.
    fn string(&mut self) -> Result<String> {
        self.skip_ws();
        let start = self.pos;
        if self.peek() != Some('"') {
            return Err(self.error("expected string".to_string()));
        }
        let bytes = self.src.as_bytes();
        let mut i = start + 1;
        while i < bytes.len() {
            match bytes[i] {
                b'"' => {
                    let raw = &self.src[start..=i];
                    self.pos = i + 1;
                    return serde_json::from_str::<String>(raw).map_err(|e| IntlError::Parse {
                        reason: format!("invalid string escape: {e}"),
                        offset: start,
                    });
                }
                b'\\' => i += 2,
                _ => i += 1,
            }
        }
        Err(self.error("unterminated string".to_string()))
    }

    /// Consume `,` (continue) or the closing delimiter (stop).
    fn separator(&mut self, close: char) -> Result<bool> {
        self.skip_ws();
        match self.peek() {
            Some(',') => {
                self.pos += 1;
                Ok(true)
            }
            Some(c) if c == close => {
                self.pos += 1;
                Ok(false)
            }
            _ => Err(self.error(format!("expected ',' or '{close}'"))),
        }
    }

    fn expect(&mut self, c: char) -> Result<()> {
        self.skip_ws();
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            Ok(())
        } else {
            Err(self.error(format!("expected '{c}'")))
        }
    }

    fn skip_ws(&mut self) {
        let bytes = self.src.as_bytes();
        while self.pos < bytes.len() && bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn error(&self, reason: String) -> IntlError {
        IntlError::Parse {
            reason,
            offset: self.pos,
        }
    }
}
