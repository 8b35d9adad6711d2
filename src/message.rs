//! Message definitions
//!
//! The primitive value type for one translatable entry: either a fixed
//! string or a formatting function from positional arguments to a string.
//! Formatters are arity-erased — they take a slice of [`Value`] arguments —
//! and carry the textual function-literal form used by catalog
//! serialization, since a compiled closure has no transferable
//! representation of its own.

use std::fmt;
use std::sync::Arc;

pub use serde_json::Value;

/// Arity-erased formatting function.
pub type FormatFn = Arc<dyn Fn(&[Value]) -> String + Send + Sync>;

/// One translatable entry: fixed text or a text-producing function.
#[derive(Clone)]
pub enum Message {
    /// A fixed string, returned unchanged regardless of arguments.
    Literal(String),
    /// A parameterized formatting function.
    Formatter(Formatter),
}

impl Message {
    /// Create a literal message.
    pub fn literal(text: impl Into<String>) -> Self {
        Message::Literal(text.into())
    }

    /// Create a formatter from a positional template.
    ///
    /// Placeholders are `{0}`, `{1}`, ... and are replaced by the rendered
    /// arguments. Placeholders without a matching argument are left as-is.
    ///
    /// # Examples
    ///
    /// ```
    /// use intl_map::{Message, Value};
    ///
    /// let hello = Message::template("Hello {0}");
    /// assert_eq!(hello.render(&[Value::from("me")]), "Hello me");
    /// ```
    pub fn template(template: impl Into<String>) -> Self {
        Message::Formatter(Formatter::template(template))
    }

    /// Create a formatter from an arbitrary closure.
    ///
    /// `source` is the textual function-literal form emitted by catalog
    /// serialization in place of the closure.
    pub fn formatter(
        source: impl Into<String>,
        f: impl Fn(&[Value]) -> String + Send + Sync + 'static,
    ) -> Self {
        Message::Formatter(Formatter::new(source, f))
    }

    /// Whether this message is a fixed string.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        matches!(self, Message::Literal(_))
    }

    /// Produce the message text for the given arguments.
    ///
    /// A literal is returned unchanged; excess arguments are ignored.
    #[must_use]
    pub fn render(&self, args: &[Value]) -> String {
        match self {
            Message::Literal(text) => text.clone(),
            Message::Formatter(f) => f.apply(args),
        }
    }

    /// Textual form used by catalog serialization: a quoted string for a
    /// literal, the function-literal source for a formatter.
    pub(crate) fn serial_form(&self) -> String {
        match self {
            Message::Literal(text) => quote(text),
            Message::Formatter(f) => f.source().to_string(),
        }
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            Message::Formatter(inner) => f.debug_tuple("Formatter").field(&inner.source).finish(),
        }
    }
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Message::Literal(a), Message::Literal(b)) => a == b,
            // Closures are not comparable; the source text is the identity.
            (Message::Formatter(a), Message::Formatter(b)) => a.source == b.source,
            _ => false,
        }
    }
}

impl Eq for Message {}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Message::Literal(text.to_string())
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Message::Literal(text)
    }
}

/// A formatting function paired with its transferable textual form.
#[derive(Clone)]
pub struct Formatter {
    source: String,
    apply: FormatFn,
}

impl Formatter {
    /// Wrap a closure with an explicit function-literal source text.
    pub fn new(
        source: impl Into<String>,
        f: impl Fn(&[Value]) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            source: source.into(),
            apply: Arc::new(f),
        }
    }

    /// Build a positional-template formatter.
    ///
    /// The source renders as `(...args) => "<template>"`, which is the one
    /// function-literal shape the serialized-catalog parser reconstructs.
    pub fn template(template: impl Into<String>) -> Self {
        let template = template.into();
        let source = format!("(...args) => {}", quote(&template));
        let body = template;
        Self {
            source,
            apply: Arc::new(move |args| interpolate(&body, args)),
        }
    }

    /// The textual function-literal form.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Call the formatting function.
    #[must_use]
    pub fn apply(&self, args: &[Value]) -> String {
        (self.apply)(args)
    }
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formatter")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// Render one argument value: strings unquoted, everything else in its
/// canonical JSON text.
fn render_arg(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Single-pass `{N}` interpolation. Unmatched or malformed tokens are left
/// as-is; substituted text is never rescanned.
fn interpolate(template: &str, args: &[Value]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '{' {
            result.push(ch);
            continue;
        }
        let mut token = String::new();
        let mut closed = false;
        for c in chars.by_ref() {
            if c == '}' {
                closed = true;
                break;
            }
            token.push(c);
        }
        let arg = if closed {
            token.parse::<usize>().ok().and_then(|i| args.get(i))
        } else {
            None
        };
        match arg {
            Some(value) => result.push_str(&render_arg(value)),
            None => {
                result.push('{');
                result.push_str(&token);
                if closed {
                    result.push('}');
                }
            }
        }
    }

    result
}

/// JSON-escape and quote a string so serialized output is always valid
/// literal syntax.
pub(crate) fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("{text:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_ignores_arguments() {
        let msg = Message::literal("Welcome!");
        assert_eq!(msg.render(&[]), "Welcome!");
        assert_eq!(msg.render(&[Value::from("ignored")]), "Welcome!");
    }

    #[test]
    fn template_substitutes_positionally() {
        let msg = Message::template("Goodbye {0}, see you {1}");
        assert_eq!(
            msg.render(&[Value::from("Bob"), Value::from("tomorrow")]),
            "Goodbye Bob, see you tomorrow"
        );
    }

    #[test]
    fn template_repeats_argument() {
        let msg = Message::template("{0} and {0}");
        assert_eq!(msg.render(&[Value::from("A")]), "A and A");
    }

    #[test]
    fn missing_argument_left_as_is() {
        let msg = Message::template("Hello {0} from {1}");
        assert_eq!(msg.render(&[Value::from("me")]), "Hello me from {1}");
    }

    #[test]
    fn interpolation_edge_cases() {
        // Unclosed brace
        assert_eq!(interpolate("Hello {0", &[Value::from("x")]), "Hello {0");
        // Empty braces
        assert_eq!(interpolate("Hello {}", &[]), "Hello {}");
        // Non-numeric token
        assert_eq!(interpolate("Hello {name}", &[]), "Hello {name}");
        // No braces
        assert_eq!(interpolate("Hello World", &[]), "Hello World");
    }

    #[test]
    fn non_string_arguments_render_as_json() {
        let msg = Message::template("count: {0}, flag: {1}");
        assert_eq!(
            msg.render(&[Value::from(42), Value::from(true)]),
            "count: 42, flag: true"
        );
    }

    #[test]
    fn custom_formatter_applies_closure() {
        let msg = Message::formatter("(n) => n > 1 ? \"items\" : \"item\"", |args| {
            let n = args.first().and_then(Value::as_i64).unwrap_or(0);
            if n > 1 { "items".into() } else { "item".into() }
        });
        assert_eq!(msg.render(&[Value::from(3)]), "items");
        assert_eq!(msg.render(&[Value::from(1)]), "item");
    }

    #[test]
    fn serial_form_quotes_literals() {
        assert_eq!(Message::literal("a \"b\"").serial_form(), r#""a \"b\"""#);
        assert_eq!(
            Message::template("Hello {0}").serial_form(),
            r#"(...args) => "Hello {0}""#
        );
    }

    #[test]
    fn equality_by_text_and_source() {
        assert_eq!(Message::literal("a"), Message::literal("a"));
        assert_ne!(Message::literal("a"), Message::literal("b"));
        assert_eq!(Message::template("x {0}"), Message::template("x {0}"));
        assert_ne!(Message::literal("x {0}"), Message::template("x {0}"));
    }
}
