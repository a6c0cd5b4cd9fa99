//! Serialization of data values to SCSS source.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! A document becomes one variable declaration per top-level key:
//!
//! ```scss
//! $primary: #c33;
//! $sizes: (1,2,3,);
//! $theme: ('fg': black,'bg': white,);
//! ```
//!
//! Lists and maps always carry a trailing comma so that a one-element list
//! is still parsed as a list.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::value::{DataDocument, DataValue};

/// Hex colors: `#` followed by 3, 4, 6 or 8 hex digits.
static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#([0-9a-fA-F]{3,4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").unwrap());

/// Strings SASS accepts as unquoted identifiers.
///
/// See <https://sass-lang.com/documentation/values/strings/#unquoted>.
/// `[^\x00-\x7F]` is any non-ASCII character; ASCII control characters
/// never qualify.
static UNQUOTED_IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(-?([a-zA-Z_]|[^\x00-\x7F])|--)([a-zA-Z0-9_-]|[^\x00-\x7F])*$").unwrap()
});

/// Strings that already carry their own quotes.
static ALREADY_QUOTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?s)^("([^"\\]|\\.)*"|'([^'\\]|\\.)*')$"#).unwrap());

/// How a text scalar is written into SCSS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextForm {
    /// Emitted as-is, compiles to a color
    HexColor,
    /// Emitted as-is, compiles to an unquoted string
    Identifier,
    /// Emitted as-is, the quotes are already part of the text
    Quoted,
    /// Emitted as a double-quoted string literal
    NeedsQuotes,
}

/// Decide how `text` must be written; patterns are tried in declaration order.
pub fn classify_text(text: &str) -> TextForm {
    if HEX_COLOR.is_match(text) {
        TextForm::HexColor
    } else if UNQUOTED_IDENTIFIER.is_match(text) {
        TextForm::Identifier
    } else if ALREADY_QUOTED.is_match(text) {
        TextForm::Quoted
    } else {
        TextForm::NeedsQuotes
    }
}

/// Render a document as newline-separated SCSS variable declarations.
///
/// Keys are written verbatim and in document order.
pub fn serialize_document(document: &DataDocument) -> String {
    document
        .iter()
        .map(|(key, value)| format!("${}: {};", key, serialize_value(value)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a single value as a SCSS expression.
pub fn serialize_value(value: &DataValue) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

fn write_value(out: &mut String, value: &DataValue) {
    match value {
        DataValue::List(items) => {
            out.push('(');
            for item in items {
                write_value(out, item);
                out.push(',');
            }
            out.push(')');
        }
        DataValue::Mapping(entries) => {
            out.push('(');
            for (key, item) in entries {
                out.push('\'');
                out.push_str(&key.replace('\'', "\\'"));
                out.push_str("': ");
                write_value(out, item);
                out.push(',');
            }
            out.push(')');
        }
        DataValue::Text(text) => match classify_text(text) {
            TextForm::HexColor | TextForm::Identifier | TextForm::Quoted => out.push_str(text),
            TextForm::NeedsQuotes => out.push_str(&serde_json::Value::from(text.as_str()).to_string()),
        },
        DataValue::Number(n) => out.push_str(&n.to_string()),
        DataValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        DataValue::Null => out.push_str("null"),
    }
}
