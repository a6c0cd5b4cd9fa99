//! The value tree produced by the loader.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Parsed YAML/JSON is converted once, at the parser boundary, into a closed
//! sum type. The serializer matches on it directly and never has to sniff
//! the shape of a value at runtime.

use std::fmt;

use indexmap::IndexMap;

/// A parsed data value.
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
    List(Vec<DataValue>),
    /// Key order is the order in the source file
    Mapping(IndexMap<String, DataValue>),
}

impl DataValue {
    /// Short description of the value's kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            DataValue::Null => "null",
            DataValue::Bool(_) => "a boolean",
            DataValue::Number(_) => "a number",
            DataValue::Text(_) => "a string",
            DataValue::List(_) => "a list",
            DataValue::Mapping(_) => "a mapping",
        }
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::Text(s.to_string())
    }
}

impl From<String> for DataValue {
    fn from(s: String) -> Self {
        DataValue::Text(s)
    }
}

impl From<bool> for DataValue {
    fn from(b: bool) -> Self {
        DataValue::Bool(b)
    }
}

impl From<i64> for DataValue {
    fn from(n: i64) -> Self {
        DataValue::Number(Number::Integer(n))
    }
}

impl From<f64> for DataValue {
    fn from(n: f64) -> Self {
        DataValue::Number(Number::Float(n))
    }
}

impl<T: Into<DataValue>> From<Vec<T>> for DataValue {
    fn from(items: Vec<T>) -> Self {
        DataValue::List(items.into_iter().map(Into::into).collect())
    }
}

/// A numeric scalar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

/// Prints the canonical numeric literal.
///
/// Floats follow the JSON number rules: no trailing `.0`, exponent form
/// outside `[1e-6, 1e21)`, and `null` for NaN and infinities.
impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Number::Integer(n) => write!(f, "{}", n),
            Number::Float(x) if !x.is_finite() => f.write_str("null"),
            Number::Float(x) if x == 0.0 => f.write_str("0"),
            Number::Float(x) => {
                let abs = x.abs();
                if (1e-6..1e21).contains(&abs) {
                    write!(f, "{}", x)
                } else {
                    let exp = format!("{:e}", x);
                    match exp.split_once('e') {
                        Some((mantissa, power)) if !power.starts_with('-') => {
                            write!(f, "{}e+{}", mantissa, power)
                        }
                        _ => f.write_str(&exp),
                    }
                }
            }
        }
    }
}

/// A validated data file: a mapping at the top level.
///
/// Produced by [`crate::parse_document`]; each entry becomes one SASS
/// variable declaration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataDocument {
    entries: IndexMap<String, DataValue>,
}

impl DataDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&DataValue> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in source order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, DataValue> {
        self.entries.iter()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<DataValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn into_inner(self) -> IndexMap<String, DataValue> {
        self.entries
    }
}

impl From<IndexMap<String, DataValue>> for DataDocument {
    fn from(entries: IndexMap<String, DataValue>) -> Self {
        Self { entries }
    }
}

impl FromIterator<(String, DataValue)> for DataDocument {
    fn from_iter<I: IntoIterator<Item = (String, DataValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a DataDocument {
    type Item = (&'a String, &'a DataValue);
    type IntoIter = indexmap::map::Iter<'a, String, DataValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
