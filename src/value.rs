//! Dynamically typed keys, cells and rows.
//!
//! Rows carry no schema: two rows of the same [`Collection`](crate::Collection)
//! may hold different columns, and any cell may itself be a nested row or a
//! sequence. [`Value`] models such a cell, [`Key`] addresses a column or a
//! collection entry, and [`Row`] is an insertion-ordered mapping between them.
//!
//! ## JSON bridge
//! `serde_json::Value` converts to and from [`Value`] losslessly for everything
//! JSON can express. Object keys that spell a canonical integer (`"0"`, `"-4"`,
//! but not `"07"`) become [`Key::Int`], so
//!
//! ```
//! use rowtable::{Key, Value};
//! use serde_json::json;
//!
//! let v = Value::from(json!({"0": "zero", "name": "x"}));
//! let row = v.as_map().unwrap();
//! assert!(row.contains_key(&Key::Int(0)));
//! assert!(row.contains_key(&Key::from("name")));
//! ```

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// An insertion-ordered mapping from column name to cell.
pub type Row = IndexMap<Key, Value>;

/// A column name or collection key: either an integer or a string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Int(i64),
    Str(String),
}

impl Key {
    /// Parse a textual key, turning canonical integers into [`Key::Int`].
    ///
    /// ```
    /// use rowtable::Key;
    /// assert_eq!(Key::parse("12"), Key::Int(12));
    /// assert_eq!(Key::parse("012"), Key::from("012"));
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<i64>() {
            Ok(i) if i.to_string() == raw => Self::Int(i),
            _ => Self::Str(raw.to_string()),
        }
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Str(_) => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            Self::Int(_) => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Key {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for Key {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

/// Textual keys go through [`Key::parse`], so `"7"` and `7` are one key.
impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        match value.parse::<i64>() {
            Ok(i) if i.to_string() == value => Self::Int(i),
            _ => Self::Str(value),
        }
    }
}

impl From<&String> for Key {
    fn from(value: &String) -> Self {
        Self::parse(value)
    }
}

impl From<&Key> for Key {
    fn from(value: &Key) -> Self {
        value.clone()
    }
}

/// A single cell: a scalar, a sequence, or a nested row.
///
/// Equality and hashing are order-sensitive for nested rows, which makes
/// `Value` usable as a set member when de-duplicating accumulated cells.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(OrderedFloat<f64>),
    Str(String),
    /// A sequence of cells. Never treated as a nested mapping by merges.
    List(Vec<Value>),
    /// A nested row.
    Map(Row),
}

impl Value {
    /// Build a nested row from `(column, cell)` pairs.
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<Key>,
        V: Into<Self>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Falsy cells are skipped by grouping: `null`, `false`, `0`, `0.0`, `""`,
    /// `"0"`, and empty sequences or rows.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Float(f) => f.0 != 0.0,
            Self::Str(s) => !(s.is_empty() || s == "0"),
            Self::List(items) => !items.is_empty(),
            Self::Map(row) => !row.is_empty(),
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self, Self::Map(_))
    }

    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// True for everything that is neither a sequence nor a nested row.
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        !matches!(self, Self::List(_) | Self::Map(_))
    }

    #[must_use]
    pub const fn as_map(&self) -> Option<&Row> {
        match self {
            Self::Map(row) => Some(row),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut Row> {
        match self {
            Self::Map(row) => Some(row),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view of the cell. Numeric strings are parsed.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(f.0),
            Self::Str(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Look up a column. Sequences answer integer keys by position.
    #[must_use]
    pub fn get(&self, key: &Key) -> Option<&Self> {
        match (self, key) {
            (Self::Map(row), _) => row.get(key),
            (Self::List(items), Key::Int(i)) => usize::try_from(*i).ok().and_then(|i| items.get(i)),
            _ => None,
        }
    }

    /// View a row or a sequence as a row; sequences are keyed by position.
    /// Scalars yield `None`.
    #[must_use]
    pub fn into_row(self) -> Option<Row> {
        match self {
            Self::Map(row) => Some(row),
            Self::List(items) => Some(positional(items)),
            _ => None,
        }
    }

    /// Normalize to a sequence: sequences are returned as-is, anything else
    /// becomes a one-element sequence.
    #[must_use]
    pub fn into_list(self) -> Vec<Self> {
        match self {
            Self::List(items) => items,
            other => vec![other],
        }
    }

    /// Short type label used in diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }
}

/// Key a sequence by position: `[a, b]` becomes `{0: a, 1: b}`.
pub(crate) fn positional(items: Vec<Value>) -> Row {
    (0_i64..).zip(items).map(|(i, v)| (Key::Int(i), v)).collect()
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a.len() == b.len() && a.iter().eq(b.iter()),
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Null => {}
            Self::Bool(b) => b.hash(state),
            Self::Int(i) => i.hash(state),
            Self::Float(f) => f.hash(state),
            Self::Str(s) => s.hash(state),
            Self::List(items) => items.hash(state),
            Self::Map(row) => {
                row.len().hash(state);
                for (k, v) in row {
                    k.hash(state);
                    v.hash(state);
                }
            }
        }
    }
}

/// Scalars print bare (`null` prints as an empty string); sequences and rows
/// print as compact JSON.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{}", x.0),
            Self::Str(s) => f.write_str(s),
            Self::List(_) | Self::Map(_) => {
                write!(f, "{}", serde_json::Value::from(self.clone()))
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(OrderedFloat(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<Key> for Value {
    fn from(value: Key) -> Self {
        match value {
            Key::Int(i) => Self::Int(i),
            Key::Str(s) => Self::Str(s),
        }
    }
}

impl From<&Key> for Value {
    fn from(value: &Key) -> Self {
        Self::from(value.clone())
    }
}

impl From<Row> for Value {
    fn from(value: Row) -> Self {
        Self::Map(value)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match value {
            Json::Null => Self::Null,
            Json::Bool(b) => Self::Bool(b),
            Json::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::from))
                .unwrap_or(Self::Null),
            Json::String(s) => Self::Str(s),
            Json::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Json::Object(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (Key::parse(&k), Self::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Non-finite floats have no JSON spelling and become `null`.
impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Int(i) => Self::from(i),
            Value::Float(f) => serde_json::Number::from_f64(f.0).map_or(Self::Null, Self::Number),
            Value::Str(s) => Self::String(s),
            Value::List(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Value::Map(row) => Self::Object(
                row.into_iter()
                    .map(|(k, v)| (k.to_string(), Self::from(v)))
                    .collect(),
            ),
        }
    }
}
