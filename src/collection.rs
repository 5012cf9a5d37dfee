//! The ordered, keyed row container every transform operates on.
//!
//! A [`Collection`] maps keys to rows and remembers insertion order. Transforms
//! never modify their receiver unless their name says so (`merge_in`, `append`,
//! `extract`, `move_to`): they build a fresh collection through
//! [`Collection::return_constant`], the single construction hook, which also
//! places the new collection's cursor on its first element.
//!
//! Collections can be built from anything array-like:
//!
//! ```
//! use rowtable::{Collection, Key, Value};
//! use serde_json::json;
//!
//! let positional = Collection::from(vec![Value::from("a"), Value::from("b")]);
//! assert_eq!(positional.first_key(false)?, Some(&Key::Int(0)));
//!
//! let keyed = Collection::from(json!({"fr": {"pop": 68}, "de": {"pop": 84}}));
//! assert_eq!(keyed.len(), 2);
//!
//! let pairs: Collection = [("x", 1), ("y", 2)].into_iter().collect();
//! assert!(pairs.contains(&Value::from(2)));
//! # Ok::<(), rowtable::TableError>(())
//! ```

use crate::value::{Key, Row, Value, positional};
use serde::{Deserialize, Serialize};

/// An insertion-ordered mapping from key to row, with an internal cursor.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub struct Collection {
    rows: Row,
    pub(crate) cursor: usize,
}

impl Collection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construction hook used by every transform to produce its result.
    #[must_use]
    pub fn return_constant(&self, rows: Row) -> Self {
        Self { rows, cursor: 0 }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn get(&self, key: &Key) -> Option<&Value> {
        self.rows.get(key)
    }

    pub fn get_mut(&mut self, key: &Key) -> Option<&mut Value> {
        self.rows.get_mut(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &Key) -> bool {
        self.rows.contains_key(key)
    }

    /// Insert or replace a row. A replaced row keeps its position.
    pub fn insert(&mut self, key: impl Into<Key>, row: impl Into<Value>) -> Option<Value> {
        self.rows.insert(key.into(), row.into())
    }

    /// Remove a row, preserving the order of the remaining ones.
    pub fn remove(&mut self, key: &Key) -> Option<Value> {
        let index = self.rows.get_index_of(key)?;
        if index < self.cursor {
            self.cursor -= 1;
        }
        self.rows.shift_remove_index(index).map(|(_, row)| row)
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &Key> + ExactSizeIterator {
        self.rows.keys()
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &Value> + ExactSizeIterator {
        self.rows.values()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, Key, Value> {
        self.rows.iter()
    }

    #[must_use]
    pub const fn as_rows(&self) -> &Row {
        &self.rows
    }

    #[must_use]
    pub fn into_rows(self) -> Row {
        self.rows
    }

    /// Whether any row equals `value`.
    #[must_use]
    pub fn contains(&self, value: &Value) -> bool {
        self.rows.values().any(|row| row == value)
    }

    /// False only when the keys are exactly `0, 1, 2, ...` in order.
    #[must_use]
    pub fn is_assoc(&self) -> bool {
        !(0_i64..)
            .zip(self.rows.keys())
            .all(|(i, key)| *key == Key::Int(i))
    }

    /// The key a row appended without a key of its own receives: one past the
    /// largest integer key, or `0`.
    pub(crate) fn next_free_index(&self) -> Key {
        Key::Int(
            self.rows
                .keys()
                .filter_map(Key::as_int)
                .max()
                .map_or(0, |max| max.saturating_add(1)),
        )
    }

    pub(crate) fn replace_rows(&mut self, rows: Row) {
        self.rows = rows;
        self.cursor = 0;
    }
}

/// Key order and rows are compared; the cursor is not.
impl PartialEq for Collection {
    fn eq(&self, other: &Self) -> bool {
        self.rows.len() == other.rows.len() && self.rows.iter().eq(other.rows.iter())
    }
}

impl Eq for Collection {}

impl From<Row> for Collection {
    fn from(rows: Row) -> Self {
        Self { rows, cursor: 0 }
    }
}

impl From<&Collection> for Collection {
    fn from(other: &Collection) -> Self {
        Self::from(other.rows.clone())
    }
}

/// Rows keyed by position.
impl<T: Into<Value>> From<Vec<T>> for Collection {
    fn from(rows: Vec<T>) -> Self {
        Self::from(positional(rows.into_iter().map(Into::into).collect()))
    }
}

/// Rows become entries, sequences are keyed by position, and a scalar becomes
/// a one-row collection at key `0`.
impl From<Value> for Collection {
    fn from(value: Value) -> Self {
        match value {
            Value::Map(rows) => Self::from(rows),
            Value::List(items) => Self::from(positional(items)),
            scalar => Self::from(vec![scalar]),
        }
    }
}

impl From<serde_json::Value> for Collection {
    fn from(value: serde_json::Value) -> Self {
        Self::from(Value::from(value))
    }
}

impl From<Collection> for Value {
    fn from(collection: Collection) -> Self {
        Self::Map(collection.rows)
    }
}

impl From<&Collection> for Value {
    fn from(collection: &Collection) -> Self {
        Self::Map(collection.as_rows().clone())
    }
}

impl From<Collection> for serde_json::Value {
    fn from(collection: Collection) -> Self {
        Self::from(Value::from(collection))
    }
}

impl<K: Into<Key>, V: Into<Value>> FromIterator<(K, V)> for Collection {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect::<Row>(),
        )
    }
}

impl IntoIterator for Collection {
    type Item = (Key, Value);
    type IntoIter = indexmap::map::IntoIter<Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = (&'a Key, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn equality_is_order_sensitive_and_ignores_cursor() {
        let a: Collection = [("x", 1), ("y", 2)].into_iter().collect();
        let mut b: Collection = [("x", 1), ("y", 2)].into_iter().collect();
        b.cursor = 1;
        assert_eq!(a, b);

        let c: Collection = [("y", 2), ("x", 1)].into_iter().collect();
        assert_ne!(a, c);
    }

    #[test]
    fn next_free_index_skips_past_the_largest_integer_key() {
        let c = Collection::from(json!({"a": 1, "4": 2, "-1": 3}));
        assert_eq!(c.next_free_index(), Key::Int(5));
        assert_eq!(Collection::new().next_free_index(), Key::Int(0));
    }

    #[test]
    fn is_assoc_detects_positional_keys() {
        assert!(!Collection::from(vec![1, 2, 3]).is_assoc());
        assert!(Collection::from(json!({"1": "a", "0": "b"})).is_assoc());
        assert!(!Collection::new().is_assoc());
    }

    #[test]
    fn keys_and_values_run_backwards() {
        let c = Collection::from(json!({"a": 1, "b": 2, "c": 3}));
        assert_eq!(c.keys().next_back(), Some(&Key::from("c")));
        assert_eq!(c.values().rev().next(), Some(&Value::from(3)));
        assert_eq!(c.keys().len(), 3);
    }

    #[test]
    fn textual_and_json_integer_keys_meet() {
        let mut c = Collection::from(json!({"7": "x"}));
        assert_eq!(c.get(&Key::from("7")), Some(&Value::from("x")));
        assert_eq!(c.insert("7", "y"), Some(Value::from("x")));
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn scalars_become_a_single_row() {
        let c = Collection::from(json!(5));
        assert_eq!(c.get(&Key::Int(0)), Some(&Value::from(5)));
    }

    #[test]
    fn serde_round_trip_keeps_order() -> anyhow::Result<()> {
        let c = Collection::from(json!({"b": {"n": 1}, "a": {"n": 2}}));
        let text = serde_json::to_string(&c)?;
        assert_eq!(text, r#"{"b":{"n":1},"a":{"n":2}}"#);
        let back: Collection = serde_json::from_str(&text)?;
        assert_eq!(back, c);
        Ok(())
    }

    #[test]
    fn removing_before_the_cursor_keeps_it_on_the_same_row() {
        let mut c = Collection::from(vec!["a", "b", "c"]);
        c.cursor = 2;
        c.remove(&Key::Int(0));
        assert_eq!(c.rows.get_index(c.cursor).map(|(_, v)| v), Some(&Value::from("c")));
    }
}
