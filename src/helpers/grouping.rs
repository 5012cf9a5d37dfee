//! Grouping rows under computed indexes.
//!
//! All three groupers walk the collection in order, skip falsy rows, and ask an
//! index generator where each row belongs. They differ in what happens when two
//! rows land on the same index:
//!
//! - [`Collection::group_by`] reduces them through a caller resolver and fails
//!   when none was given;
//! - [`Collection::group_in_arrays`] keeps both, bucketed under their original keys;
//! - [`Collection::group_by_transformed`] transforms each row first and always
//!   resolves, handing the resolver the raw incoming row as well.
//!
//! ## Example
//! ```
//! use rowtable::{Collection, Key, Value};
//! use serde_json::json;
//!
//! let people = Collection::from(json!([
//!     {"name": "ana", "team": "red"},
//!     {"name": "bo", "team": "blue"},
//!     {"name": "cy", "team": "red"},
//! ]));
//!
//! // Last write wins.
//! let by_team = people.group_by(
//!     |_key, row| row.get(&"team".into()).cloned().unwrap_or_default(),
//!     Some(&|_index: &Key, _existing: Value, incoming: Value| incoming),
//! )?;
//! assert_eq!(by_team.keys().cloned().collect::<Vec<_>>(), vec![Key::from("red"), Key::from("blue")]);
//!
//! let buckets = people.group_in_arrays(|_key, row| row.get(&"team".into()).cloned().unwrap_or_default());
//! assert_eq!(buckets.get(&"red".into()).and_then(Value::as_map).map(|m| m.len()), Some(2));
//! # Ok::<(), rowtable::TableError>(())
//! ```

use crate::error::{Result, TableError};
use crate::value::{Key, Row, Value};
use crate::Collection;
use indexmap::IndexMap;
use tracing::{debug, trace};

/// Row-level conflict resolver: `(index, existing, incoming) -> stored`.
pub type Resolver<'a> = &'a dyn Fn(&Key, Value, Value) -> Value;

/// Destination keys produced by an index generator.
///
/// Generators may return a single key-like value or several of them; several
/// indexes copy the row into every one of those groups.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Indexes(pub Vec<Key>);

impl From<Key> for Indexes {
    fn from(key: Key) -> Self {
        Self(vec![key])
    }
}

impl From<&str> for Indexes {
    fn from(key: &str) -> Self {
        Self(vec![Key::from(key)])
    }
}

impl From<String> for Indexes {
    fn from(key: String) -> Self {
        Self(vec![Key::from(key)])
    }
}

impl From<i64> for Indexes {
    fn from(key: i64) -> Self {
        Self(vec![Key::Int(key)])
    }
}

impl<K: Into<Key>> From<Vec<K>> for Indexes {
    fn from(keys: Vec<K>) -> Self {
        Self(keys.into_iter().map(Into::into).collect())
    }
}

/// A sequence yields one index per member. Each member is cast the way array
/// keys are: integer strings become integers, booleans become `0`/`1`, floats
/// are truncated toward zero and `null` becomes `""`. Nested rows and
/// sequences, which have no key form, are keyed by their compact JSON.
impl From<Value> for Indexes {
    fn from(value: Value) -> Self {
        match value {
            Value::List(items) => Self(items.into_iter().map(key_of).collect()),
            other => Self(vec![key_of(other)]),
        }
    }
}

fn key_of(value: Value) -> Key {
    match value {
        Value::Int(i) => Key::Int(i),
        Value::Bool(b) => Key::Int(i64::from(b)),
        // Saturating cast; NaN becomes 0
        #[allow(clippy::cast_possible_truncation)]
        Value::Float(f) => Key::Int(f.0.trunc() as i64),
        Value::Str(s) => Key::from(s),
        Value::Null => Key::Str(String::new()),
        nested @ (Value::List(_) | Value::Map(_)) => Key::Str(nested.to_string()),
    }
}

/// Store `incoming` at `index`, resolving an occupied slot through `resolver`.
pub(crate) fn place(
    out: &mut Row,
    operation: &'static str,
    key: &Key,
    index: Key,
    incoming: Value,
    resolver: Option<Resolver<'_>>,
) -> Result<()> {
    match out.get_mut(&index) {
        None => {
            out.insert(index, incoming);
        }
        Some(existing) => {
            let Some(resolve) = resolver else {
                return Err(TableError::UnresolvedConflict {
                    operation,
                    key: key.clone(),
                    index,
                    existing: existing.clone(),
                    incoming,
                });
            };
            trace!(operation, %key, %index, "resolving conflict");
            let current = std::mem::take(existing);
            *existing = resolve(&index, current, incoming);
        }
    }
    Ok(())
}

impl Collection {
    /// Group rows by the index(es) `index_generator(key, row)` returns.
    ///
    /// The first row reaching an index is stored as-is; every later one is
    /// combined with it through `conflict_resolver(index, existing, incoming)`.
    /// Falsy rows are skipped. Groups appear in the order their first member
    /// was met.
    ///
    /// # Errors
    /// [`TableError::UnresolvedConflict`] when two rows share an index and no
    /// resolver was supplied.
    pub fn group_by<G, I>(
        &self,
        index_generator: G,
        conflict_resolver: Option<Resolver<'_>>,
    ) -> Result<Self>
    where
        G: Fn(&Key, &Value) -> I,
        I: Into<Indexes>,
    {
        let mut out = Row::new();
        for (key, row) in self {
            if !row.is_truthy() {
                continue;
            }
            let Indexes(new_indexes) = index_generator(key, row).into();
            for new_index in new_indexes {
                place(&mut out, "group_by", key, new_index, row.clone(), conflict_resolver)?;
            }
        }

        debug!(operation = "group_by", rows_in = self.len(), groups = out.len(), "grouped collection");
        Ok(self.return_constant(out))
    }

    /// Bucket rows by index without reducing them.
    ///
    /// Each output entry is a nested row mapping the members' original keys to
    /// the members themselves. Falsy rows are skipped.
    #[must_use]
    pub fn group_in_arrays<G, I>(&self, index_generator: G) -> Self
    where
        G: Fn(&Key, &Value) -> I,
        I: Into<Indexes>,
    {
        let mut buckets: IndexMap<Key, Row> = IndexMap::new();
        for (key, row) in self {
            if !row.is_truthy() {
                continue;
            }
            let Indexes(new_keys) = index_generator(key, row).into();
            for new_key in new_keys {
                buckets.entry(new_key).or_default().insert(key.clone(), row.clone());
            }
        }

        let out: Row = buckets
            .into_iter()
            .map(|(index, members)| (index, Value::Map(members)))
            .collect();
        debug!(operation = "group_in_arrays", rows_in = self.len(), groups = out.len(), "bucketed collection");
        self.return_constant(out)
    }

    /// Group by a single index per row, storing `row_transformer(row)` instead
    /// of the row itself.
    ///
    /// Collisions always go through
    /// `conflict_resolver(index, existing_transformed, incoming_transformed, incoming_raw)`.
    #[must_use]
    pub fn group_by_transformed<G, K, T, R>(
        &self,
        index_generator: G,
        row_transformer: T,
        conflict_resolver: R,
    ) -> Self
    where
        G: Fn(&Key, &Value) -> K,
        K: Into<Key>,
        T: Fn(&Value) -> Value,
        R: Fn(&Key, Value, Value, &Value) -> Value,
    {
        let mut out = Row::new();
        for (key, row) in self {
            if !row.is_truthy() {
                continue;
            }
            let new_index: Key = index_generator(key, row).into();
            let transformed = row_transformer(row);

            match out.get_mut(&new_index) {
                None => {
                    out.insert(new_index, transformed);
                }
                Some(existing) => {
                    trace!(operation = "group_by_transformed", %key, index = %new_index, "resolving conflict");
                    let current = std::mem::take(existing);
                    *existing = conflict_resolver(&new_index, current, transformed, row);
                }
            }
        }

        debug!(operation = "group_by_transformed", rows_in = self.len(), groups = out.len(), "grouped collection");
        self.return_constant(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn indexes_from_values() {
        assert_eq!(Indexes::from(Value::from("a")), Indexes(vec![Key::from("a")]));
        assert_eq!(
            Indexes::from(Value::from(json!([1, "b", true]))),
            Indexes(vec![Key::Int(1), Key::from("b"), Key::Int(1)])
        );
        assert_eq!(
            Indexes::from(Value::from(json!([false, 2.9, -2.9, null, "12", "012"]))),
            Indexes(vec![
                Key::Int(0),
                Key::Int(2),
                Key::Int(-2),
                Key::Str(String::new()),
                Key::Int(12),
                Key::Str("012".into()),
            ])
        );
        assert_eq!(Indexes::from(vec!["x", "y"]).0.len(), 2);
    }

    #[test]
    fn place_reports_both_rows_without_a_resolver() {
        let mut out = Row::new();
        place(&mut out, "group_by", &Key::Int(0), Key::from("g"), Value::from(1), None).unwrap();
        let err = place(&mut out, "group_by", &Key::Int(1), Key::from("g"), Value::from(2), None)
            .unwrap_err();
        match err {
            TableError::UnresolvedConflict { key, index, existing, incoming, .. } => {
                assert_eq!(key, Key::Int(1));
                assert_eq!(index, Key::from("g"));
                assert_eq!(existing, Value::from(1));
                assert_eq!(incoming, Value::from(2));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
