//! Row-level recursive merging.
//!
//! These functions merge two [`Row`]s column by column. They are the building
//! blocks callers typically use inside the conflict resolvers they hand to
//! [`Collection::group_by`](crate::Collection::group_by) or
//! [`Collection::merge_with`](crate::Collection::merge_with):
//!
//! ```
//! use rowtable::{Collection, Key, merge::{keep_unique_column_values, merge_preserving_distincts}, Value};
//! use serde_json::json;
//!
//! let sales = Collection::from(json!([
//!     {"region": "eu", "seller": "ana"},
//!     {"region": "eu", "seller": "bo"},
//!     {"region": "eu", "seller": "ana"},
//! ]));
//!
//! let by_region = sales.group_by(
//!     |_key, row| row.get(&"region".into()).cloned().unwrap_or_default(),
//!     Some(&|_index: &Key, existing: Value, incoming: Value| {
//!         let merged = merge_preserving_distincts(
//!             existing.into_row().unwrap_or_default(),
//!             incoming.into_row().unwrap_or_default(),
//!         );
//!         Value::Map(merged)
//!     }),
//! )?;
//!
//! let eu = by_region.get(&"eu".into()).and_then(Value::as_map).cloned().unwrap_or_default();
//! let eu = keep_unique_column_values(eu, &[]);
//! assert_eq!(Value::Map(eu), Value::from(json!({"region": "eu", "seller": ["ana", "bo"]})));
//! # Ok::<(), rowtable::TableError>(())
//! ```

use crate::value::{Key, Row, Value};
use indexmap::IndexSet;

/// How many more levels of nested rows a recursive operation may descend into.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Depth {
    #[default]
    Unlimited,
    Remaining(usize),
}

impl Depth {
    /// Whether one more level of nesting may be entered.
    #[must_use]
    pub const fn allows_descent(self) -> bool {
        match self {
            Self::Unlimited => true,
            Self::Remaining(n) => n > 0,
        }
    }

    /// The budget one level further down. `Unlimited` stays unlimited.
    #[must_use]
    pub const fn decrement(self) -> Self {
        match self {
            Self::Unlimited => Self::Unlimited,
            Self::Remaining(n) => Self::Remaining(n.saturating_sub(1)),
        }
    }
}

impl From<Option<usize>> for Depth {
    fn from(value: Option<usize>) -> Self {
        value.map_or(Self::Unlimited, Self::Remaining)
    }
}

impl From<usize> for Depth {
    fn from(value: usize) -> Self {
        Self::Remaining(value)
    }
}

/// Column-level resolver: `(existing, conflicting, column) -> merged`.
pub type ColumnResolver<'a> = &'a dyn Fn(Value, Value, &Key) -> Value;

/// Deep-merge `conflicting` into `existing`.
///
/// For each column of `conflicting`:
/// - absent (or `null`) in `existing`: copied in;
/// - a nested row on both sides and `max_depth` allows it: merged recursively
///   with one level less;
/// - otherwise `resolver(existing, conflicting, column)` when a resolver is
///   given, else both values are accumulated into a sequence (`existing` is
///   wrapped first unless it already is one).
///
/// With `Depth::Remaining(0)` nested rows are not entered and are handed to the
/// resolver or accumulated whole.
#[must_use]
pub fn merge_recursive_custom(
    mut existing: Row,
    conflicting: Row,
    resolver: Option<ColumnResolver<'_>>,
    max_depth: Depth,
) -> Row {
    for (column, conflict_value) in conflicting {
        let present = existing.get(&column).is_some_and(|v| !v.is_null());
        if !present {
            existing.insert(column, conflict_value);
            continue;
        }

        let existing_value = existing
            .get_mut(&column)
            .map(std::mem::take)
            .unwrap_or_default();

        let merged = match (existing_value, conflict_value) {
            (Value::Map(left), Value::Map(right)) if max_depth.allows_descent() => Value::Map(
                merge_recursive_custom(left, right, resolver, max_depth.decrement()),
            ),
            (left, right) => match resolver {
                Some(resolve) => resolve(left, right, &column),
                None => accumulate(left, right),
            },
        };
        existing.insert(column, merged);
    }

    existing
}

fn accumulate(existing: Value, conflicting: Value) -> Value {
    let mut items = existing.into_list();
    items.push(conflicting);
    Value::List(items)
}

/// Merge two rows so that every distinct contributed value survives.
///
/// Nested rows are entered one level deep; any remaining conflict turns both
/// sides into sequences and concatenates them, flattening one level. Run
/// [`keep_unique_column_values`] afterwards to drop repeats.
#[must_use]
pub fn merge_preserving_distincts(existing: Row, conflicting: Row) -> Row {
    let concat = |existing: Value, conflicting: Value, _column: &Key| {
        let mut items = existing.into_list();
        items.extend(conflicting.into_list());
        Value::List(items)
    };
    merge_recursive_custom(existing, conflicting, Some(&concat), Depth::Remaining(1))
}

/// De-duplicate every sequence-valued column (first occurrence wins) and
/// collapse single-element sequences back to scalars. Columns listed in
/// `excluded_columns` are left untouched.
#[must_use]
pub fn keep_unique_column_values(mut row: Row, excluded_columns: &[Key]) -> Row {
    for (column, values) in &mut row {
        if excluded_columns.contains(column) {
            continue;
        }
        let Value::List(items) = values else {
            continue;
        };

        let mut unique: Vec<Value> = std::mem::take(items)
            .into_iter()
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect();
        *values = if unique.len() == 1 {
            unique.remove(0)
        } else {
            Value::List(unique)
        };
    }
    row
}

/// Walk `row` and hand every entry to `replacer` before descending into it.
///
/// Nested rows and sequences are entered while `max_depth` allows; sequence
/// entries are addressed by their position.
pub fn replace_entries<F>(mut row: Row, mut replacer: F, max_depth: Depth) -> Row
where
    F: FnMut(&mut Value, &Key),
{
    replace_in_row(&mut row, &mut replacer, max_depth);
    row
}

fn replace_in_row<F>(row: &mut Row, replacer: &mut F, depth: Depth)
where
    F: FnMut(&mut Value, &Key),
{
    for (key, entry) in row.iter_mut() {
        visit(entry, key, replacer, depth);
    }
}

fn visit<F>(entry: &mut Value, key: &Key, replacer: &mut F, depth: Depth)
where
    F: FnMut(&mut Value, &Key),
{
    replacer(entry, key);
    if !depth.allows_descent() {
        return;
    }
    match entry {
        Value::Map(inner) => replace_in_row(inner, replacer, depth.decrement()),
        Value::List(items) => {
            for (i, item) in (0_i64..).zip(items.iter_mut()) {
                visit(item, &Key::Int(i), replacer, depth.decrement());
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(v: serde_json::Value) -> Row {
        Value::from(v).into_row().unwrap_or_default()
    }

    /// `Row` equality ignores column order; `Value::Map` equality does not.
    #[track_caller]
    fn assert_row(actual: Row, expected: serde_json::Value) {
        assert_eq!(Value::Map(actual), Value::from(expected));
    }

    #[test]
    fn zero_depth_accumulates_whole_nested_rows() {
        let out = merge_recursive_custom(
            row(json!({"a": {"b": 1}})),
            row(json!({"a": {"b": 2}})),
            None,
            Depth::Remaining(0),
        );
        assert_row(out, json!({"a": [{"b": 1}, {"b": 2}]}));
    }

    #[test]
    fn unlimited_depth_recurses_to_scalars() {
        let out = merge_recursive_custom(
            row(json!({"a": {"b": 1}})),
            row(json!({"a": {"b": 2}})),
            None,
            Depth::from(None),
        );
        assert_row(out, json!({"a": {"b": [1, 2]}}));
    }

    #[test]
    fn new_columns_land_after_existing_ones() {
        let out = merge_recursive_custom(
            row(json!({"a": 1, "b": {"x": 1}})),
            row(json!({"c": 3, "b": {"y": 2}, "a": 4})),
            None,
            Depth::Unlimited,
        );
        assert_row(out, json!({"a": [1, 4], "b": {"x": 1, "y": 2}, "c": 3}));
    }

    #[test]
    fn resolver_sees_column_and_both_sides() {
        let keep_max = |a: Value, b: Value, column: &Key| {
            assert_eq!(column, &Key::from("n"));
            if b.as_i64() > a.as_i64() { b } else { a }
        };
        let out = merge_recursive_custom(
            row(json!({"n": 3, "only_left": true})),
            row(json!({"n": 9, "only_right": null})),
            Some(&keep_max),
            Depth::Unlimited,
        );
        assert_row(out, json!({"n": 9, "only_left": true, "only_right": null}));
    }

    #[test]
    fn null_existing_cells_count_as_absent() {
        let out = merge_recursive_custom(row(json!({"x": null, "y": 1})), row(json!({"x": 4})), None, Depth::Unlimited);
        assert_row(out, json!({"x": 4, "y": 1}));
    }

    #[test]
    fn accumulation_keeps_extending_an_existing_sequence() {
        let out = merge_recursive_custom(row(json!({"x": [1, 2]})), row(json!({"x": 3})), None, Depth::Unlimited);
        assert_row(out, json!({"x": [1, 2, 3]}));
    }

    #[test]
    fn preserving_distincts_then_cleaning() {
        let merged = merge_preserving_distincts(row(json!({"x": 1, "k": "a"})), row(json!({"z": 0, "x": 2})));
        assert_row(merged.clone(), json!({"x": [1, 2], "k": "a", "z": 0}));

        let merged = merge_preserving_distincts(merged, row(json!({"x": [1, 3]})));
        assert_row(merged, json!({"x": [1, 2, 1, 3], "k": "a", "z": 0}));

        assert_row(keep_unique_column_values(row(json!({"x": [1, 1, 2]})), &[]), json!({"x": [1, 2]}));
        assert_row(keep_unique_column_values(row(json!({"x": [5]})), &[]), json!({"x": 5}));
    }

    #[test]
    fn excluded_columns_stay_as_sequences() {
        let out = keep_unique_column_values(row(json!({"y": [5, 5], "x": [5, 5]})), &[Key::from("y")]);
        assert_row(out, json!({"y": [5, 5], "x": 5}));
    }

    #[test]
    fn replace_entries_respects_depth() {
        let bump = |v: &mut Value, _k: &Key| {
            if let Some(i) = v.as_i64() {
                *v = Value::from(i + 1);
            }
        };
        let src = row(json!({"a": 1, "b": {"c": 1, "d": [1]}}));

        let shallow = replace_entries(src.clone(), bump, Depth::Remaining(0));
        assert_row(shallow, json!({"a": 2, "b": {"c": 1, "d": [1]}}));

        let deep = replace_entries(src, bump, Depth::Unlimited);
        assert_row(deep, json!({"a": 2, "b": {"c": 2, "d": [2]}}));
    }
}
