//! Flattening nested collections: one nesting level per named dimension.
//!
//! A collection nested `n` levels deep (`country -> year -> row`) is walked down
//! `n` levels. The keys met on the way become columns of the leaf row, and the
//! leaf is stored under a composite id built from those keys in outer-to-inner
//! order:
//!
//! ```
//! use rowtable::{Collection, Value};
//! use serde_json::json;
//!
//! let sales = Collection::from(json!({
//!     "fr": {"2024": {"amount": 10}, "2025": {"amount": 12}},
//!     "de": {"2024": {"amount": 7}},
//! }));
//!
//! let flat = sales.dimensions_as_columns(&["country", "year"])?;
//! assert_eq!(
//!     flat.get(&"country:fr-year:2025".into()),
//!     Some(&Value::from(json!({"amount": 12, "country": "fr", "year": 2025}))),
//! );
//! assert_eq!(flat.len(), 3);
//! # Ok::<(), rowtable::TableError>(())
//! ```
//!
//! A scalar reached exactly at the last dimension becomes a row of its own,
//! holding the scalar under column `0` next to the dimension columns. A scalar
//! reached earlier is rejected.
//!
//! Two leaves producing the same id overwrite each other by default, unlike
//! [`Collection::group_by`], which fails on an unresolved collision; pass
//! [`PivotOptions::strict`] to fail here as well.

use crate::config::{IdCollision, PivotOptions};
use crate::error::{Result, TableError};
use crate::value::{Key, Row, Value};
use crate::Collection;
use std::collections::HashSet;
use tracing::debug;

/// Walk state: the options in force and the rows emitted so far.
struct Pivot<'a> {
    options: &'a PivotOptions,
    out: Row,
}

impl Pivot<'_> {
    fn descend(&mut self, data: Row, remaining: &[Key], path: &mut Vec<(Key, Key)>) -> Result<()> {
        let Some((current, rest)) = remaining.split_first() else {
            return self.emit(data, path);
        };

        for (key, child) in data {
            path.push((current.clone(), key));
            match child {
                // Sequences are one more level keyed by position, so `[0, "me"]`
                // under `name` yields `name:0` and `name:1`, not `name:me`.
                nested @ (Value::Map(_) | Value::List(_)) => {
                    self.descend(nested.into_row().unwrap_or_default(), rest, path)?;
                }
                scalar if rest.is_empty() => {
                    let mut row = Row::new();
                    row.insert(Key::Int(0), scalar);
                    self.emit(row, path)?;
                }
                scalar => {
                    return Err(TableError::ScalarBeforeLeaf {
                        path: self.row_id(path),
                        value: scalar,
                    });
                }
            }
            path.pop();
        }
        Ok(())
    }

    fn row_id(&self, path: &[(Key, Key)]) -> String {
        self.options
            .id_format
            .join(path.iter().map(|(name, value)| (name, value)))
    }

    fn emit(&mut self, mut data: Row, path: &[(Key, Key)]) -> Result<()> {
        let row_id = self.row_id(path);

        for (name, value) in path {
            let incoming = Value::from(value);
            match data.get(name) {
                Some(existing) if !existing.is_null() && *existing != incoming => {
                    return Err(TableError::DimensionCollision {
                        column: name.clone(),
                        row_id,
                        existing: existing.clone(),
                        incoming,
                    });
                }
                _ => {
                    data.insert(name.clone(), incoming);
                }
            }
        }

        let key = Key::from(row_id);
        if self.options.on_id_collision == IdCollision::Fail && self.out.contains_key(&key) {
            return Err(TableError::DuplicateRowId {
                row_id: key.to_string(),
            });
        }
        self.out.insert(key, Value::Map(data));
        Ok(())
    }
}

impl Collection {
    /// Flatten `dimension_names.len()` nesting levels into columns, with the
    /// default [`PivotOptions`].
    ///
    /// # Errors
    /// See [`Collection::dimensions_as_columns_with`].
    pub fn dimensions_as_columns<S: AsRef<str>>(&self, dimension_names: &[S]) -> Result<Self> {
        self.dimensions_as_columns_with(dimension_names, &PivotOptions::default())
    }

    /// Flatten `dimension_names.len()` nesting levels into columns.
    ///
    /// `dimension_names` names the levels from outermost to innermost.
    ///
    /// # Errors
    /// - [`TableError::DimensionCollision`] when a leaf already has a column
    ///   named like a dimension, holding a different value;
    /// - [`TableError::ScalarBeforeLeaf`] when a branch ends before the last
    ///   dimension;
    /// - [`TableError::InvalidInput`] when a dimension name is repeated;
    /// - [`TableError::DuplicateRowId`] for a repeated composite id under
    ///   [`IdCollision::Fail`].
    pub fn dimensions_as_columns_with<S: AsRef<str>>(
        &self,
        dimension_names: &[S],
        options: &PivotOptions,
    ) -> Result<Self> {
        let names: Vec<Key> = dimension_names.iter().map(|n| Key::from(n.as_ref())).collect();
        let mut seen = HashSet::new();
        if let Some(repeated) = names.iter().find(|name| !seen.insert(*name)) {
            return Err(TableError::invalid_input(
                "dimensions_as_columns",
                format!("dimension name '{repeated}' given twice"),
            ));
        }

        let mut pivot = Pivot {
            options,
            out: Row::new(),
        };
        pivot.descend(self.as_rows().clone(), &names, &mut Vec::new())?;

        debug!(
            operation = "dimensions_as_columns",
            dimensions = names.len(),
            rows_out = pivot.out.len(),
            "pivoted collection"
        );
        Ok(self.return_constant(pivot.out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalar_leaves_become_rows() -> Result<()> {
        let c = Collection::from(json!({"fr": {"2024": 10}}));
        let flat = c.dimensions_as_columns(&["country", "year"])?;
        let expected = Value::map([
            (Key::Int(0), Value::from(10)),
            (Key::from("country"), Value::from("fr")),
            (Key::from("year"), Value::from(2024)),
        ]);
        assert_eq!(flat.get(&"country:fr-year:2024".into()), Some(&expected));
        Ok(())
    }

    #[test]
    fn early_scalars_are_rejected() {
        let c = Collection::from(json!({"fr": 10}));
        let err = c.dimensions_as_columns(&["country", "year"]).unwrap_err();
        assert!(matches!(err, TableError::ScalarBeforeLeaf { ref path, .. } if path == "country:fr"));
    }

    #[test]
    fn repeated_dimension_names_are_rejected() {
        let c = Collection::from(json!({"a": {"b": {}}}));
        let err = c.dimensions_as_columns(&["x", "x"]).unwrap_err();
        assert!(err.is_configuration_error());
    }
}
