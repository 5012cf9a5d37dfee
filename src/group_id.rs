//! Deterministic composite ids built from a row and a list of group descriptors.
//!
//! A composite id identifies "the group a row belongs to" as a plain string, so
//! it can be used directly as a [`Key`] by [`Collection::group_by`](crate::Collection::group_by)
//! and friends. Each descriptor contributes one `name:value` part; parts are
//! **sorted by name** before being joined, so the same logical group always
//! yields the same id no matter in which order its descriptors were declared.
//!
//! # Example
//! ```
//! use rowtable::{generate_group_id, GroupDescriptor, Groups, Value};
//! use serde_json::json;
//!
//! let row = Value::from(json!({"year": 2024, "region": "eu", "amount": 12}));
//!
//! let groups = Groups::new()
//!     .column("year")
//!     .column("region")
//!     .prefixed("size", GroupDescriptor::named_function("bucket", |row: &Value| {
//!         let big = row.get(&"amount".into()).and_then(Value::as_i64).unwrap_or(0) > 10;
//!         (Value::from(if big { "big" } else { "small" }), None)
//!     }));
//!
//! let id = generate_group_id(&row, &groups)?;
//! assert_eq!(id, "region:eu-size_bucket:big-year:2024");
//! # Ok::<(), rowtable::TableError>(())
//! ```

use crate::config::IdFormat;
use crate::error::{Result, TableError};
use crate::value::{Key, Value};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A descriptor function: receives the row and returns the part value plus an
/// optional replacement for the part name.
pub type DescriptorFn = Arc<dyn Fn(&Value) -> (Value, Option<String>) + Send + Sync>;

/// How one part of a composite id is derived from a row.
#[derive(Clone)]
pub enum GroupDescriptor {
    /// Value of a named column; the column name is the part name.
    ByColumn(String),
    /// Value of an integer column; the position is the part name.
    ByPosition(usize),
    /// Value computed by a function; `name` is the default part name.
    ByFunction { func: DescriptorFn, name: String },
}

impl GroupDescriptor {
    pub fn column(name: impl Into<String>) -> Self {
        Self::ByColumn(name.into())
    }

    #[must_use]
    pub const fn position(index: usize) -> Self {
        Self::ByPosition(index)
    }

    /// An anonymous function descriptor. Its part name is
    /// `unnamed-closure-<hash>`, where the hash is derived from the closure's
    /// type and is therefore stable for a given closure in a given build.
    pub fn function<F>(func: F) -> Self
    where
        F: Fn(&Value) -> (Value, Option<String>) + Send + Sync + 'static,
    {
        Self::ByFunction {
            func: Arc::new(func),
            name: unnamed_hint::<F>(),
        }
    }

    /// A function descriptor with a declared part name.
    pub fn named_function<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Value) -> (Value, Option<String>) + Send + Sync + 'static,
    {
        Self::ByFunction {
            func: Arc::new(func),
            name: name.into(),
        }
    }

    /// A function descriptor named after a `(owner, method)` pair, giving
    /// `owner::method`.
    pub fn method<F>(owner: &str, method: &str, func: F) -> Self
    where
        F: Fn(&Value) -> (Value, Option<String>) + Send + Sync + 'static,
    {
        Self::named_function([owner, method].join("::"), func)
    }
}

impl fmt::Debug for GroupDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByColumn(name) => f.debug_tuple("ByColumn").field(name).finish(),
            Self::ByPosition(index) => f.debug_tuple("ByPosition").field(index).finish(),
            Self::ByFunction { name, .. } => {
                f.debug_struct("ByFunction").field("name", name).finish_non_exhaustive()
            }
        }
    }
}

fn unnamed_hint<F>() -> String {
    let digest = Sha256::digest(std::any::type_name::<F>().as_bytes());
    let hex: String = digest.iter().take(4).map(|b| format!("{b:02x}")).collect();
    format!("unnamed-closure-{hex}")
}

/// An ordered list of descriptors, each optionally carrying a name prefix.
#[derive(Clone, Debug, Default)]
pub struct Groups {
    entries: Vec<(Option<String>, GroupDescriptor)>,
}

impl Groups {
    #[must_use]
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    #[must_use]
    pub fn push(mut self, descriptor: GroupDescriptor) -> Self {
        self.entries.push((None, descriptor));
        self
    }

    /// Add a descriptor whose part name is prefixed with `prefix_`.
    #[must_use]
    pub fn prefixed(mut self, prefix: impl Into<String>, descriptor: GroupDescriptor) -> Self {
        self.entries.push((Some(prefix.into()), descriptor));
        self
    }

    #[must_use]
    pub fn column(self, name: impl Into<String>) -> Self {
        self.push(GroupDescriptor::column(name))
    }

    #[must_use]
    pub fn position(self, index: usize) -> Self {
        self.push(GroupDescriptor::position(index))
    }

    #[must_use]
    pub fn function<F>(self, func: F) -> Self
    where
        F: Fn(&Value) -> (Value, Option<String>) + Send + Sync + 'static,
    {
        self.push(GroupDescriptor::function(func))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Option<&str>, &GroupDescriptor)> {
        self.entries.iter().map(|(p, d)| (p.as_deref(), d))
    }
}

impl FromIterator<GroupDescriptor> for Groups {
    fn from_iter<I: IntoIterator<Item = GroupDescriptor>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|d| (None, d)).collect(),
        }
    }
}

impl<P: Into<String>> FromIterator<(P, GroupDescriptor)> for Groups {
    fn from_iter<I: IntoIterator<Item = (P, GroupDescriptor)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(p, d)| (Some(p.into()), d)).collect(),
        }
    }
}

/// Build the composite id of `row` with the default [`IdFormat`].
///
/// # Errors
/// [`TableError::InvalidDescriptor`] when a column or position descriptor
/// names a column the row does not have, or the row is a scalar.
pub fn generate_group_id(row: &Value, groups: &Groups) -> Result<String> {
    generate_group_id_with(row, groups, &IdFormat::default())
}

/// Build the composite id of `row` with explicit separators.
///
/// A function descriptor may return a replacement part name; the replacement
/// takes the place of the descriptor's own name, after any prefix. Parts that
/// end up with the same name keep the value of the last one.
///
/// # Errors
/// See [`generate_group_id`].
pub fn generate_group_id_with(row: &Value, groups: &Groups, format: &IdFormat) -> Result<String> {
    let mut parts: BTreeMap<String, Value> = BTreeMap::new();

    for (prefix, descriptor) in groups.iter() {
        let mut part_name = prefix
            .map(|p| format!("{p}{}", format.prefix_separator))
            .unwrap_or_default();

        let part_value = match descriptor {
            GroupDescriptor::ByColumn(name) => {
                part_name.push_str(name);
                lookup(row, &Key::from(name), descriptor)?
            }
            GroupDescriptor::ByPosition(index) => {
                part_name.push_str(&index.to_string());
                let key = i64::try_from(*index).map(Key::Int).map_err(|_| {
                    TableError::InvalidDescriptor {
                        descriptor: format!("{descriptor:?}"),
                        reason: "position does not fit an integer key".into(),
                    }
                })?;
                lookup(row, &key, descriptor)?
            }
            GroupDescriptor::ByFunction { func, name } => {
                let (value, rename) = func(row);
                part_name.push_str(rename.as_deref().unwrap_or(name));
                value
            }
        };

        parts.insert(part_name, part_value);
    }

    Ok(format.join(parts))
}

fn lookup(row: &Value, key: &Key, descriptor: &GroupDescriptor) -> Result<Value> {
    if row.is_scalar() {
        return Err(TableError::InvalidDescriptor {
            descriptor: format!("{descriptor:?}"),
            reason: format!("row is a {} and has no columns: {row}", row.type_name()),
        });
    }
    row.get(key)
        .cloned()
        .ok_or_else(|| TableError::InvalidDescriptor {
            descriptor: format!("{descriptor:?}"),
            reason: format!("column '{key}' is missing from row {row}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        Value::from(json!({"a": 1, "b": "x", "0": "first"}))
    }

    #[test]
    fn descriptor_order_does_not_change_the_id() -> Result<()> {
        let row = sample();
        let ba: Groups = [("b", GroupDescriptor::column("b")), ("a", GroupDescriptor::column("a"))]
            .into_iter()
            .collect();
        let ab: Groups = [("a", GroupDescriptor::column("a")), ("b", GroupDescriptor::column("b"))]
            .into_iter()
            .collect();
        assert_eq!(generate_group_id(&row, &ba)?, generate_group_id(&row, &ab)?);
        assert_eq!(generate_group_id(&row, &ab)?, "a_a:1-b_b:x");
        Ok(())
    }

    #[test]
    fn position_descriptor_reads_integer_column() -> Result<()> {
        let id = generate_group_id(&sample(), &Groups::new().position(0).column("b"))?;
        assert_eq!(id, "0:first-b:x");
        Ok(())
    }

    #[test]
    fn unnamed_functions_get_a_stable_hash_name() -> Result<()> {
        let groups = Groups::new().function(|_row: &Value| (Value::from(7), None));
        let first = generate_group_id(&sample(), &groups)?;
        let second = generate_group_id(&sample(), &groups)?;
        assert_eq!(first, second);
        assert!(first.starts_with("unnamed-closure-"));
        assert!(first.ends_with(":7"));
        Ok(())
    }

    #[test]
    fn functions_may_rename_their_part() -> Result<()> {
        let groups = Groups::new().prefixed(
            "p",
            GroupDescriptor::method("Stats", "parity", |row: &Value| {
                let odd = row.get(&"a".into()).and_then(Value::as_i64).unwrap_or(0) % 2 == 1;
                (Value::from(odd), Some("odd".to_string()))
            }),
        );
        assert_eq!(generate_group_id(&sample(), &groups)?, "p_odd:true");
        Ok(())
    }

    #[test]
    fn missing_column_is_a_configuration_error() {
        let err = generate_group_id(&sample(), &Groups::new().column("nope")).unwrap_err();
        assert!(err.is_configuration_error());
        assert!(err.to_string().contains("nope"));

        let err = generate_group_id(&Value::from(3), &Groups::new().column("a")).unwrap_err();
        assert!(matches!(err, TableError::InvalidDescriptor { .. }));
    }
}
