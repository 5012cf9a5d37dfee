//! Merging whole collections by their own keys.
//!
//! Unlike grouping, no index is computed: two rows collide only when they share
//! a key. Everything that can be turned into a [`Collection`] is accepted as the
//! other side (another collection, a reference to one, a `Vec`, a JSON value),
//! so shape normalisation happens once, at the call boundary.
//!
//! - [`Collection::merge_with`] - pure; returns a new collection
//! - [`Collection::merge_in`] - the receiver becomes `other.merge_with(receiver)`
//! - [`Collection::merge_several_with`] - left fold of `merge_with`
//! - [`Collection::append`] - in place; unresolved collisions get a fresh integer key

use crate::error::Result;
use crate::helpers::grouping::{Resolver, place};
use crate::value::Key;
use crate::Collection;
use tracing::{debug, trace};

impl Collection {
    /// Merge `other` into a copy of `self`.
    ///
    /// Keys only present on one side are kept in order (receiver's first, then
    /// the new ones from `other`). A shared key is resolved with
    /// `conflict_resolver(key, existing, incoming)`; neither operand is modified.
    ///
    /// # Errors
    /// [`TableError::UnresolvedConflict`](crate::TableError::UnresolvedConflict)
    /// on a shared key without a resolver.
    ///
    /// # Example
    /// ```
    /// use rowtable::{Collection, Key, Value};
    /// use serde_json::json;
    ///
    /// let stock = Collection::from(json!({"apple": 3, "pear": 1}));
    /// let delivery = Collection::from(json!({"pear": 4, "plum": 2}));
    ///
    /// let sum = |_key: &Key, a: Value, b: Value| {
    ///     Value::from(a.as_i64().unwrap_or(0) + b.as_i64().unwrap_or(0))
    /// };
    /// let total = stock.merge_with(&delivery, Some(&sum))?;
    /// assert_eq!(total, Collection::from(json!({"apple": 3, "pear": 5, "plum": 2})));
    /// # Ok::<(), rowtable::TableError>(())
    /// ```
    pub fn merge_with(
        &self,
        other: impl Into<Self>,
        conflict_resolver: Option<Resolver<'_>>,
    ) -> Result<Self> {
        let other: Self = other.into();
        let incoming = other.len();
        let mut out = self.as_rows().clone();
        for (key, row) in other {
            place(&mut out, "merge_with", &key, key.clone(), row, conflict_resolver)?;
        }

        debug!(operation = "merge_with", rows_in = self.len(), incoming, rows_out = out.len(), "merged collections");
        Ok(self.return_constant(out))
    }

    /// Merge the receiver into `other` and keep the result in the receiver.
    ///
    /// Equivalent to `*self = other.merge_with(self)`: rows of `other` come
    /// first and the resolver sees `other`'s row as `existing`. The cursor is
    /// reset to the first row.
    ///
    /// # Errors
    /// Same as [`Collection::merge_with`]; on error the receiver is unchanged.
    pub fn merge_in(
        &mut self,
        other: impl Into<Self>,
        conflict_resolver: Option<Resolver<'_>>,
    ) -> Result<&mut Self> {
        let other: Self = other.into();
        let merged = other.merge_with(&*self, conflict_resolver)?;
        self.replace_rows(merged.into_rows());
        Ok(self)
    }

    /// Fold [`Collection::merge_with`] over `others`, left to right.
    ///
    /// # Errors
    /// The first unresolved collision met.
    pub fn merge_several_with<I, C>(
        &self,
        others: I,
        conflict_resolver: Option<Resolver<'_>>,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<Self>,
    {
        others
            .into_iter()
            .try_fold(self.return_constant(self.as_rows().clone()), |acc, other| {
                acc.merge_with(other, conflict_resolver)
            })
    }

    /// Append `new_rows` to the receiver in place.
    ///
    /// Free keys are inserted directly. For an occupied key the receiver
    /// stores `conflict_resolver(key, existing, incoming)`, or, without a
    /// resolver, keeps the existing row and adds the incoming one under the
    /// next free integer key.
    ///
    /// # Example
    /// ```
    /// use rowtable::{Collection, Key, Value};
    ///
    /// let mut log = Collection::from(vec!["boot", "login"]);
    /// log.append(vec!["logout"], None);
    /// assert_eq!(log.get(&Key::Int(2)), Some(&Value::from("logout")));
    /// ```
    pub fn append(
        &mut self,
        new_rows: impl Into<Self>,
        conflict_resolver: Option<Resolver<'_>>,
    ) -> &mut Self {
        let new_rows: Self = new_rows.into();
        let incoming = new_rows.len();
        for (key, new_row) in new_rows {
            let Some(existing) = self.get_mut(&key) else {
                self.insert(key, new_row);
                continue;
            };
            match conflict_resolver {
                Some(resolve) => {
                    trace!(operation = "append", %key, "resolving conflict");
                    let current = std::mem::take(existing);
                    *existing = resolve(&key, current, new_row);
                }
                None => {
                    let fresh: Key = self.next_free_index();
                    trace!(operation = "append", %key, %fresh, "re-keying colliding row");
                    self.insert(fresh, new_row);
                }
            }
        }

        debug!(operation = "append", incoming, rows_out = self.len(), "appended rows");
        self
    }
}

#[cfg(test)]
mod tests {
    use crate::{Collection, Key, Value};
    use serde_json::json;

    #[test]
    fn merge_in_puts_the_other_side_first() -> crate::Result<()> {
        let mut receiver = Collection::from(json!({"a": 1, "b": 2}));
        let other = Collection::from(json!({"b": 20, "c": 30}));
        let keep_existing = |_k: &Key, existing: Value, _incoming: Value| existing;

        receiver.merge_in(other, Some(&keep_existing))?;
        assert_eq!(receiver, Collection::from(json!({"b": 20, "c": 30, "a": 1})));
        Ok(())
    }

    #[test]
    fn merge_in_leaves_the_receiver_alone_on_error() {
        let mut receiver = Collection::from(json!({"a": 1}));
        let before = receiver.clone();
        assert!(receiver.merge_in(json!({"a": 2}), None).is_err());
        assert_eq!(receiver, before);
    }
}
