//! Row-wise reshaping: mapping, renaming columns, truncating, extracting.

use crate::value::{Key, Row, Value};
use crate::Collection;
use tracing::debug;

impl Collection {
    /// Replace every row with `row_transformer(row, key, whole_collection)`,
    /// keeping keys and order.
    #[must_use]
    pub fn each<F>(&self, row_transformer: F) -> Self
    where
        F: Fn(&Value, &Key, &Self) -> Value,
    {
        let out: Row = self
            .iter()
            .map(|(key, row)| (key.clone(), row_transformer(row, key, self)))
            .collect();
        self.return_constant(out)
    }

    /// Rename columns on every nested row, applying `old_to_new` pairs in order.
    ///
    /// A renamed column moves to the end of its row. Rows without the old
    /// column, and rows that are not nested rows, are left as they are.
    ///
    /// ```
    /// use rowtable::Collection;
    /// use serde_json::json;
    ///
    /// let c = Collection::from(json!([{"qty": 2, "sku": "a"}, {"sku": "b"}]));
    /// let renamed = c.rename_columns([("qty", "quantity")]);
    /// assert_eq!(renamed, Collection::from(json!([{"sku": "a", "quantity": 2}, {"sku": "b"}])));
    /// ```
    #[must_use]
    pub fn rename_columns<I, O, N>(&self, old_to_new: I) -> Self
    where
        I: IntoIterator<Item = (O, N)>,
        O: Into<Key>,
        N: Into<Key>,
    {
        let renames: Vec<(Key, Key)> = old_to_new
            .into_iter()
            .map(|(old, new)| (old.into(), new.into()))
            .collect();

        let mut out = self.as_rows().clone();
        for row in out.values_mut().filter_map(Value::as_map_mut) {
            for (old, new) in &renames {
                if let Some(cell) = row.shift_remove(old) {
                    row.insert(new.clone(), cell);
                }
            }
        }

        debug!(operation = "rename_columns", renames = renames.len(), rows = out.len(), "renamed columns");
        self.return_constant(out)
    }

    #[must_use]
    pub fn rename_column(&self, old_name: impl Into<Key>, new_name: impl Into<Key>) -> Self {
        self.rename_columns([(old_name.into(), new_name.into())])
    }

    /// The first `max` rows, in order.
    #[must_use]
    pub fn limit(&self, max: usize) -> Self {
        let out: Row = self
            .iter()
            .take(max)
            .map(|(key, row)| (key.clone(), row.clone()))
            .collect();
        self.return_constant(out)
    }

    /// Move every row matching `predicate(row, key)` out of the receiver and
    /// into the returned collection. Both keep their relative order.
    pub fn extract<P>(&mut self, mut predicate: P) -> Self
    where
        P: FnMut(&Value, &Key) -> bool,
    {
        let matching: Vec<Key> = self
            .iter()
            .filter(|(key, row)| predicate(row, key))
            .map(|(key, _)| key.clone())
            .collect();

        let mut out = Row::with_capacity(matching.len());
        for key in matching {
            if let Some(row) = self.remove(&key) {
                out.insert(key, row);
            }
        }

        debug!(operation = "extract", extracted = out.len(), remaining = self.len(), "extracted rows");
        self.return_constant(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn each_sees_the_whole_collection() {
        let c = Collection::from(vec![1, 2, 3]);
        let shares = c.each(|row, _key, all| {
            let total: i64 = all.values().filter_map(Value::as_i64).sum();
            Value::from(row.as_i64().unwrap_or(0) * 100 / total)
        });
        assert_eq!(shares, Collection::from(vec![16, 33, 50]));
    }

    #[test]
    fn limit_keeps_the_head() {
        let c = Collection::from(json!({"a": 1, "b": 2, "c": 3}));
        assert_eq!(c.limit(2), Collection::from(json!({"a": 1, "b": 2})));
        assert!(c.limit(0).is_empty());
        assert_eq!(c.limit(10), c);
    }

    #[test]
    fn extract_splits_the_receiver() {
        let mut c = Collection::from(vec![1, 2, 3, 4]);
        let even = c.extract(|row, _key| row.as_i64().is_some_and(|n| n % 2 == 0));
        assert_eq!(even, Collection::from(json!({"1": 2, "3": 4})));
        assert_eq!(c, Collection::from(json!({"0": 1, "2": 3})));
    }

    #[test]
    fn rename_chains_in_order() {
        let c = Collection::from(json!([{"a": 1}]));
        let out = c.rename_columns([("a", "b"), ("b", "c")]);
        assert_eq!(out, Collection::from(json!([{"c": 1}])));
        assert_eq!(c.rename_column("zzz", "y"), c);
    }
}
