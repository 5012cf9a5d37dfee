//! Probing the ends of a collection and positioning its cursor.
//!
//! `first`, `last`, `first_key` and `last_key` borrow the collection
//! immutably, so the cursor is where it was once they return. Only
//! [`Collection::move_to`] repositions it.

use crate::error::{Result, TableError};
use crate::value::{Key, Value};
use crate::Collection;

fn require<T>(found: Option<T>, strict: bool, operation: &'static str) -> Result<Option<T>> {
    match found {
        None if strict => Err(TableError::EmptyCollection { operation }),
        found => Ok(found),
    }
}

impl Collection {
    /// The first row, or `None` on an empty collection.
    ///
    /// # Errors
    /// [`TableError::EmptyCollection`] when `strict` is set and there are no rows.
    pub fn first(&self, strict: bool) -> Result<Option<&Value>> {
        require(self.values().next(), strict, "first")
    }

    /// The last row, or `None` on an empty collection.
    ///
    /// # Errors
    /// [`TableError::EmptyCollection`] when `strict` is set and there are no rows.
    pub fn last(&self, strict: bool) -> Result<Option<&Value>> {
        require(self.values().next_back(), strict, "last")
    }

    /// # Errors
    /// [`TableError::EmptyCollection`] when `strict` is set and there are no rows.
    pub fn first_key(&self, strict: bool) -> Result<Option<&Key>> {
        require(self.keys().next(), strict, "first key")
    }

    /// # Errors
    /// [`TableError::EmptyCollection`] when `strict` is set and there are no rows.
    pub fn last_key(&self, strict: bool) -> Result<Option<&Key>> {
        require(self.keys().next_back(), strict, "last key")
    }

    /// Place the cursor on `key`.
    ///
    /// Without `strict`, an absent key leaves the cursor untouched.
    ///
    /// # Errors
    /// [`TableError::KeyNotFound`] when `strict` is set and `key` is absent.
    pub fn move_to(&mut self, key: &Key, strict: bool) -> Result<&mut Self> {
        match self.as_rows().get_index_of(key) {
            Some(position) => self.cursor = position,
            None if strict => return Err(TableError::KeyNotFound { key: key.clone() }),
            None => {}
        }
        Ok(self)
    }

    /// The row under the cursor, `None` past the end.
    #[must_use]
    pub fn current(&self) -> Option<&Value> {
        self.as_rows().get_index(self.cursor).map(|(_, row)| row)
    }

    #[must_use]
    pub fn current_key(&self) -> Option<&Key> {
        self.as_rows().get_index(self.cursor).map(|(key, _)| key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn probing_leaves_the_cursor_alone() -> Result<()> {
        let mut c = Collection::from(json!({"a": 1, "b": 2, "c": 3}));
        c.move_to(&"b".into(), true)?;

        let first = c.first(false)?.cloned();
        assert_eq!(c.last(false)?, Some(&Value::from(3)));
        assert_eq!(c.first(false)?.cloned(), first);
        assert_eq!(c.current_key(), Some(&Key::from("b")));
        Ok(())
    }

    #[test]
    fn strict_lookups_fail_on_empty() {
        let c = Collection::new();
        assert_eq!(c.first(false).ok(), Some(None));
        assert!(c.last_key(true).is_err_and(|e| e.is_empty_collection_error()));
    }

    #[test]
    fn moving_to_a_missing_key() -> Result<()> {
        let mut c = Collection::from(vec![10, 20]);
        c.move_to(&Key::Int(1), true)?;
        c.move_to(&Key::Int(7), false)?;
        assert_eq!(c.current(), Some(&Value::from(20)));

        let err = c.move_to(&Key::Int(7), true).unwrap_err();
        assert!(matches!(err, TableError::KeyNotFound { .. }));
        assert!(err.is_configuration_error());
        Ok(())
    }
}
