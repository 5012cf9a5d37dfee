//! Assertion functions for comparing collections.

use crate::value::{Key, Value};
use crate::Collection;

/// Assert that two collections hold the same rows under the same keys, in the
/// same order.
///
/// # Panics
///
/// Panics on the first differing position, showing both sides in full.
///
/// # Example
///
/// ```
/// use rowtable::testing::assert_collections_equal;
/// use rowtable::Collection;
///
/// let actual = Collection::from(vec![1, 2, 3]);
/// assert_collections_equal(&actual, &Collection::from(vec![1, 2, 3]));
/// ```
pub fn assert_collections_equal(actual: &Collection, expected: &Collection) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "Collection length mismatch:\n  Expected length: {}\n  Actual length: {}\n  Expected: {}\n  Actual: {}",
        expected.len(),
        actual.len(),
        Value::from(expected),
        Value::from(actual),
    );

    for (i, ((ak, av), (ek, ev))) in actual.iter().zip(expected.iter()).enumerate() {
        assert!(
            ak == ek && av == ev,
            "Collection mismatch at position {i}:\n  Expected: {ek} => {ev}\n  Actual: {ak} => {av}\n  Full expected: {}\n  Full actual: {}",
            Value::from(expected),
            Value::from(actual),
        );
    }
}

/// Assert the exact key sequence of a collection.
///
/// # Panics
///
/// Panics if the keys differ in number, value, or order.
pub fn assert_keys_in_order<K>(actual: &Collection, expected: &[K])
where
    K: Clone + Into<Key>,
{
    let actual_keys: Vec<&Key> = actual.keys().collect();
    let expected_keys: Vec<Key> = expected.iter().cloned().map(Into::into).collect();
    assert!(
        actual_keys.iter().copied().eq(expected_keys.iter()),
        "Key order mismatch:\n  Expected: {expected_keys:?}\n  Actual: {actual_keys:?}"
    );
}

/// Assert that every row satisfies `predicate`.
///
/// # Panics
///
/// Panics naming the first row that fails.
pub fn assert_all_rows<F>(collection: &Collection, predicate: F)
where
    F: Fn(&Value) -> bool,
{
    for (key, row) in collection {
        assert!(predicate(row), "Row {key} does not satisfy the predicate: {row}");
    }
}
