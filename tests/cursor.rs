mod common;

use anyhow::Result;
use rowtable::{Collection, Key, TableError, Value};
use serde_json::json;

#[test]
fn probing_restores_the_cursor() -> Result<()> {
    let mut c = Collection::from(json!({"a": 1, "b": 2, "c": 3}));
    c.move_to(&"c".into(), true)?;

    let first = c.first(false)?.cloned();
    let last = c.last(false)?.cloned();
    assert_eq!(c.first(false)?.cloned(), first);
    assert_eq!(first, Some(Value::from(1)));
    assert_eq!(last, Some(Value::from(3)));
    assert_eq!(c.first_key(true)?, Some(&Key::from("a")));
    assert_eq!(c.last_key(true)?, Some(&Key::from("c")));

    assert_eq!(c.current_key(), Some(&Key::from("c")));
    assert_eq!(c.current(), Some(&Value::from(3)));
    Ok(())
}

#[test]
fn empty_collections() {
    let c = Collection::new();
    assert!(matches!(c.first(false), Ok(None)));
    assert!(matches!(c.last_key(false), Ok(None)));
    for err in [c.first(true).unwrap_err(), c.last(true).unwrap_err()] {
        assert!(err.is_empty_collection_error());
    }
    assert!(matches!(
        c.first_key(true),
        Err(TableError::EmptyCollection { operation: "first key" })
    ));
    assert_eq!(c.current(), None);
}

#[test]
fn results_start_at_their_first_row() -> Result<()> {
    let mut c = Collection::from(vec!["x", "y", "z"]);
    c.move_to(&Key::Int(2), true)?;
    let head = c.limit(2);
    assert_eq!(head.current_key(), Some(&Key::Int(0)));
    assert_eq!(c.current_key(), Some(&Key::Int(2)));
    Ok(())
}

#[test]
fn strict_move_to_unknown_key() {
    let mut c = Collection::from(vec![1]);
    let err = c.move_to(&"missing".into(), true).unwrap_err();
    assert!(err.to_string().contains("missing"));
    assert!(c.move_to(&"missing".into(), false).is_ok());
    assert_eq!(c.current_key(), Some(&Key::Int(0)));
}
