mod common;

use anyhow::Result;
use common::int;
use rowtable::testing::{assert_all_rows, assert_collections_equal, sample_sales};
use rowtable::{Collection, Key, Value};
use serde_json::json;

#[test]
fn each_keeps_keys() {
    let doubled = sample_sales().each(|row, _key, _all| Value::from(int(row, "amount") * 2));
    assert_eq!(doubled.keys().cloned().collect::<Vec<_>>(), (0..6).map(Key::Int).collect::<Vec<_>>());
    assert_eq!(doubled.first(false).ok().flatten(), Some(&Value::from(240)));
}

#[test]
fn rename_columns_on_every_row() {
    let renamed = sample_sales().rename_columns([("amount", "total"), ("seller", "who")]);
    assert_all_rows(&renamed, |row| {
        row.get(&"total".into()).is_some()
            && row.get(&"who".into()).is_some()
            && row.get(&"amount".into()).is_none()
    });
}

#[test]
fn rename_skips_scalars_and_missing_columns() {
    let c = Collection::from(json!([{"a": 1}, 7, {"b": 2}]));
    let renamed = c.rename_column("a", "z");
    assert_collections_equal(&renamed, &Collection::from(json!([{"z": 1}, 7, {"b": 2}])));
}

#[test]
fn limit_then_extract() -> Result<()> {
    let mut head = sample_sales().limit(4);
    let us = head.extract(|row, _key| row.get(&"region".into()) == Some(&Value::from("us")));

    assert_eq!(us.len(), 1);
    assert_eq!(us.first_key(true)?, Some(&Key::Int(1)));
    assert_eq!(head.keys().cloned().collect::<Vec<_>>(), vec![Key::Int(0), Key::Int(2), Key::Int(3)]);
    Ok(())
}

#[test]
fn weighted_mean_over_sales() {
    let c = Collection::from(json!([
        {"price": 10, "qty": 3},
        {"price": 20, "qty": 1},
        {"price": 99},
    ]));
    assert!((c.weighted_mean("price", "qty") - 12.5).abs() < 1e-12);
}

#[test]
fn container_basics() {
    let mut c = Collection::new();
    assert!(c.is_empty());
    c.insert("a", 1);
    c.insert(5, json!({"x": true}));
    assert!(c.is_assoc());
    assert!(c.contains(&Value::from(1)));
    assert_eq!(c.remove(&"a".into()), Some(Value::from(1)));
    assert_eq!(c.len(), 1);
    assert!(c.contains_key(&Key::Int(5)));
}
