use rowtable::{Key, Value};
use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("rowtable=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

/// Read an integer column, `0` when missing.
#[allow(dead_code)]
pub fn int(row: &Value, column: &str) -> i64 {
    row.get(&Key::from(column)).and_then(Value::as_i64).unwrap_or(0)
}

/// The `region` column, used as a grouping index by several tests.
#[allow(dead_code)]
pub fn region(_key: &Key, row: &Value) -> Value {
    row.get(&"region".into()).cloned().unwrap_or_default()
}
