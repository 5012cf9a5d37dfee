//! # Rowtable
//!
//! **Reshaping for ordered, keyed row collections.** A [`Collection`] is an
//! insertion-ordered map from key to row, where a row is a nested, JSON-like
//! [`Value`]. Rowtable groups, merges and flattens such collections while
//! keeping their order stable.
//!
//! ## Key Features
//!
//! - **Grouping** - under computed indexes, with caller-supplied collision resolvers
//! - **Recursive row merging** - column by column, depth-limited, accumulating or custom
//! - **Collection merging** - by key, pure or in place, one or several at a time
//! - **Dimensional pivot** - flatten `n` nesting levels into columns and composite ids
//! - **Composite group ids** - deterministic ids from column, position or function parts
//! - **Cursor lookups** - `first`/`last` and friends that never lose the cursor
//! - **JSON I/O** - whole documents and JSON Lines (feature `io-json`)
//!
//! ## Quick Start
//!
//! ```
//! use rowtable::*;
//! use serde_json::json;
//!
//! # fn main() -> rowtable::Result<()> {
//! let sales = Collection::from(json!([
//!     {"region": "eu", "year": 2024, "amount": 10},
//!     {"region": "eu", "year": 2024, "amount": 5},
//!     {"region": "us", "year": 2025, "amount": 7},
//! ]));
//!
//! let groups = Groups::new().column("region").column("year");
//! let totals = sales.group_by(
//!     |_key, row| generate_group_id(row, &groups).unwrap_or_default(),
//!     Some(&|_id: &Key, existing: Value, incoming: Value| {
//!         let sum = existing.get(&"amount".into()).and_then(Value::as_i64).unwrap_or(0)
//!             + incoming.get(&"amount".into()).and_then(Value::as_i64).unwrap_or(0);
//!         let mut row = existing.into_row().unwrap_or_default();
//!         row.insert("amount".into(), sum.into());
//!         Value::Map(row)
//!     }),
//! )?;
//!
//! assert_eq!(totals.len(), 2);
//! assert_eq!(
//!     totals.first(true)?.and_then(|row| row.get(&"amount".into())),
//!     Some(&Value::from(15)),
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Concepts
//!
//! ### Collections are values
//!
//! Transforms borrow their receiver and return a fresh [`Collection`]. Only
//! `merge_in`, `append`, `extract` and `move_to` take `&mut self`.
//!
//! ### Resolvers decide collisions
//!
//! Whenever two rows compete for the same key, the operation asks a resolver
//! for the value to store. Operations that cannot pick a sensible default fail
//! with [`TableError::UnresolvedConflict`] instead of silently dropping data.
//!
//! ### Logging
//!
//! Operations emit [`tracing`] events (`debug` per operation, `trace` per
//! resolved collision). No subscriber is installed by the library.
//!
//! ## Module Overview
//!
//! - [`collection`] - The `Collection` container and its conversions
//! - [`value`] - `Key`, `Value` and `Row`
//! - [`merge`] - Row-level recursive merging and clean-up
//! - [`group_id`] - Composite group id generation
//! - [`config`] - Id separators and pivot options
//! - [`error`] - `TableError` and the crate `Result`
//! - [`io`] - JSON and JSON Lines adapters
//! - [`testing`] - Assertions and fixtures for tests

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod collection;
pub mod config;
pub mod error;
pub mod group_id;
pub mod helpers;
pub mod io;
pub mod merge;
pub mod testing;
pub mod value;

// General re-exports
pub use collection::Collection;
pub use config::{IdCollision, IdFormat, PivotOptions};
pub use error::{ErrorKind, Result, TableError};
pub use group_id::{GroupDescriptor, Groups, generate_group_id, generate_group_id_with};
pub use helpers::*;
pub use merge::{
    ColumnResolver, Depth, keep_unique_column_values, merge_preserving_distincts,
    merge_recursive_custom, replace_entries,
};
pub use value::{Key, Row, Value};

// Gated re-exports
#[cfg(feature = "io-json")]
pub use io::json::{read_json_collection, read_jsonl_rows, write_json_collection, write_jsonl_rows};
