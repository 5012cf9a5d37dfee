//! Testing utilities for code built on collections.
//!
//! - **Assertions**: order-sensitive comparisons with readable failure output
//! - **Fixtures**: small sales datasets, flat and nested, shared by the crate's
//!   own tests and usable in yours
//!
//! # Quick Start
//!
//! ```
//! use rowtable::testing::*;
//! use rowtable::Value;
//!
//! # fn main() -> rowtable::Result<()> {
//! let sales = sample_sales();
//! let by_region = sales.group_in_arrays(|_key, row| {
//!     row.get(&"region".into()).cloned().unwrap_or_default()
//! });
//!
//! assert_keys_in_order(&by_region, &["eu", "us"]);
//! assert_all_rows(&by_region, |group| group.as_map().is_some_and(|m| !m.is_empty()));
//! # Ok(())
//! # }
//! ```

pub mod assertions;
pub mod fixtures;

pub use assertions::*;
pub use fixtures::*;
