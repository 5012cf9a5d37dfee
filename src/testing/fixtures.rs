//! Pre-built datasets for tests and examples.

use crate::Collection;
use serde_json::json;

/// Flat sales rows keyed `0..6`: `region`, `year`, `seller`, `amount`.
///
/// Regions appear as `eu` first, then `us`; `ana` sells in both.
///
/// # Example
///
/// ```
/// use rowtable::testing::sample_sales;
///
/// let sales = sample_sales();
/// assert_eq!(sales.len(), 6);
/// ```
#[must_use]
pub fn sample_sales() -> Collection {
    Collection::from(json!([
        {"region": "eu", "year": 2024, "seller": "ana", "amount": 120},
        {"region": "us", "year": 2024, "seller": "bo", "amount": 80},
        {"region": "eu", "year": 2025, "seller": "cy", "amount": 45},
        {"region": "eu", "year": 2024, "seller": "bo", "amount": 30},
        {"region": "us", "year": 2025, "seller": "ana", "amount": 95},
        {"region": "eu", "year": 2025, "seller": "ana", "amount": 60},
    ]))
}

/// The same figures nested as `region -> year -> seller -> {amount}`,
/// ready to flatten with three dimension names.
#[must_use]
pub fn nested_sales() -> Collection {
    Collection::from(json!({
        "eu": {
            "2024": {"ana": {"amount": 120}, "bo": {"amount": 30}},
            "2025": {"cy": {"amount": 45}, "ana": {"amount": 60}},
        },
        "us": {
            "2024": {"bo": {"amount": 80}},
            "2025": {"ana": {"amount": 95}},
        },
    }))
}
