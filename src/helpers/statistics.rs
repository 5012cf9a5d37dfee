//! Numeric summaries over columns: `weighted_mean`

use crate::value::Key;
use crate::Collection;

impl Collection {
    /// Mean of `value_column` weighted by `weight_column`.
    ///
    /// Only rows carrying both columns as numbers (numeric strings included)
    /// take part. A zero total weight produces `0.0`.
    ///
    /// ```
    /// use rowtable::Collection;
    /// use serde_json::json;
    ///
    /// let grades = Collection::from(json!([
    ///     {"grade": 10, "coef": 1},
    ///     {"grade": 16, "coef": 2},
    ///     {"grade": 4},
    /// ]));
    /// assert_eq!(grades.weighted_mean("grade", "coef"), 14.0);
    /// ```
    #[must_use]
    pub fn weighted_mean(&self, value_column: impl Into<Key>, weight_column: impl Into<Key>) -> f64 {
        let (value_column, weight_column) = (value_column.into(), weight_column.into());

        let (weighted_sum, total_weight) = self
            .values()
            .filter_map(|row| {
                let value = row.get(&value_column)?.as_f64()?;
                let weight = row.get(&weight_column)?.as_f64()?;
                Some((value, weight))
            })
            .fold((0.0, 0.0), |(sum, total), (value, weight)| {
                (value.mul_add(weight, sum), total + weight)
            });

        if total_weight == 0.0 {
            0.0
        } else {
            weighted_sum / total_weight
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn zero_weight_is_zero() {
        let c = Collection::from(json!([{"v": 3, "w": 0}]));
        assert!(c.weighted_mean("v", "w").abs() < f64::EPSILON);
        assert!(Collection::new().weighted_mean("v", "w").abs() < f64::EPSILON);
    }

    #[test]
    fn numeric_strings_count() {
        let c = Collection::from(json!([{"v": "2.5", "w": 2}, {"v": 1, "w": "2"}]));
        assert!((c.weighted_mean("v", "w") - 1.75).abs() < 1e-12);
    }
}
