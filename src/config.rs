//! Formatting and policy knobs for composite ids and pivoting.

/// Separators used when composite ids are assembled.
///
/// The default produces ids such as `region:eu-year:2024`, with a mapping
/// prefix joined as `prefix_column`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdFormat {
    /// Placed between two `name:value` pairs.
    pub pair_separator: String,
    /// Placed between a part name and its value.
    pub name_value_separator: String,
    /// Placed between a descriptor prefix and the part name.
    pub prefix_separator: String,
}

impl Default for IdFormat {
    fn default() -> Self {
        Self {
            pair_separator: "-".into(),
            name_value_separator: ":".into(),
            prefix_separator: "_".into(),
        }
    }
}

impl IdFormat {
    /// Join `(name, value)` pairs in the given order.
    pub(crate) fn join<N, V, I>(&self, parts: I) -> String
    where
        N: std::fmt::Display,
        V: std::fmt::Display,
        I: IntoIterator<Item = (N, V)>,
    {
        parts
            .into_iter()
            .map(|(name, value)| format!("{name}{}{value}", self.name_value_separator))
            .collect::<Vec<_>>()
            .join(&self.pair_separator)
    }
}

/// What pivoting does when two leaves yield the same composite id.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IdCollision {
    /// The later leaf replaces the earlier one, keeping the earlier position.
    #[default]
    Overwrite,
    /// Fail with [`TableError::DuplicateRowId`](crate::TableError::DuplicateRowId).
    Fail,
}

/// Options for [`Collection::dimensions_as_columns_with`](crate::Collection::dimensions_as_columns_with).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PivotOptions {
    pub id_format: IdFormat,
    pub on_id_collision: IdCollision,
}

impl PivotOptions {
    /// Reject duplicate composite ids instead of overwriting.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            on_id_collision: IdCollision::Fail,
            ..Self::default()
        }
    }
}
