//! Error types for collection transforms.
//!
//! Every failure is raised synchronously where it is detected and carries the
//! offending keys and values, so a report is enough to diagnose the call without
//! re-running it. Failures fall into two kinds (see [`ErrorKind`]): the caller
//! combined arguments in a way that cannot work, or a strict accessor was asked
//! for an element of an empty collection.

use crate::value::{Key, Value};
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T, E = TableError> = std::result::Result<T, E>;

/// Coarse classification of a [`TableError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid combination of arguments or data shapes.
    Configuration,
    /// A strict `first`/`last`/`first_key`/`last_key` on an empty collection.
    EmptyCollection,
}

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum TableError {
    /// Two rows landed on the same destination and no resolver was supplied.
    #[error(
        "{operation} provoking a conflict has no conflict resolver defined:\n + key: {key}\n + index: {index}\n + existing: {existing}\n + conflict: {incoming}"
    )]
    UnresolvedConflict {
        operation: &'static str,
        /// Source key of the incoming row.
        key: Key,
        /// Destination key both rows compete for.
        index: Key,
        existing: Value,
        incoming: Value,
    },

    /// A group descriptor could not produce a part of a composite id.
    #[error("bad group descriptor {descriptor}: {reason}")]
    InvalidDescriptor { descriptor: String, reason: String },

    /// A dimension name already exists as a column holding another value.
    #[error(
        "trying to populate a column '{column}' of row '{row_id}' that already exists with a different value {existing} => '{incoming}'"
    )]
    DimensionCollision {
        column: Key,
        row_id: String,
        existing: Value,
        incoming: Value,
    },

    /// A scalar was reached while dimension names were still unassigned.
    #[error("scalar {value} reached at {path} before every dimension was named")]
    ScalarBeforeLeaf { path: String, value: Value },

    /// Two pivot leaves produced the same composite id under `IdCollision::Fail`.
    #[error("composite id '{row_id}' produced twice while pivoting")]
    DuplicateRowId { row_id: String },

    /// Input of the wrong shape for the requested operation.
    #[error("{operation}: {reason}")]
    InvalidInput { operation: &'static str, reason: String },

    /// `move_to` with `strict` on a key that is not in the collection.
    #[error("unable to move the internal pointer to a key that doesn't exist: {key}")]
    KeyNotFound { key: Key },

    #[error("no {operation} element found in this collection")]
    EmptyCollection { operation: &'static str },
}

impl TableError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyCollection { .. } => ErrorKind::EmptyCollection,
            _ => ErrorKind::Configuration,
        }
    }

    /// Check if the caller supplied an invalid combination of arguments
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(self.kind(), ErrorKind::Configuration)
    }

    /// Check if a strict accessor ran on an empty collection
    #[must_use]
    pub const fn is_empty_collection_error(&self) -> bool {
        matches!(self.kind(), ErrorKind::EmptyCollection)
    }

    /// Get the destination key if this is a collision error
    #[must_use]
    pub const fn conflicting_index(&self) -> Option<&Key> {
        match self {
            Self::UnresolvedConflict { index, .. } => Some(index),
            _ => None,
        }
    }

    pub(crate) fn invalid_input(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            operation,
            reason: reason.into(),
        }
    }
}
