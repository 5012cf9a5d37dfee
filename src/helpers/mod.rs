pub(crate) mod cursor;
pub(crate) mod grouping;
pub(crate) mod merging;
pub(crate) mod pivot;
pub(crate) mod statistics;
pub(crate) mod transform;

// Only re-export the types callers name in their own signatures
pub use grouping::{Indexes, Resolver};
