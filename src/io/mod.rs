//! File adapters. The core never touches the filesystem; these are the only
//! entry points that do.

#[cfg_attr(docsrs, doc(cfg(feature = "io-json")))]
#[cfg(feature = "io-json")]
pub mod json;
