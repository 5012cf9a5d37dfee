//! JSON and JSON Lines persistence for [`Collection`]s.
//!
//! - [`read_json_collection`] / [`write_json_collection`]: one document, an
//!   object (keys kept, in file order) or an array (keys `0..n`);
//! - [`read_jsonl_rows`] / [`write_jsonl_rows`]: one row per line, keys
//!   dropped on write and renumbered `0..n` on read.
//!
//! Blank lines are skipped on read. Parent directories are created on write.

use crate::value::Value;
use crate::Collection;
use anyhow::{Context, Result, bail};
use std::fs::{File, create_dir_all};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        create_dir_all(parent).with_context(|| format!("mkdir -p {}", parent.display()))?;
    }
    Ok(())
}

/// Read a whole JSON document into a collection.
///
/// # Errors
/// Returns an error if the file cannot be opened or parsed, or if the document
/// is a scalar rather than an object or an array.
pub fn read_json_collection(path: impl AsRef<Path>) -> Result<Collection> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let doc: serde_json::Value = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse JSON document {}", path.display()))?;
    if !(doc.is_object() || doc.is_array()) {
        bail!("{}: expected a JSON object or array, found {doc}", path.display());
    }

    let collection = Collection::from(doc);
    debug!(path = %path.display(), rows = collection.len(), "read JSON collection");
    Ok(collection)
}

/// Write a collection as a single JSON object, keys included.
///
/// # Returns
/// The number of rows written.
///
/// # Errors
/// Returns an error if the file/dirs cannot be created or the document fails
/// to serialize/flush.
pub fn write_json_collection(path: impl AsRef<Path>, collection: &Collection) -> Result<usize> {
    let path = path.as_ref();
    create_parent(path)?;
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, collection)
        .with_context(|| format!("serialize collection to {}", path.display()))?;
    w.write_all(b"\n")?;
    w.flush()?;
    Ok(collection.len())
}

/// Read a JSONL file, one row per non-empty line.
///
/// # Errors
/// Returns an error if the file cannot be opened or read, or if any line fails
/// to parse. Errors carry the line number.
pub fn read_jsonl_rows(path: impl AsRef<Path>) -> Result<Collection> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut rows = Vec::<Value>::new();
    for (idx, line) in BufReader::new(f).lines().enumerate() {
        let line = line.with_context(|| format!("read line {} in {}", idx + 1, path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        let row: serde_json::Value = serde_json::from_str(&line).with_context(|| {
            format!("parse JSONL line {} in {}: {}", idx + 1, path.display(), line)
        })?;
        rows.push(row.into());
    }

    debug!(path = %path.display(), rows = rows.len(), "read JSONL rows");
    Ok(Collection::from(rows))
}

/// Write every row as one compact JSON line, in collection order.
///
/// # Returns
/// The number of rows written.
///
/// # Errors
/// Returns an error if the file/dirs cannot be created or any row fails to
/// serialize/flush.
pub fn write_jsonl_rows(path: impl AsRef<Path>, collection: &Collection) -> Result<usize> {
    let path = path.as_ref();
    create_parent(path)?;
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(f);
    for (i, (key, row)) in collection.iter().enumerate() {
        serde_json::to_writer(&mut w, &serde_json::Value::from(row.clone()))
            .with_context(|| format!("serialize row #{i} (key {key}) to {}", path.display()))?;
        w.write_all(b"\n")?;
    }
    w.flush()?;
    Ok(collection.len())
}
