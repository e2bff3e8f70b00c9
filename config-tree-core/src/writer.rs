use std::fs;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while writing a configuration tree.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to serialize JSON bytes.
    #[error("failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Failed to write output file.
    #[error("failed to write JSON file: {0}")]
    Io(#[from] std::io::Error),
}

/// Serialize a tree into pretty-printed JSON bytes with a trailing newline.
pub fn write(node: &Value) -> Result<Vec<u8>, WriteError> {
    let mut bytes = serde_json::to_vec_pretty(node)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Serialize a tree and write it to `path`.
pub fn write_file(node: &Value, path: &Path) -> Result<(), WriteError> {
    let bytes = write(node)?;
    fs::write(path, bytes)?;
    Ok(())
}
