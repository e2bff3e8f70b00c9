use std::fs;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while loading a configuration tree.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Input could not be decoded as JSON.
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Failed to read input file.
    #[error("failed to read JSON file: {0}")]
    Io(#[from] std::io::Error),
    /// The document is valid JSON but not a configuration tree.
    #[error("malformed configuration tree: {0}")]
    Malformed(String),
}

/// Parse JSON bytes into a configuration tree.
///
/// The root must be an object.
pub fn parse(json: &[u8]) -> Result<Value, ParseError> {
    let root: Value = serde_json::from_slice(json)?;
    if !root.is_object() {
        return Err(ParseError::Malformed(format!(
            "root must be an object, found {}",
            kind(&root)
        )));
    }
    Ok(root)
}

/// Parse a JSON file into a configuration tree.
pub fn parse_file(path: &Path) -> Result<Value, ParseError> {
    let bytes = fs::read(path)?;
    parse(&bytes)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::{parse, ParseError};

    #[test]
    fn rejects_non_object_roots() {
        let err = parse(b"[1, 2]").expect_err("list root");
        assert!(matches!(err, ParseError::Malformed(_)));
        assert!(err.to_string().contains("a list"));
    }
}
