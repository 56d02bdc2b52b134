//! JSON serialization and file writes shared by the registry and the result
//! tagger.

use crate::{MetaError, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Serialize with the given indentation, newline-terminated.
pub fn to_indented_json<T: Serialize + ?Sized>(data: &T, indent: &[u8]) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    data.serialize(&mut ser).map_err(|e| MetaError::Json {
        message: format!("Failed to serialize data: {}", e),
        source: Some(e),
    })?;
    buf.push(b'\n');

    String::from_utf8(buf).map_err(|e| MetaError::Json {
        message: format!("Serialized JSON is not UTF-8: {}", e),
        source: None,
    })
}

/// Recursively order every object's keys lexicographically.
pub fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, sort_keys(v)))
                    .collect::<Map<String, Value>>(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// Create or truncate `path` and write `contents`.
pub fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|e| MetaError::Io {
            message: format!("Could not write to file '{}'", path.display()),
            path: Some(path.to_path_buf()),
            source: Some(e),
        })?;

    file.write_all(contents)
        .and_then(|()| file.flush())
        .map_err(|e| MetaError::Io {
            message: format!("Could not write to file '{}'", path.display()),
            path: Some(path.to_path_buf()),
            source: Some(e),
        })?;

    debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}
