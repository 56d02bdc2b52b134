//! Loading and saving the registry file.

use super::document::RegistryDocument;
use crate::config::RegistryConfig;
use crate::persist::{to_indented_json, write_file};
use crate::{MetaError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::info;

/// Where a loaded document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentOrigin {
    /// No file at the path; the built-in document was used.
    Missing,
    /// A zero-length file; the built-in document was used.
    Empty,
    /// Parsed from the file.
    File,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDocument {
    pub document: RegistryDocument,
    pub origin: DocumentOrigin,
}

impl LoadedDocument {
    /// Whether the file must be written even if no operation changes the
    /// document.
    pub fn needs_save(&self) -> bool {
        self.origin == DocumentOrigin::Missing
    }
}

/// Load the registry at `path`.
///
/// A missing or empty file yields [`RegistryDocument::builtin`]. Undecodable
/// JSON is a fatal [`MetaError::Json`].
pub fn load(path: &Path) -> Result<LoadedDocument> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(
                "Info: File '{}' not found. Will be created with default structure.",
                path.display()
            );
            return Ok(LoadedDocument {
                document: RegistryDocument::builtin(),
                origin: DocumentOrigin::Missing,
            });
        }
        Err(e) => {
            return Err(MetaError::Io {
                message: format!("Could not read '{}'", path.display()),
                path: Some(path.to_path_buf()),
                source: Some(e),
            })
        }
    };

    if contents.is_empty() {
        info!(
            "Info: File '{}' is empty. Initializing with default structure.",
            path.display()
        );
        return Ok(LoadedDocument {
            document: RegistryDocument::builtin(),
            origin: DocumentOrigin::Empty,
        });
    }

    let value: serde_json::Value = serde_json::from_str(&contents).map_err(|e| MetaError::Json {
        message: format!(
            "Could not decode JSON from '{}'. The file might be corrupted: {}",
            path.display(),
            e
        ),
        source: Some(e),
    })?;

    let document = RegistryDocument::from_json(value, &path.display().to_string())?;
    Ok(LoadedDocument {
        document,
        origin: DocumentOrigin::File,
    })
}

/// Pretty-printed form of the document, as written by [`save`].
pub fn to_json_string(doc: &RegistryDocument) -> Result<String> {
    to_indented_json(doc, RegistryConfig::JSON_INDENT)
}

/// Overwrite `path` with the document.
pub fn save(path: &Path, doc: &RegistryDocument) -> Result<()> {
    let serialized = to_json_string(doc)?;
    write_file(path, serialized.as_bytes())?;
    info!("Data successfully saved to '{}'.", path.display());
    Ok(())
}
