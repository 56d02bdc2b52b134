//! Error types for crucible-meta.
//!
//! Errors fall into two classes: fatal conditions (I/O failures, undecodable
//! JSON) that must stop the process, and rejected operations (unknown names,
//! duplicate names, malformed tags) that leave the document untouched.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the crucible-meta library.
#[derive(Debug, Error)]
pub enum MetaError {
    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    // Serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // Instance registry rejections
    #[error("Instance with name '{name}' already exists in 'instances'. No changes made.")]
    DuplicateInstance { name: String },

    #[error("Instance with name '{name}' not found in 'instances' list. No changes made.")]
    InstanceNotFound { name: String },

    #[error("Instance '{name}' found, but no update parameters provided or no changes were applicable.")]
    NoChanges { name: String },

    #[error("Instance name must not be empty")]
    EmptyName,

    #[error("At least one update field (--host, --cdmver, --userpass, --remove-userpass, --index, --query, --no-query) must be specified.")]
    NoUpdateFields,

    // Result directory errors
    #[error("The requested result directory {reason} [{}]", .path.display())]
    InvalidResultDir { path: PathBuf, reason: &'static str },

    #[error("Could not find a valid rickshaw-run.json[.xz] in {}", .0.display())]
    RunFileNotFound(PathBuf),

    #[error("Invalid result name filter '{pattern}': {message}")]
    InvalidNameFilter { pattern: String, message: String },

    // Tag errors
    #[error("Encountered incomplete/illegal tag '{0}'")]
    InvalidTag(String),

    #[error("Specifying a value with a tag to remove does not make sense ('{0}')")]
    TagValueOnRemove(String),

    #[error("You must specify at least one tag to {action} using --tags")]
    MissingTags { action: &'static str },

    #[error("There are no tags to remove")]
    NoTags,

    #[error("There were no matching tags removed")]
    NoMatchingTags,
}

/// Result type alias for crucible-meta operations.
pub type Result<T> = std::result::Result<T, MetaError>;

impl From<std::io::Error> for MetaError {
    fn from(err: std::io::Error) -> Self {
        MetaError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for MetaError {
    fn from(err: serde_json::Error) -> Self {
        MetaError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl MetaError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        MetaError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Whether this error must terminate the process.
    ///
    /// Everything else is a rejected operation: the caller reports it and
    /// skips persisting.
    pub fn is_fatal(&self) -> bool {
        matches!(self, MetaError::Io { .. } | MetaError::Json { .. })
    }
}
