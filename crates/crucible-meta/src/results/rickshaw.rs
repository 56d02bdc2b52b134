//! Reading and rewriting the `rickshaw-run.json[.xz]` document of a result.

use crate::config::ResultsConfig;
use crate::persist::{sort_keys, to_indented_json, write_file};
use crate::{MetaError, Result};
use chrono::{DateTime, Local};
use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use xz2::read::XzDecoder;
use xz2::write::XzEncoder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunFileFormat {
    Xz,
    Plain,
}

/// The run document file inside a result directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFile {
    pub path: PathBuf,
    pub format: RunFileFormat,
}

impl RunFile {
    /// Find the run file under `<result_dir>/run`, preferring the compressed
    /// form.
    pub fn locate(result_dir: &Path) -> Option<Self> {
        let run_dir = result_dir.join(ResultsConfig::RUN_SUBDIR);
        [
            (ResultsConfig::RUN_FILE_XZ, RunFileFormat::Xz),
            (ResultsConfig::RUN_FILE_PLAIN, RunFileFormat::Plain),
        ]
        .into_iter()
        .map(|(name, format)| RunFile {
            path: run_dir.join(name),
            format,
        })
        .find(|file| file.path.exists())
        .inspect(|file| debug!("found {}", file.path.display()))
    }

    pub fn read(&self) -> Result<Value> {
        let file = File::open(&self.path).map_err(|e| MetaError::io_with_path(e, &self.path))?;
        let reader: Box<dyn Read> = match self.format {
            RunFileFormat::Xz => Box::new(XzDecoder::new(BufReader::new(file))),
            RunFileFormat::Plain => Box::new(BufReader::new(file)),
        };

        serde_json::from_reader(reader).map_err(|e| MetaError::Json {
            message: format!("Failed to parse {}: {}", self.path.display(), e),
            source: Some(e),
        })
    }

    /// Write `data` with sorted keys and 4-space indentation, in this file's
    /// format.
    pub fn write(&self, data: &Value) -> Result<()> {
        let serialized = to_indented_json(&sort_keys(data.clone()), ResultsConfig::JSON_INDENT)?;
        match self.format {
            RunFileFormat::Plain => write_file(&self.path, serialized.as_bytes()),
            RunFileFormat::Xz => {
                let file =
                    File::create(&self.path).map_err(|e| MetaError::io_with_path(e, &self.path))?;
                let mut encoder = XzEncoder::new(file, ResultsConfig::XZ_PRESET);
                encoder
                    .write_all(serialized.as_bytes())
                    .and_then(|()| encoder.finish())
                    .map_err(|e| MetaError::io_with_path(e, &self.path))?;
                Ok(())
            }
        }
    }

    /// Name the file is moved to when it is replaced at `at`.
    pub fn backup_path(&self, at: DateTime<Local>) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(at.format(ResultsConfig::BACKUP_TIMESTAMP_FORMAT).to_string());
        self.path.with_file_name(name)
    }
}

/// Load the run document of a result directory, if it has one.
pub fn load_run(result_dir: &Path) -> Result<Option<(RunFile, Value)>> {
    match RunFile::locate(result_dir) {
        Some(file) => {
            let data = file.read()?;
            Ok(Some((file, data)))
        }
        None => Ok(None),
    }
}

/// Replace the run document of a result directory with `data`.
///
/// The current file is renamed to a timestamped backup first. Returns the
/// backup path.
pub fn replace_run(result_dir: &Path, data: &Value) -> Result<PathBuf> {
    let file = RunFile::locate(result_dir)
        .ok_or_else(|| MetaError::RunFileNotFound(result_dir.to_path_buf()))?;

    let backup = file.backup_path(Local::now());
    fs::rename(&file.path, &backup).map_err(|e| MetaError::Io {
        message: format!(
            "Failed to rename {} to {}",
            file.path.display(),
            backup.display()
        ),
        path: Some(file.path.clone()),
        source: Some(e),
    })?;
    debug!("backed up {} to {}", file.path.display(), backup.display());

    file.write(data)?;
    Ok(backup)
}
