//! Result directories under the Crucible run directory.

use super::tags::{read_tags, TagFilter};
use crate::config::ResultsConfig;
use crate::{MetaError, Result};
use glob::{glob, Pattern};
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::debug;

/// `<benchmark>--<date>_<time>--<run-id>`, the current result naming scheme.
static RESULT_DIR_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-zA-Z0-9]+)--([0-9-]+)_([0-9:]+)--([a-f0-9-]+)$").unwrap()
});

/// A result directory as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultEntry {
    pub path: PathBuf,
    pub name: String,
    /// File name of the symlink target, when the entry is a symlink.
    pub link_target: Option<String>,
}

impl std::fmt::Display for ResultEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.link_target {
            Some(target) => write!(f, "{} -> {}", self.name, target),
            None => f.write_str(&self.name),
        }
    }
}

/// Fail unless `path` exists and is a directory.
pub fn validate_result_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(MetaError::InvalidResultDir {
            path: path.to_path_buf(),
            reason: "does not exist",
        });
    }
    if !path.is_dir() {
        return Err(MetaError::InvalidResultDir {
            path: path.to_path_buf(),
            reason: "is not a directory",
        });
    }
    Ok(())
}

fn file_name_string(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn describe_result_dir(path: &Path) -> ResultEntry {
    let link_target = fs::symlink_metadata(path)
        .ok()
        .filter(|meta| meta.file_type().is_symlink())
        .and_then(|_| fs::read_link(path).ok())
        .map(|target| file_name_string(&target));

    ResultEntry {
        path: path.to_path_buf(),
        name: file_name_string(path),
        link_target,
    }
}

/// Run id from the directory name, else from the run document's `id` or
/// `run-id`.
pub fn run_id(dir_name: &str, run: Option<&Value>) -> Option<String> {
    if let Some(caps) = RESULT_DIR_NAME.captures(dir_name) {
        return Some(caps[4].to_string());
    }

    let run = run?;
    ["id", "run-id"]
        .iter()
        .find_map(|key| run.get(*key))
        .map(|id| match id {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
}

/// Whether a result passes the tag filters. With no filters everything
/// passes; otherwise the result needs a run document with tags matching at
/// least one filter.
pub fn matches_filters(run: Option<&Value>, filters: &[TagFilter]) -> bool {
    if filters.is_empty() {
        return true;
    }
    let Some(tags) = run.and_then(read_tags) else {
        debug!("result has no run document or no tags to filter on");
        return false;
    };
    filters.iter().any(|filter| {
        let hit = filter.matches(&tags);
        debug!("tag_filter '{}' matched: {}", filter, hit);
        hit
    })
}

fn ensure_run_dir(run_dir: &Path) -> Result<()> {
    if !run_dir.is_dir() {
        return Err(MetaError::InvalidResultDir {
            path: run_dir.to_path_buf(),
            reason: "is not a valid Crucible run results directory",
        });
    }
    Ok(())
}

fn is_latest_link(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|n| n == ResultsConfig::LATEST_LINK)
}

/// Every result directory entry in `run_dir` except `latest`, sorted by name.
pub fn list_results(run_dir: &Path) -> Result<Vec<PathBuf>> {
    ensure_run_dir(run_dir)?;

    let mut entries = fs::read_dir(run_dir)
        .map_err(|e| MetaError::io_with_path(e, run_dir))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| !is_latest_link(path))
        .collect::<Vec<_>>();
    entries.sort();
    Ok(entries)
}

/// Entries of `run_dir` whose names match any of the glob `patterns`,
/// without duplicates and without `latest`, sorted by name.
pub fn glob_results(run_dir: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    ensure_run_dir(run_dir)?;

    let base = PathBuf::from(Pattern::escape(&run_dir.to_string_lossy()));
    let mut entries = BTreeSet::new();
    for pattern in patterns {
        let full = base.join(pattern);
        let paths = glob(&full.to_string_lossy()).map_err(|e| MetaError::InvalidNameFilter {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;
        for path in paths.filter_map(|entry| entry.ok()) {
            debug!("name filter '{}' matched {}", pattern, path.display());
            entries.insert(path);
        }
    }

    Ok(entries
        .into_iter()
        .filter(|path| !is_latest_link(path))
        .collect())
}
