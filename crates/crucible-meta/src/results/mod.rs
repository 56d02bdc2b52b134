//! Crucible run results: listing result directories and editing the tags in
//! their rickshaw run documents.
//!
//! Tag edits rewrite the run document in place after moving the previous
//! version aside under a timestamped name, so every edit leaves a backup.

mod listing;
mod rickshaw;
mod tags;

pub use listing::{
    describe_result_dir, glob_results, list_results, matches_filters, run_id, validate_result_dir,
    ResultEntry,
};
pub use rickshaw::{load_run, replace_run, RunFile, RunFileFormat};
pub use tags::{add_tags, format_tags, parse_tag, read_tags, remove_tags, Tag, TagFilter};
