//! `result-processor`: list Crucible run results and edit their tags.

use crate::logging::LogLevel;
use clap::{Args, Parser, Subcommand, ValueEnum};
use crucible_meta::results::{
    add_tags, describe_result_dir, format_tags, glob_results, list_results, load_run,
    matches_filters, read_tags, remove_tags, replace_run, run_id, validate_result_dir,
};
use crucible_meta::{MetaError, Result, ResultsConfig, TagFilter};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, error, info};

#[derive(Parser, Debug)]
#[command(name = "result-processor")]
#[command(about = "Crucible run result processor")]
pub struct ResultsCli {
    /// Where the Crucible run results are stored
    #[arg(long, env = ResultsConfig::RUN_DIR_ENV_VAR, default_value = ResultsConfig::DEFAULT_RUN_DIR)]
    pub crucible_run_dir: PathBuf,

    /// Control how much logging output should be generated
    #[arg(long, value_enum, default_value_t = LogLevel::Normal)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub mode: Mode,
}

#[derive(Subcommand, Debug)]
pub enum Mode {
    /// List results
    Ls(LsArgs),
    /// Show, add or remove the tags of a result
    Tags(TagsArgs),
}

/// What `ls` prints for each result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ListKind {
    #[default]
    Tags,
    RunId,
    Short,
}

/// How `ls --filters` values are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FilterType {
    /// Glob patterns matched against result directory names.
    #[default]
    Name,
    /// `name` or `name:value` tag filters.
    Tags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TagAction {
    #[default]
    Ls,
    Add,
    Remove,
}

#[derive(Args, Debug)]
pub struct LsArgs {
    /// What type of result listing to display
    #[arg(long = "type", value_enum, default_value_t = ListKind::Tags)]
    pub kind: ListKind,

    /// A specific result directory to operate on
    #[arg(long)]
    pub result_dir: Option<PathBuf>,

    /// What type of filter to apply
    #[arg(long, value_enum, default_value_t = FilterType::Name)]
    pub filter_type: FilterType,

    /// Filters to apply; a result is listed when any matches
    #[arg(long = "filters")]
    pub filters: Vec<String>,
}

#[derive(Args, Debug)]
pub struct TagsArgs {
    /// What to do with the tag(s)
    #[arg(long, value_enum, default_value_t = TagAction::Ls)]
    pub action: TagAction,

    /// The result directory to operate on
    #[arg(long)]
    pub result_dir: PathBuf,

    /// One or more tags to operate on, with optional value separated by ':'
    #[arg(long)]
    pub tags: Vec<String>,
}

fn show_tags(run: &Value) {
    match read_tags(run) {
        Some(tags) => info!("tags:   {}", format_tags(&tags)),
        None => error!("tags:   Not Found"),
    }
}

fn ls_result_dir(path: &Path, kind: ListKind, filters: &[TagFilter]) -> Result<()> {
    validate_result_dir(path)?;
    let run = load_run(path)?.map(|(_, data)| data);

    if !matches_filters(run.as_ref(), filters) {
        debug!("result directory '{}' does not match any tag filters", path.display());
        return Ok(());
    }

    let entry = describe_result_dir(path);
    info!("result: {entry}");

    match kind {
        ListKind::Short => {}
        ListKind::Tags => match &run {
            Some(data) => show_tags(data),
            None => error!("Could not find a valid rickshaw-run.json[.xz]"),
        },
        ListKind::RunId => match run_id(&entry.name, run.as_ref()) {
            Some(id) => info!("run-id: {id}"),
            None if run.is_none() => error!("Could not find a valid rickshaw-run.json[.xz]"),
            None => error!("run-id: Not Found"),
        },
    }
    info!("");
    Ok(())
}

fn ls_mode(run_dir: &Path, args: &LsArgs) -> Result<()> {
    let tag_filters: Vec<TagFilter> = match args.filter_type {
        FilterType::Tags => args.filters.iter().map(|f| TagFilter::parse(f)).collect(),
        FilterType::Name => Vec::new(),
    };

    if let Some(result_dir) = &args.result_dir {
        return ls_result_dir(result_dir, args.kind, &tag_filters);
    }

    let results = if args.filter_type == FilterType::Name && !args.filters.is_empty() {
        glob_results(run_dir, &args.filters)?
    } else {
        list_results(run_dir)?
    };

    for result in results {
        // One unreadable result must not hide the others.
        if let Err(err) = ls_result_dir(&result, args.kind, &tag_filters) {
            error!("{err}");
        }
    }
    Ok(())
}

fn tags_mode(args: &TagsArgs) -> Result<()> {
    let result_dir = &args.result_dir;
    validate_result_dir(result_dir)?;
    info!("result: {}", describe_result_dir(result_dir));

    let Some((_, mut data)) = load_run(result_dir)? else {
        return Err(MetaError::RunFileNotFound(result_dir.clone()));
    };

    let tags = match args.action {
        TagAction::Ls => {
            show_tags(&data);
            return Ok(());
        }
        TagAction::Add => add_tags(&mut data, &args.tags)?,
        TagAction::Remove => remove_tags(&mut data, &args.tags)?,
    };
    info!("tags:   {}", format_tags(&tags));

    let backup = replace_run(result_dir, &data)?;
    debug!("previous run document kept at {}", backup.display());
    Ok(())
}

/// Run the selected mode. Any error is logged and turned into exit status 1.
pub fn run(cli: ResultsCli) -> ExitCode {
    debug!("{cli:?}");
    let outcome = match &cli.mode {
        Mode::Ls(args) => ls_mode(&cli.crucible_run_dir, args),
        Mode::Tags(args) => tags_mode(args),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
