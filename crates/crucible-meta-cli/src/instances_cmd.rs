//! `manage-instances`: edit the instance registry JSON file.

use crate::logging::LogLevel;
use anyhow::Result;
use clap::{ArgGroup, Args, Parser, Subcommand};
use crucible_meta::instances::{self, EditReport, InstanceUpdate, NewInstance};
use crucible_meta::{MetaError, RegistryConfig};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "manage-instances")]
#[command(about = "Manage instances in a JSON configuration file.")]
pub struct InstancesCli {
    /// Path to the JSON configuration file
    #[arg(long, env = RegistryConfig::CFG_ENV_VAR)]
    pub cfg: PathBuf,

    /// Control how much logging output should be generated
    #[arg(long, value_enum, default_value_t = LogLevel::Normal)]
    pub log_level: LogLevel,

    /// Shorthand for --log-level debug
    #[arg(short, long)]
    pub debug: bool,

    #[command(subcommand)]
    pub action: Action,
}

impl InstancesCli {
    pub fn log_level(&self) -> LogLevel {
        if self.debug {
            LogLevel::Debug
        } else {
            self.log_level
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Action {
    /// Add a new instance to the configuration
    Add(AddArgs),
    /// Remove an instance from the configuration by name
    Remove(RemoveArgs),
    /// Update an existing instance
    Update(UpdateArgs),
    /// Display the current configuration from the JSON file
    Info,
    /// Display the cmdline options to pass to CDM queries
    QueryOpt,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Name of the instance
    #[arg(long)]
    pub name: String,
    /// Host of the instance
    #[arg(long)]
    pub host: String,
    /// CDM version of the instance
    #[arg(long)]
    pub cdmver: String,
    /// Optional user/password file path (bare flag stores an empty value)
    #[arg(long, num_args = 0..=1, default_missing_value = "")]
    pub userpass: Option<String>,
    /// Also add the instance name to "query-from"
    #[arg(long)]
    pub query: bool,
    /// Also set "index-to" to this instance name
    #[arg(long)]
    pub index: bool,
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Name of the instance to remove
    #[arg(long)]
    pub name: String,
}

#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("changes")
        .required(true)
        .multiple(true)
        .args(["host", "cdmver", "userpass", "remove_userpass", "index", "query", "no_query"])
))]
pub struct UpdateArgs {
    /// Name of the instance to update
    #[arg(long)]
    pub name: String,
    /// New host for the instance
    #[arg(long)]
    pub host: Option<String>,
    /// New CDM version for the instance
    #[arg(long)]
    pub cdmver: Option<String>,
    /// New user/password file path; use --remove-userpass to clear
    #[arg(long, num_args = 0..=1, default_missing_value = "")]
    pub userpass: Option<String>,
    /// Remove the userpass field
    #[arg(long)]
    pub remove_userpass: bool,
    /// Ensure the instance name is in "query-from"
    #[arg(long)]
    pub query: bool,
    /// Remove the instance name from "query-from"
    #[arg(long)]
    pub no_query: bool,
    /// Set "index-to" to this instance name
    #[arg(long)]
    pub index: bool,
}

impl From<AddArgs> for NewInstance {
    fn from(args: AddArgs) -> Self {
        NewInstance {
            name: args.name,
            host: args.host,
            cdmver: args.cdmver,
            userpass: args.userpass,
            query: args.query,
            index: args.index,
        }
    }
}

impl From<UpdateArgs> for InstanceUpdate {
    fn from(args: UpdateArgs) -> Self {
        InstanceUpdate {
            host: args.host,
            cdmver: args.cdmver,
            userpass: args.userpass,
            remove_userpass: args.remove_userpass,
            index: args.index,
            query: args.query,
            no_query: args.no_query,
        }
    }
}

fn log_notes(report: &EditReport) {
    for note in &report.notes {
        if note.is_warning() {
            warn!("{note}");
        } else {
            info!("{note}");
        }
    }
}

/// Report a rejected edit. Returns whether the edit changed the document.
fn settle(outcome: crucible_meta::Result<EditReport>, summarize: bool) -> Result<bool> {
    match outcome {
        Ok(report) => {
            if summarize {
                info!("{}", report.summary());
            } else {
                log_notes(&report);
            }
            Ok(report.changed())
        }
        Err(err) if err.is_fatal() => Err(err.into()),
        Err(err @ MetaError::NoChanges { .. }) => {
            info!("Info: {err}");
            Ok(false)
        }
        Err(err) => {
            error!("Error: {err}");
            Ok(false)
        }
    }
}

/// Print the document, then warn about references to missing instances so
/// the dump always starts at the heading.
fn display_info(path: &Path, doc: &crucible_meta::RegistryDocument) -> Result<()> {
    println!("Current configuration from '{}':", path.display());
    print!("{}", instances::to_json_string(doc)?);
    for name in doc.dangling_references() {
        warn!("Warning: '{name}' is referenced but has no matching instance.");
    }
    Ok(())
}

/// Load, apply the requested action, and save when anything changed.
///
/// Rejected edits are logged and leave the file untouched. Load and save
/// failures are returned.
pub fn run(cli: InstancesCli) -> Result<()> {
    let path = cli.cfg;
    let mut loaded = instances::load(&path)?;
    let doc = &mut loaded.document;

    let changed = match cli.action {
        Action::Add(args) => settle(instances::add_instance(doc, args.into()), false)?,
        Action::Remove(args) => settle(instances::remove_instance(doc, &args.name), false)?,
        Action::Update(args) => {
            let name = args.name.clone();
            settle(instances::update_instance(doc, &name, args.into()), true)?
        }
        Action::Info => {
            display_info(&path, doc)?;
            false
        }
        Action::QueryOpt => {
            println!("{}", instances::query_options(doc));
            false
        }
    };

    if changed || loaded.needs_save() {
        info!("writing config file");
        instances::save(&path, &loaded.document)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> std::result::Result<InstancesCli, clap::Error> {
        InstancesCli::try_parse_from(
            ["manage-instances", "--cfg", "/tmp/instances.json"]
                .iter()
                .chain(args.iter()),
        )
    }

    #[test]
    fn test_add_requires_fields() {
        assert!(parse(&["add", "--name", "a", "--host", "h"]).is_err());
        assert!(parse(&["add", "--name", "a", "--host", "h", "--cdmver", "v"]).is_ok());
    }

    #[test]
    fn test_bare_userpass_is_empty_string() {
        let cli = parse(&["add", "--name", "a", "--host", "h", "--cdmver", "v", "--userpass"]).unwrap();
        let Action::Add(args) = cli.action else {
            panic!("expected add");
        };
        assert_eq!(args.userpass.as_deref(), Some(""));

        let cli = parse(&["add", "--name", "a", "--host", "h", "--cdmver", "v"]).unwrap();
        let Action::Add(args) = cli.action else {
            panic!("expected add");
        };
        assert_eq!(args.userpass, None);
    }

    #[test]
    fn test_update_requires_a_change() {
        let err = parse(&["update", "--name", "a"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);

        let cli = parse(&["update", "--name", "a", "--query", "--no-query"]).unwrap();
        let Action::Update(args) = cli.action else {
            panic!("expected update");
        };
        let update = InstanceUpdate::from(args);
        assert!(update.query && update.no_query);
    }

    #[test]
    fn test_update_remove_userpass_alone_is_accepted() {
        let cli = parse(&["update", "--name", "a", "--remove-userpass"]).unwrap();
        assert!(matches!(cli.action, Action::Update(ref u) if u.remove_userpass));
    }

    #[test]
    fn test_log_level_flags() {
        assert_eq!(parse(&["info"]).unwrap().log_level(), LogLevel::Normal);
        assert_eq!(
            parse(&["--log-level", "debug", "info"]).unwrap().log_level(),
            LogLevel::Debug
        );
        assert_eq!(parse(&["-d", "info"]).unwrap().log_level(), LogLevel::Debug);
        assert!(parse(&["--log-level", "verbose", "info"]).is_err());
    }

    #[test]
    fn test_query_opt_subcommand_name() {
        let cli = parse(&["query-opt"]).unwrap();
        assert!(matches!(cli.action, Action::QueryOpt));
    }
}
