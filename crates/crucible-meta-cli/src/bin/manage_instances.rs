//! Manage the instance registry JSON file used for CDM indexing and queries.

use anyhow::Result;
use clap::Parser;
use crucible_meta_cli::instances_cmd::{self, InstancesCli};
use crucible_meta_cli::logging;

fn main() -> Result<()> {
    let cli = InstancesCli::parse();
    logging::init(cli.log_level());
    instances_cmd::run(cli)
}
