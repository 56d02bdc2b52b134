//! Crucible run result processor: list results and manage their tags.

use clap::Parser;
use crucible_meta_cli::logging;
use crucible_meta_cli::results_cmd::{self, ResultsCli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = ResultsCli::parse();
    logging::init(cli.log_level);
    results_cmd::run(cli)
}
