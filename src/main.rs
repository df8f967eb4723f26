//! CLI entry point for the dungeon layout generator

use clap::Parser;
use roomstamp::io::cli::{Cli, DungeonRunner};
use std::process::ExitCode;

fn main() -> roomstamp::Result<ExitCode> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    let mut runner = DungeonRunner::new(cli)?;
    let summary = runner.run()?;
    Ok(if summary.report.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
