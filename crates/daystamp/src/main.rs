//! `daystamp` turns Unix epoch seconds into `YYYY-MM-DD` labels and builds
//! the date slider and tooltip configuration a dashboard needs.

use std::process::ExitCode;

/// CLI module - command-line interface for daystamp
mod cli;

fn main() -> ExitCode {
    cli::run_cli()
}
