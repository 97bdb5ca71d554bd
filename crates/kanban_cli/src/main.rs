//! `kanban` command-line entry point.
//!
//! # Responsibility
//! - Resolve settings, start logging, open the store and dispatch.
//! - Map failures to a message on stderr and a non-zero exit code.

mod cli;
mod commands;

use clap::Parser;
use cli::Cli;
use kanban_core::{core_version, default_log_level, init_logging, KanbanStore};
use log::debug;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    if let Err(err) = init_logging(level, cli.log_dir.as_deref()) {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }
    debug!(
        "event=cli_start module=cli status=ok core_version={} command={:?}",
        core_version(),
        cli.command
    );

    let mut store = KanbanStore::new();
    if !store.connect(&cli.db).is_success() {
        eprintln!("error: cannot open database `{}`", cli.db.display());
        return ExitCode::FAILURE;
    }

    let result = commands::run(&mut store, cli.command, cli.json);
    store.close();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
