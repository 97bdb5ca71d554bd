//! Command-line surface.
//!
//! Settings resolve from flags first, then environment variables.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "kanban")]
#[command(about = "Local kanban board over a single SQLite file")]
#[command(version = kanban_core::core_version())]
pub struct Cli {
    /// Database file (created when missing)
    #[arg(long, env = "KANBAN_DB", default_value = "kanban.db", global = true)]
    pub db: PathBuf,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, env = "KANBAN_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Absolute directory for rotating log files (stderr when omitted)
    #[arg(long, env = "KANBAN_LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    /// Print records as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create the schema (safe to re-run) and verify it
    Init,

    /// Check the schema without changing anything
    Verify,

    /// Manage performance periods
    #[command(subcommand)]
    Period(PeriodCommand),

    /// Manage tasks
    #[command(subcommand)]
    Task(TaskCommand),
}

#[derive(Debug, Subcommand)]
pub enum PeriodCommand {
    /// Create a period; dates as MM/DD/YY, MM/DD/YYYY or YYYY-MM-DD
    Add {
        name: String,
        start_date: String,
        end_date: String,
    },

    /// List all periods by start date
    List,

    /// Show one period by name
    Show { name: String },

    /// Show the period containing today (or --on DATE)
    Current {
        #[arg(long)]
        on: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum TaskCommand {
    /// Create a backlog task
    Add {
        title: String,
        #[arg(long)]
        project: String,
        #[arg(long, default_value = "")]
        desc: String,
    },

    /// Plan a task into a period
    Todo {
        id: i64,
        #[command(flatten)]
        period: PeriodSelector,
    },

    /// Assign a resource (empty string clears it)
    Assign { id: i64, resource: String },

    /// Start work on a planned task
    Start { id: i64 },

    /// Complete a task in work
    Done { id: i64 },

    /// Show one task
    Show { id: i64 },

    /// Board tasks of a period (defaults to the current period)
    Board {
        #[command(flatten)]
        period: PeriodSelector,
    },

    /// Unassigned tasks
    Backlog,

    /// Every task with its period name
    History {
        #[command(flatten)]
        period: PeriodSelector,
    },
}

#[derive(Debug, Clone, Args)]
pub struct PeriodSelector {
    /// Period name
    #[arg(long = "period")]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands, TaskCommand};
    use clap::{CommandFactory, Parser};

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn version_reports_core_version() {
        let command = Cli::command();
        assert_eq!(command.get_version(), Some(kanban_core::core_version()));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "kanban", "task", "todo", "7", "--period", "Sprint 1", "--db", "/tmp/b.db", "--json",
        ])
        .unwrap();

        assert_eq!(cli.db.to_str(), Some("/tmp/b.db"));
        assert!(cli.json);
        match cli.command {
            Commands::Task(TaskCommand::Todo { id, period }) => {
                assert_eq!(id, 7);
                assert_eq!(period.name.as_deref(), Some("Sprint 1"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
