//! Core storage and validation logic for the kanban board.
//! This crate is the single source of truth for period/task invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use db::{DbError, DbResult, SchemaIssue, SchemaReport};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget, LoggingError};
pub use model::period::{Period, PeriodId};
pub use model::task::{Task, TaskHistoryEntry, TaskId, TaskStatus};
pub use model::validation::{
    parse_period_date, validate_period_data, validate_task_data, DataError, DataField,
    ValidPeriod, ValidTask,
};
pub use repo::period_repo::{PeriodRepository, SqlitePeriodRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskRepository};
pub use repo::{RepoError, RepoResult};
pub use service::period_service::PeriodService;
pub use service::task_service::TaskService;
pub use store::{KanbanStore, Outcome, StorePeriods, StoreTasks};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
