//! Kanban store facade.
//!
//! # Responsibility
//! - Own the single SQLite connection for a session.
//! - Expose structural operations (`connect`, `create_schema`,
//!   `verify_schema`, `close`) as plain success/failure results.
//! - Hand out period/task services bound to the open connection.
//!
//! # Invariants
//! - At most one connection is open; `connect` closes the previous one.
//! - Structural failures are logged and returned as `Outcome::Failure`;
//!   invalid input is returned as `DataError`.
//! - The connection is released by `close` or on drop.

use crate::db::migrations::create_schema;
use crate::db::{open_db, open_db_in_memory, verify_schema, DbError, DbResult, SchemaReport};
use crate::model::period::Period;
use crate::model::validation::{self, DataError};
use crate::repo::period_repo::SqlitePeriodRepository;
use crate::repo::task_repo::SqliteTaskRepository;
use crate::repo::RepoResult;
use crate::service::period_service::PeriodService;
use crate::service::task_service::TaskService;
use chrono::{Local, NaiveDate};
use log::{error, info, warn};
use rusqlite::Connection;
use std::path::Path;

/// Result of a structural store operation.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

/// Period service bound to the store connection.
pub type StorePeriods<'conn> = PeriodService<SqlitePeriodRepository<'conn>>;
/// Task service bound to the store connection.
pub type StoreTasks<'conn> = TaskService<SqliteTaskRepository<'conn>>;

/// Session-scoped owner of the kanban database connection.
#[derive(Default)]
pub struct KanbanStore {
    conn: Option<Connection>,
}

impl KanbanStore {
    /// Creates a store with no open connection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens or creates the database file at `path`.
    ///
    /// A missing file is created. An inaccessible path (missing parent
    /// directory, directory instead of file, unreadable file) yields
    /// `Outcome::Failure`.
    pub fn connect(&mut self, path: impl AsRef<Path>) -> Outcome {
        self.close();
        self.install(open_db(path), "connect")
    }

    /// Opens a fresh in-memory database.
    pub fn connect_in_memory(&mut self) -> Outcome {
        self.close();
        self.install(open_db_in_memory(), "connect_in_memory")
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Creates the schema. Idempotent; never drops existing rows.
    pub fn create_schema(&mut self) -> Outcome {
        let result = match self.conn.as_mut() {
            Some(conn) => create_schema(conn),
            None => Err(DbError::NotConnected),
        };
        report("create_schema", result)
    }

    /// Returns whether every required table, column and key is present.
    ///
    /// Returns `false` when disconnected or when the check itself fails.
    pub fn verify_schema(&self) -> bool {
        match self.schema_report() {
            Ok(report) if report.is_valid() => true,
            Ok(report) => {
                for issue in &report.issues {
                    warn!("event=schema_verify module=store status=mismatch issue=\"{issue}\"");
                }
                false
            }
            Err(err) => {
                error!("event=schema_verify module=store status=error error={err}");
                false
            }
        }
    }

    /// Detailed verification result, for callers deciding on remediation.
    pub fn schema_report(&self) -> DbResult<SchemaReport> {
        verify_schema(self.connection()?)
    }

    /// Checks period input without touching the database.
    pub fn validate_period_data(
        &self,
        name: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<(), DataError> {
        validation::validate_period_data(name, start_date, end_date).map(|_| ())
    }

    /// Checks task input without touching the database.
    pub fn validate_task_data(&self, title: &str, project: &str) -> Result<(), DataError> {
        validation::validate_task_data(title, project).map(|_| ())
    }

    /// Returns the period containing today's local date.
    pub fn get_current_period(&self) -> Option<Period> {
        self.current_period_on(Local::now().date_naive())
    }

    /// Returns the period containing `date`.
    ///
    /// When periods overlap, the most recently created one wins. Returns
    /// `None` when disconnected or when the lookup fails.
    pub fn current_period_on(&self, date: NaiveDate) -> Option<Period> {
        let periods = self.periods().ok()?;
        match periods.current_period_on(date) {
            Ok(period) => period,
            Err(err) => {
                error!("event=current_period module=store status=error error={err}");
                None
            }
        }
    }

    /// Period use-cases over the open connection.
    pub fn periods(&self) -> RepoResult<StorePeriods<'_>> {
        Ok(PeriodService::new(SqlitePeriodRepository::new(
            self.connection()?,
        )))
    }

    /// Task use-cases over the open connection.
    pub fn tasks(&self) -> RepoResult<StoreTasks<'_>> {
        Ok(TaskService::new(SqliteTaskRepository::new(self.connection()?)))
    }

    /// Releases the connection. Calling it again is a no-op.
    pub fn close(&mut self) {
        let Some(conn) = self.conn.take() else {
            return;
        };

        match conn.close() {
            Ok(()) => info!("event=db_close module=store status=ok"),
            // The handle is dropped here, which finalizes it regardless.
            Err((_conn, err)) => {
                error!("event=db_close module=store status=error error={err}");
            }
        }
    }

    fn connection(&self) -> DbResult<&Connection> {
        self.conn.as_ref().ok_or(DbError::NotConnected)
    }

    fn install(&mut self, opened: DbResult<Connection>, operation: &str) -> Outcome {
        match opened {
            Ok(conn) => {
                self.conn = Some(conn);
                Outcome::Success
            }
            Err(err) => report(operation, Err(err)),
        }
    }
}

impl Drop for KanbanStore {
    fn drop(&mut self) {
        self.close();
    }
}

fn report(operation: &str, result: DbResult<()>) -> Outcome {
    match result {
        Ok(()) => Outcome::Success,
        Err(err) => {
            error!("event={operation} module=store status=error error={err}");
            Outcome::Failure
        }
    }
}
