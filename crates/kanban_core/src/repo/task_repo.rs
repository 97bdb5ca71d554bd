//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist validated tasks and their lifecycle moves.
//! - Provide the board, backlog and history read models.
//!
//! # Invariants
//! - New tasks start as `unassigned` with no period.
//! - Status writes do not check transitions; `TaskService` does.
//! - Planning into a period fails with `NotFound` when the period is missing.

use super::{datetime_to_db, parse_db_datetime, parse_optional_datetime, RepoError, RepoResult};
use crate::model::period::PeriodId;
use crate::model::task::{Task, TaskHistoryEntry, TaskId, TaskStatus};
use crate::model::validation::ValidTask;
use chrono::NaiveDateTime;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const TASK_COLUMNS_SQL: &str = "t.id,
    t.title,
    t.description,
    t.status,
    t.resource,
    t.project,
    t.period_id,
    t.created_datetime,
    t.todo_datetime,
    t.inwork_datetime,
    t.completed_datetime";

/// Repository interface for task operations.
pub trait TaskRepository {
    fn create_task(
        &self,
        task: &ValidTask,
        description: Option<&str>,
        created_at: NaiveDateTime,
    ) -> RepoResult<TaskId>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    /// Sets status `todo`, the period and `todo_datetime`.
    fn plan_into_period(
        &self,
        id: TaskId,
        period_id: PeriodId,
        at: NaiveDateTime,
    ) -> RepoResult<()>;
    /// Sets `inwork` or `completed` and the matching timestamp column.
    fn set_status(&self, id: TaskId, status: TaskStatus, at: NaiveDateTime) -> RepoResult<()>;
    fn set_resource(&self, id: TaskId, resource: Option<&str>) -> RepoResult<()>;
    /// Board tasks of one period (every status but `unassigned`), by id.
    fn tasks_by_period(&self, period_id: PeriodId) -> RepoResult<Vec<Task>>;
    /// Backlog tasks, by id.
    fn unassigned_tasks(&self) -> RepoResult<Vec<Task>>;
    /// Every task with its period name, optionally limited to one period.
    fn task_history(&self, period_id: Option<PeriodId>) -> RepoResult<Vec<TaskHistoryEntry>>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(
        &self,
        task: &ValidTask,
        description: Option<&str>,
        created_at: NaiveDateTime,
    ) -> RepoResult<TaskId> {
        self.conn.execute(
            "INSERT INTO tasks (
                title,
                description,
                status,
                project,
                created_datetime
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                task.title.as_str(),
                description,
                TaskStatus::Unassigned.as_str(),
                task.project.as_str(),
                datetime_to_db(created_at),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {TASK_COLUMNS_SQL} FROM tasks t WHERE t.id = ?1;"))?;
        let raw = stmt.query_row([id], RawTaskRow::read).optional()?;
        raw.map(RawTaskRow::into_task).transpose()
    }

    fn plan_into_period(
        &self,
        id: TaskId,
        period_id: PeriodId,
        at: NaiveDateTime,
    ) -> RepoResult<()> {
        let period_exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM performance_periods WHERE id = ?1);",
            [period_id],
            |row| row.get(0),
        )?;
        if period_exists == 0 {
            return Err(RepoError::NotFound {
                entity: "period",
                id: period_id,
            });
        }

        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                status = ?1,
                period_id = ?2,
                todo_datetime = ?3
             WHERE id = ?4;",
            params![TaskStatus::Todo.as_str(), period_id, datetime_to_db(at), id],
        )?;

        ensure_changed(changed, id)
    }

    fn set_status(&self, id: TaskId, status: TaskStatus, at: NaiveDateTime) -> RepoResult<()> {
        let timestamp_column = match status {
            TaskStatus::InWork => "inwork_datetime",
            TaskStatus::Completed => "completed_datetime",
            TaskStatus::Unassigned | TaskStatus::Todo => {
                return Err(RepoError::InvalidData(format!(
                    "status `{}` cannot be set directly",
                    status.as_str()
                )));
            }
        };

        let changed = self.conn.execute(
            &format!(
                "UPDATE tasks
                 SET
                    status = ?1,
                    {timestamp_column} = ?2
                 WHERE id = ?3;"
            ),
            params![status.as_str(), datetime_to_db(at), id],
        )?;

        ensure_changed(changed, id)
    }

    fn set_resource(&self, id: TaskId, resource: Option<&str>) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE tasks SET resource = ?1 WHERE id = ?2;",
            params![resource, id],
        )?;

        ensure_changed(changed, id)
    }

    fn tasks_by_period(&self, period_id: PeriodId) -> RepoResult<Vec<Task>> {
        self.query_tasks(
            &format!(
                "SELECT {TASK_COLUMNS_SQL}
                 FROM tasks t
                 WHERE t.period_id = ?1 AND t.status != ?2
                 ORDER BY t.id ASC;"
            ),
            vec![
                Value::Integer(period_id),
                Value::Text(TaskStatus::Unassigned.as_str().to_string()),
            ],
        )
    }

    fn unassigned_tasks(&self) -> RepoResult<Vec<Task>> {
        self.query_tasks(
            &format!(
                "SELECT {TASK_COLUMNS_SQL}
                 FROM tasks t
                 WHERE t.status = ?1
                 ORDER BY t.id ASC;"
            ),
            vec![Value::Text(TaskStatus::Unassigned.as_str().to_string())],
        )
    }

    fn task_history(&self, period_id: Option<PeriodId>) -> RepoResult<Vec<TaskHistoryEntry>> {
        let mut sql = format!(
            "SELECT {TASK_COLUMNS_SQL}, p.name AS period_name
             FROM tasks t
             LEFT JOIN performance_periods p ON t.period_id = p.id
             WHERE 1 = 1"
        );
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(period_id) = period_id {
            sql.push_str(" AND t.period_id = ?");
            bind_values.push(Value::Integer(period_id));
        }
        sql.push_str(" ORDER BY t.id ASC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut entries = Vec::new();

        while let Some(row) = rows.next()? {
            let period_name: Option<String> = row.get("period_name")?;
            let task = RawTaskRow::read(row)?.into_task()?;
            entries.push(TaskHistoryEntry { task, period_name });
        }

        Ok(entries)
    }
}

impl SqliteTaskRepository<'_> {
    fn query_tasks(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut tasks = Vec::new();

        while let Some(row) = rows.next()? {
            tasks.push(RawTaskRow::read(row)?.into_task()?);
        }

        Ok(tasks)
    }
}

fn ensure_changed(changed: usize, id: TaskId) -> RepoResult<()> {
    if changed == 0 {
        return Err(RepoError::NotFound { entity: "task", id });
    }
    Ok(())
}

struct RawTaskRow {
    id: TaskId,
    title: String,
    description: Option<String>,
    status: String,
    resource: Option<String>,
    project: String,
    period_id: Option<PeriodId>,
    created_datetime: String,
    todo_datetime: Option<String>,
    inwork_datetime: Option<String>,
    completed_datetime: Option<String>,
}

impl RawTaskRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            title: row.get("title")?,
            description: row.get("description")?,
            status: row.get("status")?,
            resource: row.get("resource")?,
            project: row.get("project")?,
            period_id: row.get("period_id")?,
            created_datetime: row.get("created_datetime")?,
            todo_datetime: row.get("todo_datetime")?,
            inwork_datetime: row.get("inwork_datetime")?,
            completed_datetime: row.get("completed_datetime")?,
        })
    }

    fn into_task(self) -> RepoResult<Task> {
        let status = TaskStatus::parse(&self.status).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid task status `{}` in tasks.status",
                self.status
            ))
        })?;

        Ok(Task {
            id: self.id,
            title: self.title,
            description: self.description,
            status,
            resource: self.resource,
            project: self.project,
            period_id: self.period_id,
            created_at: parse_db_datetime(&self.created_datetime, "tasks.created_datetime")?,
            todo_at: parse_optional_datetime(self.todo_datetime, "tasks.todo_datetime")?,
            inwork_at: parse_optional_datetime(self.inwork_datetime, "tasks.inwork_datetime")?,
            completed_at: parse_optional_datetime(
                self.completed_datetime,
                "tasks.completed_datetime",
            )?,
        })
    }
}
