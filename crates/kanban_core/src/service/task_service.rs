//! Task use-case service.
//!
//! # Responsibility
//! - Create validated tasks and drive them through the board lifecycle.
//!
//! # Invariants
//! - Every status move is checked with `TaskStatus::can_move_to` against the
//!   stored status before it is written.
//! - Timestamps come from the local wall clock at the time of the move.

use crate::model::period::PeriodId;
use crate::model::task::{Task, TaskHistoryEntry, TaskId, TaskStatus};
use crate::model::validation::{validate_task_data, DataError};
use crate::repo::task_repo::TaskRepository;
use crate::repo::{RepoError, RepoResult};
use chrono::{Local, NaiveDateTime};
use log::info;

/// Use-case service wrapper for task operations.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and stores a new backlog task.
    ///
    /// # Contract
    /// - Title and project are trimmed.
    /// - A blank description is stored as `NULL`.
    /// - Status starts as `unassigned`.
    pub fn create_task(
        &self,
        title: &str,
        description: &str,
        project: &str,
    ) -> RepoResult<Task> {
        let task = validate_task_data(title, project)?;
        let description = Some(description.trim()).filter(|value| !value.is_empty());

        let id = self.repo.create_task(&task, description, now())?;
        info!("event=task_create module=service status=ok task_id={id}");
        self.read_back(id)
    }

    /// Plans a task into a period (`unassigned|todo -> todo`).
    pub fn move_to_todo(&self, id: TaskId, period_id: PeriodId) -> RepoResult<Task> {
        self.check_transition(id, TaskStatus::Todo)?;
        self.repo.plan_into_period(id, period_id, now())?;
        info!(
            "event=task_move module=service status=ok task_id={id} to=todo period_id={period_id}"
        );
        self.read_back(id)
    }

    /// Assigns a resource; a blank value clears the assignment.
    pub fn assign_resource(&self, id: TaskId, resource: &str) -> RepoResult<Task> {
        let resource = Some(resource.trim()).filter(|value| !value.is_empty());
        self.repo.set_resource(id, resource)?;
        self.read_back(id)
    }

    /// Starts work on a planned task (`todo -> inwork`).
    pub fn start_task(&self, id: TaskId) -> RepoResult<Task> {
        self.advance(id, TaskStatus::InWork)
    }

    /// Completes a task in work (`inwork -> completed`).
    pub fn complete_task(&self, id: TaskId) -> RepoResult<Task> {
        self.advance(id, TaskStatus::Completed)
    }

    pub fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        self.repo.get_task(id)
    }

    pub fn tasks_by_period(&self, period_id: PeriodId) -> RepoResult<Vec<Task>> {
        self.repo.tasks_by_period(period_id)
    }

    pub fn unassigned_tasks(&self) -> RepoResult<Vec<Task>> {
        self.repo.unassigned_tasks()
    }

    pub fn task_history(&self, period_id: Option<PeriodId>) -> RepoResult<Vec<TaskHistoryEntry>> {
        self.repo.task_history(period_id)
    }

    fn advance(&self, id: TaskId, to: TaskStatus) -> RepoResult<Task> {
        self.check_transition(id, to)?;
        self.repo.set_status(id, to, now())?;
        info!(
            "event=task_move module=service status=ok task_id={id} to={}",
            to.as_str()
        );
        self.read_back(id)
    }

    fn check_transition(&self, id: TaskId, to: TaskStatus) -> RepoResult<()> {
        let task = self
            .repo
            .get_task(id)?
            .ok_or(RepoError::NotFound { entity: "task", id })?;

        if !task.status.can_move_to(to) {
            return Err(DataError::InvalidTransition {
                task_id: id,
                from: task.status,
                to,
            }
            .into());
        }
        Ok(())
    }

    fn read_back(&self, id: TaskId) -> RepoResult<Task> {
        self.repo
            .get_task(id)?
            .ok_or_else(|| RepoError::InvalidData(format!("task {id} not found in read-back")))
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}
