//! Task model and lifecycle rules.
//!
//! # Responsibility
//! - Define the persisted task record and its board status.
//! - Decide which status moves are legal.
//!
//! # Invariants
//! - `title` and `project` are trimmed and non-empty.
//! - Lifecycle timestamps are set by the move that enters that status.
//! - `period_id` is `None` only while the task is `Unassigned`.

use crate::model::period::PeriodId;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Row id of a `tasks` record.
pub type TaskId = i64;

/// Board column a task sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Backlog; not planned into any period.
    Unassigned,
    /// Planned into a period.
    Todo,
    /// Being worked on.
    InWork,
    /// Finished.
    Completed,
}

impl TaskStatus {
    /// Storage/wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unassigned => "unassigned",
            Self::Todo => "todo",
            Self::InWork => "inwork",
            Self::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "unassigned" => Some(Self::Unassigned),
            "todo" => Some(Self::Todo),
            "inwork" => Some(Self::InWork),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Returns whether a task in `self` may move to `next`.
    ///
    /// `Todo -> Todo` is allowed so a planned task can be re-planned into
    /// another period.
    pub fn can_move_to(self, next: TaskStatus) -> bool {
        matches!(
            (self, next),
            (Self::Unassigned, Self::Todo)
                | (Self::Todo, Self::Todo)
                | (Self::Todo, Self::InWork)
                | (Self::InWork, Self::Completed)
        )
    }
}

/// Persisted task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    /// Person or team the task is assigned to.
    pub resource: Option<String>,
    pub project: String,
    pub period_id: Option<PeriodId>,
    pub created_at: NaiveDateTime,
    pub todo_at: Option<NaiveDateTime>,
    pub inwork_at: Option<NaiveDateTime>,
    pub completed_at: Option<NaiveDateTime>,
}

/// Task row joined with the name of the period it is planned into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskHistoryEntry {
    #[serde(flatten)]
    pub task: Task,
    pub period_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::TaskStatus;

    #[test]
    fn lifecycle_moves_forward_only() {
        assert!(TaskStatus::Unassigned.can_move_to(TaskStatus::Todo));
        assert!(TaskStatus::Todo.can_move_to(TaskStatus::InWork));
        assert!(TaskStatus::InWork.can_move_to(TaskStatus::Completed));

        assert!(!TaskStatus::Unassigned.can_move_to(TaskStatus::InWork));
        assert!(!TaskStatus::Todo.can_move_to(TaskStatus::Completed));
        assert!(!TaskStatus::Completed.can_move_to(TaskStatus::Todo));
        assert!(!TaskStatus::InWork.can_move_to(TaskStatus::Todo));
    }

    #[test]
    fn storage_names_roundtrip() {
        for status in [
            TaskStatus::Unassigned,
            TaskStatus::Todo,
            TaskStatus::InWork,
            TaskStatus::Completed,
        ] {
            assert_eq!(TaskStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TaskStatus::parse("done"), None);
    }
}
