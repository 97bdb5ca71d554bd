//! Kanban domain model.
//!
//! # Responsibility
//! - Define periods, tasks and the task lifecycle.
//! - Own input validation and the domain error type.
//!
//! # Invariants
//! - Rows are only written after passing `validation`.

pub mod period;
pub mod task;
pub mod validation;
