//! Use-case services.
//!
//! # Responsibility
//! - Validate input and orchestrate repository calls into use-case APIs.
//! - Keep CLI/UI callers decoupled from storage details.

pub mod period_service;
pub mod task_service;
