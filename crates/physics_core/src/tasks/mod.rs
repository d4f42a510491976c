//! Parallel task execution
//!
//! A [`TaskManager`] owns a fixed set of worker threads and a FIFO of queued
//! work. Work is queued with `add_task*` and run to completion by a single
//! [`TaskManager::execute`] barrier. Queued tasks have no ordering between
//! them, so only independent work belongs here (narrow-phase pair tests are
//! the main client).

mod manager;

pub use manager::{TaskId, TaskManager, WorkerState};

use std::fmt;

use thiserror::Error;

/// A task that panicked or returned an error during [`TaskManager::execute`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFailure {
    /// Identifier returned when the task was queued
    pub task_id: TaskId,
    /// Label given to the task, if any
    pub label: Option<String>,
    /// Panic payload or error message
    pub message: String,
}

impl fmt::Display for TaskFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "task {} ({}): {}", self.task_id, label, self.message),
            None => write!(f, "task {}: {}", self.task_id, self.message),
        }
    }
}

/// Task manager errors
#[derive(Error, Debug)]
pub enum TaskError {
    /// `execute` or `add_task*` was called while another call was still
    /// draining the queue
    #[error("Task manager is already executing")]
    AlreadyExecuting,

    /// The manager has been disposed and accepts no more work
    #[error("Task manager has been disposed")]
    Disposed,

    /// A worker thread could not be started
    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// One or more tasks failed; every other task still ran to completion
    #[error("{} task(s) failed during execute", .0.len())]
    TaskFailures(Vec<TaskFailure>),
}
