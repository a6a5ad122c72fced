//! Repository port for task persistence, lookup, and reporting.

use crate::task::domain::{NewTask, Task, TaskId, TaskTimeRange};
use crate::user::domain::UserId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a newly started task and returns it with its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::OwnerNotFound`] when the user does not
    /// exist and [`TaskRepositoryError::ActiveTaskExists`] when the user
    /// already has a running task. Nothing is stored in either case.
    async fn insert(&self, task: &NewTask) -> TaskRepositoryResult<Task>;

    /// Stores a task that already carries an identifier, as when seeding an
    /// empty store from the mirror log.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the identifier is
    /// taken, plus the ownership errors of [`TaskRepository::insert`].
    async fn restore(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists the end time, tracked time, and update time of a stopped
    /// task, but only if the stored row is still running.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist
    /// and [`TaskRepositoryError::NotRunning`] when it was stopped already.
    async fn record_stop(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Finds the running task of a user with the latest start time.
    async fn find_active_for_user(&self, user_id: UserId) -> TaskRepositoryResult<Option<Task>>;

    /// Lists tasks of a user, optionally restricted to a day window.
    ///
    /// Results are ordered by hours descending, then minutes descending,
    /// then identifier ascending.
    async fn list_for_user(
        &self,
        user_id: UserId,
        range: Option<TaskTimeRange>,
    ) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns `max(id) + 1`, or the first identifier when no task exists.
    async fn next_free_id(&self) -> TaskRepositoryResult<TaskId>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The owning user does not exist.
    #[error("user not found: {0}")]
    OwnerNotFound(UserId),

    /// The user already has a running task.
    #[error("user {0} already has a running task")]
    ActiveTaskExists(UserId),

    /// The task is no longer running.
    #[error("task {0} is not running")]
    NotRunning(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
