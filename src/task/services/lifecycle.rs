//! Service layer for starting, stopping, and reporting tasks.

use crate::mirror::MirrorPublisher;
use crate::task::{
    domain::{NewTask, Task, TaskDomainError, TaskId, TaskTimeRange},
    ports::{TaskRepository, TaskRepositoryError},
};
use crate::user::domain::UserId;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument};

/// Request payload for starting a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTaskRequest {
    user_id: UserId,
    name: String,
}

impl StartTaskRequest {
    /// Creates a request to start tracking `name` for `user_id`.
    #[must_use]
    pub fn new(user_id: UserId, name: impl Into<String>) -> Self {
        Self {
            user_id,
            name: name.into(),
        }
    }
}

/// Identifies the task a stop request refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopSelector {
    /// The running task of the user with the latest start time.
    LatestForUser(UserId),
    /// A task by identifier, optionally required to belong to a user.
    ById {
        /// Expected owner, if the caller scoped the request to a user.
        user_id: Option<UserId>,
        /// Task to stop.
        task_id: TaskId,
    },
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation or transition failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// The user has no running task to stop.
    #[error("no active task found for user {0}")]
    NoActiveTask(UserId),
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    mirror: MirrorPublisher,
    clock: Arc<C>,
}

impl<R, C> TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, mirror: MirrorPublisher, clock: Arc<C>) -> Self {
        Self {
            repository,
            mirror,
            clock,
        }
    }

    /// Starts a running task for an existing user.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::OwnerNotFound`] (wrapped) when the user
    /// does not exist, [`TaskRepositoryError::ActiveTaskExists`] when the
    /// user already has a running task, and [`TaskDomainError::EmptyTaskName`]
    /// for a blank name. No task is created on error.
    #[instrument(name = "task.start", skip(self, request), fields(user_id = %request.user_id))]
    pub async fn start_task(&self, request: StartTaskRequest) -> TaskLifecycleResult<Task> {
        let new_task = NewTask::start(request.user_id, request.name, &*self.clock)?;
        let task = self.repository.insert(&new_task).await?;
        info!(task_id = %task.id(), "task started");
        self.mirror.task_inserted(&task).await;
        Ok(task)
    }

    /// Stops the selected running task and fixes its tracked time.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NoActiveTask`] when the user has no
    /// running task, [`TaskRepositoryError::NotFound`] (wrapped) when the task
    /// does not exist or belongs to another user, and
    /// [`TaskDomainError::AlreadyStopped`] or
    /// [`TaskRepositoryError::NotRunning`] when it was stopped already.
    #[instrument(name = "task.stop", skip(self))]
    pub async fn stop_task(&self, selector: StopSelector) -> TaskLifecycleResult<Task> {
        let mut task = self.select(selector).await?;
        task.stop(&*self.clock)?;
        self.repository.record_stop(&task).await?;
        info!(
            task_id = %task.id(),
            tracked = %task.tracked_time(),
            "task stopped"
        );
        self.mirror.task_updated(&task).await;
        Ok(task)
    }

    /// Lists the tasks of a user, longest tracked time first.
    ///
    /// An unknown user simply has no tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the listing fails.
    #[instrument(name = "task.list", skip(self), fields(user_id = %user_id))]
    pub async fn list_user_tasks(
        &self,
        user_id: UserId,
        range: Option<TaskTimeRange>,
    ) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.repository.list_for_user(user_id, range).await?)
    }

    /// Retrieves a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn find_task(&self, id: TaskId) -> TaskLifecycleResult<Option<Task>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    async fn select(&self, selector: StopSelector) -> TaskLifecycleResult<Task> {
        match selector {
            StopSelector::LatestForUser(user_id) => self
                .repository
                .find_active_for_user(user_id)
                .await?
                .ok_or(TaskLifecycleError::NoActiveTask(user_id)),
            StopSelector::ById { user_id, task_id } => {
                let task = self
                    .repository
                    .find_by_id(task_id)
                    .await?
                    .ok_or(TaskRepositoryError::NotFound(task_id))?;
                if user_id.is_some_and(|owner| owner != task.user_id()) {
                    return Err(TaskRepositoryError::NotFound(task_id).into());
                }
                Ok(task)
            }
        }
    }
}
