//! In-process [`TrackerApi`] backed by the domain services.

use async_trait::async_trait;
use mockable::Clock;
use tracing::error;

use super::{TrackerApi, TrackerError, TrackerResult};
use crate::consistency::ports::{CascadeError, CascadeStore};
use crate::consistency::services::{DeletedUser, UserDeletionError, UserDeletionService};
use crate::task::domain::{Task, TaskDomainError, TaskTimeRange};
use crate::task::ports::{TaskRepository, TaskRepositoryError};
use crate::task::services::{
    StartTaskRequest, StopSelector, TaskLifecycleError, TaskLifecycleService,
};
use crate::user::domain::{Pagination, User, UserId};
use crate::user::ports::{UserRepository, UserRepositoryError};
use crate::user::services::{
    CreateUserRequest, UpdateUserRequest, UserDirectoryError, UserDirectoryService,
};

/// Tracker that calls the services directly.
pub struct LocalTracker<U, T, D, C>
where
    U: UserRepository,
    T: TaskRepository,
    D: CascadeStore,
    C: Clock + Send + Sync,
{
    users: UserDirectoryService<U, C>,
    tasks: TaskLifecycleService<T, C>,
    deletions: UserDeletionService<D>,
}

impl<U, T, D, C> LocalTracker<U, T, D, C>
where
    U: UserRepository,
    T: TaskRepository,
    D: CascadeStore,
    C: Clock + Send + Sync,
{
    /// Bundles the services behind the tracker contract.
    #[must_use]
    pub const fn new(
        users: UserDirectoryService<U, C>,
        tasks: TaskLifecycleService<T, C>,
        deletions: UserDeletionService<D>,
    ) -> Self {
        Self {
            users,
            tasks,
            deletions,
        }
    }
}

#[async_trait]
impl<U, T, D, C> TrackerApi for LocalTracker<U, T, D, C>
where
    U: UserRepository + 'static,
    T: TaskRepository + 'static,
    D: CascadeStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    async fn list_users(&self, page: Pagination) -> TrackerResult<Vec<User>> {
        self.users.list_users(page).await.map_err(user_error)
    }

    async fn create_user(&self, request: CreateUserRequest) -> TrackerResult<User> {
        self.users.create_user(request).await.map_err(user_error)
    }

    async fn update_user(&self, id: UserId, request: UpdateUserRequest) -> TrackerResult<User> {
        self.users
            .update_user(id, request)
            .await
            .map_err(user_error)
    }

    async fn delete_user(&self, id: UserId) -> TrackerResult<DeletedUser> {
        self.deletions.delete_user(id).await.map_err(deletion_error)
    }

    async fn list_user_tasks(
        &self,
        user_id: UserId,
        range: Option<TaskTimeRange>,
    ) -> TrackerResult<Vec<Task>> {
        self.tasks
            .list_user_tasks(user_id, range)
            .await
            .map_err(task_error)
    }

    async fn start_task(&self, request: StartTaskRequest) -> TrackerResult<Task> {
        self.tasks.start_task(request).await.map_err(task_error)
    }

    async fn stop_task(&self, selector: StopSelector) -> TrackerResult<Task> {
        self.tasks.stop_task(selector).await.map_err(task_error)
    }
}

fn internal(err: &dyn std::error::Error) -> TrackerError {
    error!(error = %err, "store operation failed");
    TrackerError::Internal
}

fn user_error(err: UserDirectoryError) -> TrackerError {
    match err {
        UserDirectoryError::Domain(domain) => TrackerError::Validation(domain.to_string()),
        UserDirectoryError::Repository(UserRepositoryError::NotFound(id)) => {
            TrackerError::NotFound(format!("user {id} not found"))
        }
        UserDirectoryError::Repository(UserRepositoryError::DuplicateUser(id)) => {
            TrackerError::Conflict(format!("user {id} already exists"))
        }
        UserDirectoryError::Repository(UserRepositoryError::Persistence(source)) => {
            internal(&*source)
        }
    }
}

fn task_error(err: TaskLifecycleError) -> TrackerError {
    match err {
        TaskLifecycleError::Domain(TaskDomainError::AlreadyStopped(id)) => {
            TrackerError::Conflict(format!("task {id} is already stopped"))
        }
        TaskLifecycleError::Domain(domain) => TrackerError::Validation(domain.to_string()),
        TaskLifecycleError::NoActiveTask(user_id) => {
            TrackerError::NotFound(format!("no active task found for user {user_id}"))
        }
        TaskLifecycleError::Repository(repository) => match repository {
            TaskRepositoryError::NotFound(id) => {
                TrackerError::NotFound(format!("task {id} not found"))
            }
            TaskRepositoryError::OwnerNotFound(user_id) => {
                TrackerError::NotFound(format!("user {user_id} not found"))
            }
            TaskRepositoryError::ActiveTaskExists(user_id) => {
                TrackerError::Conflict(format!("user {user_id} already has a running task"))
            }
            TaskRepositoryError::NotRunning(id) => {
                TrackerError::Conflict(format!("task {id} is already stopped"))
            }
            TaskRepositoryError::DuplicateTask(id) => {
                TrackerError::Conflict(format!("task {id} already exists"))
            }
            TaskRepositoryError::Persistence(source) => internal(&*source),
        },
    }
}

fn deletion_error(err: UserDeletionError) -> TrackerError {
    match err {
        UserDeletionError::Cascade(CascadeError::UserNotFound(id)) => {
            TrackerError::NotFound(format!("user {id} not found"))
        }
        UserDeletionError::Cascade(CascadeError::Persistence(source)) => {
            internal(&*source)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::domain::TaskId;

    fn task_id() -> TaskId {
        TaskId::new(3).expect("valid task id")
    }

    #[test]
    fn lost_stop_race_is_a_conflict() {
        let err = TaskLifecycleError::Repository(TaskRepositoryError::NotRunning(task_id()));

        assert_eq!(
            task_error(err),
            TrackerError::Conflict("task 3 is already stopped".to_owned())
        );
    }

    #[test]
    fn overlong_task_name_is_a_validation_error() {
        let err = TaskLifecycleError::Domain(TaskDomainError::TaskNameTooLong { max: 255 });

        assert!(matches!(task_error(err), TrackerError::Validation(_)));
    }
}
