//! Contract between the HTTP handlers and the tracker core.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::consistency::services::DeletedUser;
use crate::task::domain::{Task, TaskTimeRange};
use crate::task::services::{StartTaskRequest, StopSelector};
use crate::user::domain::{Pagination, User, UserId};
use crate::user::services::{CreateUserRequest, UpdateUserRequest};

/// Result type for tracker operations.
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Handle to a tracker shared by all request handlers.
pub type SharedTracker = Arc<dyn TrackerApi>;

/// Caller-facing error categories. Details of store failures are logged
/// where they happen and never carried here.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TrackerError {
    /// The input is malformed.
    #[error("{0}")]
    Validation(String),
    /// A referenced user or task does not exist.
    #[error("{0}")]
    NotFound(String),
    /// The request clashes with the current state.
    #[error("{0}")]
    Conflict(String),
    /// The store failed.
    #[error("internal error")]
    Internal,
}

/// Operations exposed over HTTP.
#[async_trait]
pub trait TrackerApi: Send + Sync {
    /// Returns one page of users.
    async fn list_users(&self, page: Pagination) -> TrackerResult<Vec<User>>;

    /// Registers a user.
    async fn create_user(&self, request: CreateUserRequest) -> TrackerResult<User>;

    /// Partially updates a user.
    async fn update_user(&self, id: UserId, request: UpdateUserRequest) -> TrackerResult<User>;

    /// Deletes a user together with its tasks.
    async fn delete_user(&self, id: UserId) -> TrackerResult<DeletedUser>;

    /// Lists a user's tasks, optionally within a day window.
    async fn list_user_tasks(
        &self,
        user_id: UserId,
        range: Option<TaskTimeRange>,
    ) -> TrackerResult<Vec<Task>>;

    /// Starts a task.
    async fn start_task(&self, request: StartTaskRequest) -> TrackerResult<Task>;

    /// Stops a task.
    async fn stop_task(&self, selector: StopSelector) -> TrackerResult<Task>;
}
