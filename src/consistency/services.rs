//! Service layer for cascading user removal.

use crate::consistency::ports::{CascadeError, CascadeStore};
use crate::mirror::MirrorPublisher;
use crate::task::domain::TaskId;
use crate::user::domain::UserId;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument};

/// Outcome of a committed user removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedUser {
    /// Removed user.
    pub user_id: UserId,
    /// Tasks removed along with the user, in ascending order.
    pub task_ids: Vec<TaskId>,
}

/// Service-level errors for user removal.
#[derive(Debug, Error)]
pub enum UserDeletionError {
    /// The cascade transaction failed and was rolled back.
    #[error(transparent)]
    Cascade(#[from] CascadeError),
}

/// Result type for user removal.
pub type UserDeletionResult<T> = Result<T, UserDeletionError>;

/// Removes users together with their tasks.
#[derive(Clone)]
pub struct UserDeletionService<S>
where
    S: CascadeStore,
{
    store: Arc<S>,
    mirror: MirrorPublisher,
}

impl<S> UserDeletionService<S>
where
    S: CascadeStore,
{
    /// Creates a new user removal service.
    #[must_use]
    pub const fn new(store: Arc<S>, mirror: MirrorPublisher) -> Self {
        Self { store, mirror }
    }

    /// Deletes a user and every task it owns as one atomic unit.
    ///
    /// Removing a user that does not exist is an error, so a repeated delete
    /// of the same id fails the second time. Mirror entries are written only
    /// after the commit and their failure is logged, not returned.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::UserNotFound`] (wrapped) when the user does
    /// not exist and [`CascadeError::Persistence`] when any step fails; in
    /// both cases the store is left unchanged.
    #[instrument(name = "user.delete", skip(self), fields(user_id = %user_id))]
    pub async fn delete_user(&self, user_id: UserId) -> UserDeletionResult<DeletedUser> {
        let task_ids = self
            .store
            .run_in_transaction(move |tx| {
                if !tx.lock_user(user_id)? {
                    return Err(CascadeError::UserNotFound(user_id));
                }
                let task_ids = tx.delete_tasks_for_user(user_id)?;
                if !tx.delete_user(user_id)? {
                    return Err(CascadeError::UserNotFound(user_id));
                }
                Ok(task_ids)
            })
            .await?;
        info!(removed_tasks = task_ids.len(), "user deleted");

        for task_id in &task_ids {
            self.mirror.task_removed(*task_id).await;
        }
        self.mirror.user_removed(user_id).await;

        Ok(DeletedUser { user_id, task_ids })
    }
}
