//! Port for transactional cascade operations.

use crate::task::domain::TaskId;
use crate::user::domain::UserId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for cascade operations.
pub type CascadeResult<T> = Result<T, CascadeError>;

/// Steps available inside a cascade transaction.
///
/// Every step runs against the same open transaction; nothing is visible to
/// other callers until the enclosing unit of work returns `Ok`.
pub trait CascadeTransaction {
    /// Locks the user row for the rest of the transaction.
    ///
    /// Returns `false` when the user does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::Persistence`] when the store fails.
    fn lock_user(&mut self, user_id: UserId) -> CascadeResult<bool>;

    /// Deletes every task of the user and returns their identifiers in
    /// ascending order.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::Persistence`] when the store fails.
    fn delete_tasks_for_user(&mut self, user_id: UserId) -> CascadeResult<Vec<TaskId>>;

    /// Deletes the user row.
    ///
    /// Returns `false` when no row was removed.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::Persistence`] when the store fails.
    fn delete_user(&mut self, user_id: UserId) -> CascadeResult<bool>;
}

/// Store able to run a unit of work atomically.
#[async_trait]
pub trait CascadeStore: Send + Sync {
    /// Runs `work` in one transaction, committing only when it returns `Ok`.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `work`, after rolling back every step,
    /// or [`CascadeError::Persistence`] when the transaction itself fails.
    async fn run_in_transaction<T, F>(&self, work: F) -> CascadeResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut dyn CascadeTransaction) -> CascadeResult<T> + Send + 'static;
}

/// Errors returned by cascade operations.
#[derive(Debug, Clone, Error)]
pub enum CascadeError {
    /// The user does not exist.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl CascadeError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
