//! Port definitions for task persistence.

mod repository;

pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
