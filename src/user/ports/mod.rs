//! Port definitions for user persistence.

mod repository;

pub use repository::{UserRepository, UserRepositoryError, UserRepositoryResult};
