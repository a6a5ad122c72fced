//! `PostgreSQL` adapter for user persistence.

mod models;
mod repository;

pub use repository::PostgresUserRepository;
