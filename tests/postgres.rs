//! `PostgreSQL` integration tests for the repositories and cascade store.
//!
//! These run against the database named by `TASKTRACK_TEST_DATABASE_URL`
//! and are skipped when it is unset. Every test truncates both tables.
//!
//! - `repository_tests`: user and task persistence rules
//! - `cascade_tests`: transactional user removal

mod postgres {
    pub mod helpers;

    mod cascade_tests;
    mod repository_tests;
}
