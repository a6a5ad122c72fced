//! `PostgreSQL` record store handle.
//!
//! The repositories in `user`, `task`, and `consistency` share one r2d2
//! pool through [`PostgresStore`]. Schema creation is idempotent and runs at
//! startup; there is no separate migration step.

pub(crate) mod blocking;
pub(crate) mod schema;

use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use thiserror::Error;
use tracing::{debug, info};

use blocking::run_blocking_with;

/// `PostgreSQL` connection pool type.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// DDL creating the user and task tables when they are missing.
const CREATE_SCHEMA_SQL: &str =
    include_str!("../../../migrations/2026-10-01-000000_create_users_and_tasks/up.sql");

/// Moves each serial sequence past the largest stored identifier so that
/// rows restored with explicit ids do not collide with new inserts.
const SYNC_SEQUENCES_SQL: &str = "\
SELECT setval(pg_get_serial_sequence('users', 'id'), COALESCE((SELECT MAX(id) FROM users), 0) + 1, false);
SELECT setval(pg_get_serial_sequence('tasks', 'id'), COALESCE((SELECT MAX(id) FROM tasks), 0) + 1, false);";

/// Errors raised while preparing the `PostgreSQL` store.
#[derive(Debug, Error)]
pub enum StoreSetupError {
    /// The connection pool could not be built.
    #[error("failed to build connection pool: {0}")]
    Pool(#[from] PoolError),

    /// A setup statement failed.
    #[error("schema setup failed: {0}")]
    Query(#[from] diesel::result::Error),

    /// The blocking setup task panicked or was cancelled.
    #[error("setup task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Shared handle to the `PostgreSQL` store.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Wraps an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Builds a pool for `database_url`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreSetupError::Pool`] when no connection can be opened
    /// within `connect_timeout`.
    pub fn connect(
        database_url: &str,
        max_connections: u32,
        connect_timeout: Duration,
    ) -> Result<Self, StoreSetupError> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = Pool::builder()
            .max_size(max_connections)
            .connection_timeout(connect_timeout)
            .build(manager)?;
        debug!(max_connections, "postgres pool ready");
        Ok(Self { pool })
    }

    /// Returns the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the tables and indexes if they do not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreSetupError`] when a connection cannot be obtained or
    /// the DDL fails.
    pub async fn ensure_schema(&self) -> Result<(), StoreSetupError> {
        self.batch(CREATE_SCHEMA_SQL).await?;
        info!("database schema ready");
        Ok(())
    }

    /// Re-synchronises the id sequences with the stored rows.
    ///
    /// # Errors
    ///
    /// Returns [`StoreSetupError`] when a connection cannot be obtained or
    /// the statements fail.
    pub async fn sync_sequences(&self) -> Result<(), StoreSetupError> {
        self.batch(SYNC_SEQUENCES_SQL).await?;
        debug!("id sequences synchronised");
        Ok(())
    }

    async fn batch(&self, sql: &'static str) -> Result<(), StoreSetupError> {
        let pool = self.pool.clone();
        run_blocking_with(
            move || {
                let mut connection = pool.get()?;
                connection.batch_execute(sql)?;
                Ok(())
            },
            StoreSetupError::from,
        )
        .await
    }
}
