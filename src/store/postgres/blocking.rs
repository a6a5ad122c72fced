//! Helpers for running synchronous Diesel work off the async executor.

use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, PoolError, PooledConnection};

use super::PgPool;

/// Pooled connection checked out for one unit of work.
pub(crate) type PooledConn = PooledConnection<ConnectionManager<PgConnection>>;

/// Runs blocking work on the blocking thread pool, mapping join failures
/// into the caller's error type.
pub(crate) async fn run_blocking_with<F, T, E, M>(f: F, map_err: M) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    M: FnOnce(tokio::task::JoinError) -> E,
{
    tokio::task::spawn_blocking(f).await.map_err(map_err)?
}

/// Checks out a connection with a caller-provided error mapper.
pub(crate) fn get_conn_with<E, M>(pool: &PgPool, map_err: M) -> Result<PooledConn, E>
where
    M: FnOnce(PoolError) -> E,
{
    pool.get().map_err(map_err)
}

/// Converts an infrastructure failure into a port error.
pub(crate) type WrapError<E> = fn(BoxError) -> E;

/// Boxed infrastructure failure.
pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Checks out a connection and runs `f` on the blocking thread pool.
///
/// `wrap` converts both pool and join failures into the caller's error type.
pub(crate) async fn with_connection<F, T, E>(pool: &PgPool, wrap: WrapError<E>, f: F) -> Result<T, E>
where
    F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    let pool = pool.clone();
    run_blocking_with(
        move || {
            let mut connection = get_conn_with(&pool, |err| wrap(Box::new(err)))?;
            f(&mut connection)
        },
        |err| wrap(Box::new(err)),
    )
    .await
}
