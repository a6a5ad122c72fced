//! `PostgreSQL` cascade transactions.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::Error as DieselError;

use crate::consistency::ports::{CascadeError, CascadeResult, CascadeStore, CascadeTransaction};
use crate::store::PostgresStore;
use crate::store::postgres::blocking::{BoxError, with_connection};
use crate::store::postgres::schema::{tasks, users};
use crate::task::domain::TaskId;
use crate::user::domain::UserId;

/// `PostgreSQL`-backed cascade store.
#[derive(Debug, Clone)]
pub struct PostgresCascadeStore {
    store: PostgresStore,
}

impl PostgresCascadeStore {
    /// Creates a cascade store over the shared store handle.
    #[must_use]
    pub const fn new(store: PostgresStore) -> Self {
        Self { store }
    }
}

impl From<DieselError> for CascadeError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

struct PgTransaction<'a> {
    connection: &'a mut PgConnection,
}

impl CascadeTransaction for PgTransaction<'_> {
    fn lock_user(&mut self, user_id: UserId) -> CascadeResult<bool> {
        let locked = users::table
            .filter(users::id.eq(user_id.value()))
            .select(users::id)
            .for_update()
            .first::<i64>(&mut *self.connection)
            .optional()?;
        Ok(locked.is_some())
    }

    fn delete_tasks_for_user(&mut self, user_id: UserId) -> CascadeResult<Vec<TaskId>> {
        let mut removed = diesel::delete(tasks::table.filter(tasks::user_id.eq(user_id.value())))
            .returning(tasks::id)
            .get_results::<i64>(&mut *self.connection)?;
        removed.sort_unstable();
        removed
            .into_iter()
            .map(|id| TaskId::new(id).map_err(CascadeError::persistence))
            .collect()
    }

    fn delete_user(&mut self, user_id: UserId) -> CascadeResult<bool> {
        let removed = diesel::delete(users::table.filter(users::id.eq(user_id.value())))
            .execute(&mut *self.connection)?;
        Ok(removed > 0)
    }
}

#[async_trait]
impl CascadeStore for PostgresCascadeStore {
    async fn run_in_transaction<T, F>(&self, work: F) -> CascadeResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut dyn CascadeTransaction) -> CascadeResult<T> + Send + 'static,
    {
        with_connection(self.store.pool(), boxed, move |connection| {
            connection.transaction::<T, CascadeError, _>(|tx| {
                let mut transaction = PgTransaction { connection: tx };
                work(&mut transaction)
            })
        })
        .await
    }
}

fn boxed(err: BoxError) -> CascadeError {
    CascadeError::Persistence(Arc::from(err))
}
