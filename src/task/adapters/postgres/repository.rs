//! `PostgreSQL` repository implementation for task storage.

use std::sync::Arc;

use super::models::{NewTaskRow, StopTaskChangeset, TaskRow};
use crate::store::PostgresStore;
use crate::store::postgres::blocking::{BoxError, with_connection};
use crate::store::postgres::schema::tasks;
use crate::task::{
    domain::{NewTask, PersistedTaskData, Task, TaskId, TaskTimeRange, TrackedTime},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use crate::user::domain::UserId;
use async_trait::async_trait;
use diesel::dsl::max;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// Partial unique index allowing one row with a null `end_time` per user.
const ONE_ACTIVE_TASK_INDEX: &str = "tasks_one_active_per_user";

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    store: PostgresStore,
}

impl PostgresTaskRepository {
    /// Creates a repository over the shared store handle.
    #[must_use]
    pub const fn new(store: PostgresStore) -> Self {
        Self { store }
    }

    async fn run<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        with_connection(self.store.pool(), boxed, f).await
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn insert(&self, task: &NewTask) -> TaskRepositoryResult<Task> {
        let user_id = task.user_id();
        let row = NewTaskRow {
            id: None,
            user_id: user_id.value(),
            name: task.name().to_owned(),
            hours: 0,
            minutes: 0,
            start_time: task.start_time(),
            end_time: None,
            created_at: task.start_time(),
            updated_at: task.start_time(),
        };
        self.run(move |connection| {
            let stored = diesel::insert_into(tasks::table)
                .values(&row)
                .returning(TaskRow::as_returning())
                .get_result::<TaskRow>(connection)
                .map_err(|err| map_insert_error(err, user_id, None))?;
            row_to_task(stored)
        })
        .await
    }

    async fn restore(&self, task: &Task) -> TaskRepositoryResult<()> {
        let user_id = task.user_id();
        let task_id = task.id();
        let tracked = task.tracked_time();
        let row = NewTaskRow {
            id: Some(task_id.value()),
            user_id: user_id.value(),
            name: task.name().to_owned(),
            hours: tracked.hours(),
            minutes: tracked.minutes(),
            start_time: task.start_time(),
            end_time: task.end_time(),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
        };
        self.run(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| map_insert_error(err, user_id, Some(task_id)))?;
            Ok(())
        })
        .await
    }

    async fn record_stop(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let end_time = task
            .end_time()
            .ok_or(TaskRepositoryError::NotRunning(task_id))?;
        let tracked = task.tracked_time();
        let changeset = StopTaskChangeset {
            hours: tracked.hours(),
            minutes: tracked.minutes(),
            end_time,
            updated_at: task.updated_at(),
        };
        self.run(move |connection| {
            // The `end_time IS NULL` guard makes concurrent stops race on the
            // row: exactly one of them updates it.
            let updated = diesel::update(
                tasks::table
                    .filter(tasks::id.eq(task_id.value()))
                    .filter(tasks::end_time.is_null()),
            )
            .set(&changeset)
            .execute(connection)
            .map_err(TaskRepositoryError::persistence)?;
            if updated > 0 {
                return Ok(());
            }

            let exists = tasks::table
                .filter(tasks::id.eq(task_id.value()))
                .select(tasks::id)
                .first::<i64>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            Err(match exists {
                Some(_) => TaskRepositoryError::NotRunning(task_id),
                None => TaskRepositoryError::NotFound(task_id),
            })
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.value()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn find_active_for_user(&self, user_id: UserId) -> TaskRepositoryResult<Option<Task>> {
        self.run(move |connection| {
            let row = tasks::table
                .filter(tasks::user_id.eq(user_id.value()))
                .filter(tasks::end_time.is_null())
                .order((tasks::start_time.desc(), tasks::id.desc()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        range: Option<TaskTimeRange>,
    ) -> TaskRepositoryResult<Vec<Task>> {
        self.run(move |connection| {
            let mut query = tasks::table
                .filter(tasks::user_id.eq(user_id.value()))
                .select(TaskRow::as_select())
                .into_boxed();
            if let Some(window) = range {
                query = query.filter(tasks::start_time.ge(window.lower_bound()));
                query = match window.upper_bound() {
                    Some(bound) => query.filter(tasks::end_time.lt(bound)),
                    None => query.filter(tasks::end_time.is_not_null()),
                };
            }
            let rows = query
                .order((tasks::hours.desc(), tasks::minutes.desc(), tasks::id.asc()))
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn next_free_id(&self) -> TaskRepositoryResult<TaskId> {
        self.run(|connection| {
            let current = tasks::table
                .select(max(tasks::id))
                .first::<Option<i64>>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            TaskId::new(current.unwrap_or(0).saturating_add(1))
                .map_err(TaskRepositoryError::persistence)
        })
        .await
    }
}

fn boxed(err: BoxError) -> TaskRepositoryError {
    TaskRepositoryError::Persistence(Arc::from(err))
}

fn map_insert_error(
    err: DieselError,
    user_id: UserId,
    task_id: Option<TaskId>,
) -> TaskRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
            if is_active_task_violation(info.as_ref()) =>
        {
            TaskRepositoryError::ActiveTaskExists(user_id)
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => match task_id {
            Some(id) => TaskRepositoryError::DuplicateTask(id),
            None => TaskRepositoryError::persistence(err),
        },
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            TaskRepositoryError::OwnerNotFound(user_id)
        }
        _ => TaskRepositoryError::persistence(err),
    }
}

fn is_active_task_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == ONE_ACTIVE_TASK_INDEX)
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        user_id,
        name,
        hours,
        minutes,
        start_time,
        end_time,
        created_at,
        updated_at,
    } = row;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::new(id).map_err(TaskRepositoryError::persistence)?,
        user_id: UserId::new(user_id).map_err(TaskRepositoryError::persistence)?,
        name,
        tracked: TrackedTime::new(hours, minutes).map_err(TaskRepositoryError::persistence)?,
        start_time,
        end_time,
        created_at,
        updated_at,
    }))
}
