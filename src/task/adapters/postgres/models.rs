//! Diesel row models for task persistence.

use crate::store::postgres::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub hours: i64,
    pub minutes: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
///
/// `id` is left to the serial sequence unless the task is being restored.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    pub id: Option<i64>,
    pub user_id: i64,
    pub name: String,
    pub hours: i64,
    pub minutes: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Columns written when a running task is stopped.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
pub struct StopTaskChangeset {
    pub hours: i64,
    pub minutes: i64,
    pub end_time: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
