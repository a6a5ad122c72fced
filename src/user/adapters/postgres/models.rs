//! Diesel row models for user persistence.

use crate::store::postgres::schema::users;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for user records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: i64,
    pub passport_series: String,
    pub passport_number: String,
    pub surname: String,
    pub name: String,
    pub patronymic: Option<String>,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert model for user records.
///
/// `id` is left to the serial sequence unless the user is being restored.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    pub id: Option<i64>,
    pub passport_series: String,
    pub passport_number: String,
    pub surname: String,
    pub name: String,
    pub patronymic: Option<String>,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full replacement of the mutable user columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users, treat_none_as_null = true)]
pub struct UserChangeset {
    pub passport_series: String,
    pub passport_number: String,
    pub surname: String,
    pub name: String,
    pub patronymic: Option<String>,
    pub address: String,
    pub updated_at: DateTime<Utc>,
}
