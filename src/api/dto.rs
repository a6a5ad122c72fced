//! Wire types for the HTTP surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::consistency::services::DeletedUser;
use crate::task::domain::Task;
use crate::user::domain::User;
use crate::user::services::{CreateUserRequest, UpdateUserRequest};

/// Body of `POST /users`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserBody {
    /// Passport as `"SSSS NNNNNN"`.
    pub passport_number: String,
    /// Family name.
    pub surname: String,
    /// Given name.
    pub name: String,
    /// Optional patronymic.
    #[serde(default)]
    pub patronymic: Option<String>,
    /// Postal address; empty when omitted.
    #[serde(default)]
    pub address: String,
}

impl From<CreateUserBody> for CreateUserRequest {
    fn from(body: CreateUserBody) -> Self {
        let request = Self::new(body.passport_number, body.surname, body.name, body.address);
        match body.patronymic {
            Some(patronymic) => request.with_patronymic(patronymic),
            None => request,
        }
    }
}

/// Body of `PATCH /users/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateUserBody {
    /// Passport as `"SSSS NNNNNN"`.
    pub passport_number: Option<String>,
    /// Replacement family name.
    pub surname: Option<String>,
    /// Replacement given name.
    pub name: Option<String>,
    /// An empty string clears the patronymic.
    pub patronymic: Option<String>,
    /// Replacement postal address.
    pub address: Option<String>,
}

impl From<UpdateUserBody> for UpdateUserRequest {
    fn from(body: UpdateUserBody) -> Self {
        let mut request = Self::new();
        if let Some(passport) = body.passport_number {
            request = request.with_passport(passport);
        }
        if let Some(surname) = body.surname {
            request = request.with_surname(surname);
        }
        if let Some(name) = body.name {
            request = request.with_name(name);
        }
        if let Some(patronymic) = body.patronymic {
            request = request.with_patronymic(patronymic);
        }
        if let Some(address) = body.address {
            request = request.with_address(address);
        }
        request
    }
}

/// Body of `POST /users/{id}/tasks/start`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StartTaskBody {
    /// Task name.
    pub name: String,
}

/// Optional body of `POST /users/{id}/tasks/stop`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StopTaskBody {
    /// Task to stop; when absent the user's latest running task is stopped.
    pub task_id: Option<i64>,
}

/// User representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    /// Store-assigned identifier.
    pub id: i64,
    /// Four-digit passport series.
    pub passport_series: String,
    /// Six-digit passport number.
    pub passport_number: String,
    /// Family name.
    pub surname: String,
    /// Given name.
    pub name: String,
    /// Patronymic, if any.
    pub patronymic: Option<String>,
    /// Postal address.
    pub address: String,
    /// Registration time.
    pub created_at: DateTime<Utc>,
    /// Latest update time.
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        let profile = user.profile();
        Self {
            id: user.id().value(),
            passport_series: user.passport().series().as_str().to_owned(),
            passport_number: user.passport().number().as_str().to_owned(),
            surname: profile.surname().to_owned(),
            name: profile.name().to_owned(),
            patronymic: profile.patronymic().map(str::to_owned),
            address: profile.address().to_owned(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        }
    }
}

/// Task representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDto {
    /// Store-assigned identifier.
    pub id: i64,
    /// Owning user.
    pub user_id: i64,
    /// Task name.
    pub name: String,
    /// Whole hours tracked; zero while running.
    pub hours: i64,
    /// Minutes past the last whole hour.
    pub minutes: i64,
    /// `running` or `stopped`.
    pub state: String,
    /// When tracking started.
    pub start_time: DateTime<Utc>,
    /// When tracking stopped; absent while running.
    pub end_time: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Latest update time.
    pub updated_at: DateTime<Utc>,
}

impl From<&Task> for TaskDto {
    fn from(task: &Task) -> Self {
        let tracked = task.tracked_time();
        Self {
            id: task.id().value(),
            user_id: task.user_id().value(),
            name: task.name().to_owned(),
            hours: tracked.hours(),
            minutes: tracked.minutes(),
            state: task.state().as_str().to_owned(),
            start_time: task.start_time(),
            end_time: task.end_time(),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
        }
    }
}

/// Result of `DELETE /users/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedUserDto {
    /// Removed user.
    pub user_id: i64,
    /// Tasks removed with the user.
    pub deleted_task_ids: Vec<i64>,
}

impl From<&DeletedUser> for DeletedUserDto {
    fn from(deleted: &DeletedUser) -> Self {
        Self {
            user_id: deleted.user_id.value(),
            deleted_task_ids: deleted.task_ids.iter().map(|id| id.value()).collect(),
        }
    }
}

/// Result of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthDto {
    /// Always `"ok"`.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// Query of `GET /users`. Values are kept raw so that junk falls back to
/// the defaults instead of failing the request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ListUsersQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Query of `GET /users/{id}/tasks`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct TaskRangeQuery {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}
