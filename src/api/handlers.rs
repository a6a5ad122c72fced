//! Axum handlers translating HTTP requests into tracker calls.

use axum::{
    Json,
    body::Bytes,
    extract::{OriginalUri, Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::debug;

use super::dto::{
    CreateUserBody, DeletedUserDto, HealthDto, ListUsersQuery, StartTaskBody, StopTaskBody,
    TaskDto, TaskRangeQuery, UpdateUserBody, UserDto,
};
use super::{Problem, ProblemResponse, SharedTracker, TrackerError};
use crate::task::domain::{TaskId, TaskTimeRange};
use crate::task::services::{StartTaskRequest, StopSelector};
use crate::user::domain::{Pagination, UserId};

type ApiResult<T> = Result<T, ProblemResponse>;

/// Maps tracker failures to problem responses for one request path.
struct RequestContext {
    path: String,
}

impl RequestContext {
    fn new(uri: &OriginalUri) -> Self {
        Self {
            path: uri.0.path().to_owned(),
        }
    }

    fn fail(&self, err: &TrackerError) -> ProblemResponse {
        Problem::from_tracker_error(err, &self.path).into()
    }

    fn invalid(&self, detail: impl Into<String>) -> ProblemResponse {
        self.fail(&TrackerError::Validation(detail.into()))
    }

    fn user_id(&self, raw: &str) -> ApiResult<UserId> {
        raw.parse::<i64>()
            .map_err(|_| self.invalid(format!("invalid user id '{raw}'")))
            .and_then(|value| UserId::new(value).map_err(|err| self.invalid(err.to_string())))
    }

    fn body<T>(&self, body: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
        body.map(|Json(value)| value)
            .map_err(|rejection| self.invalid(rejection.body_text()))
    }
}

pub(super) async fn health() -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
    })
}

pub(super) async fn list_users(
    State(tracker): State<SharedTracker>,
    uri: OriginalUri,
    Query(query): Query<ListUsersQuery>,
) -> ApiResult<Json<Vec<UserDto>>> {
    let ctx = RequestContext::new(&uri);
    let page = Pagination::from_query(
        query.page.and_then(|raw| raw.trim().parse().ok()),
        query.limit.and_then(|raw| raw.trim().parse().ok()),
    );
    let users = tracker
        .list_users(page)
        .await
        .map_err(|err| ctx.fail(&err))?;
    Ok(Json(users.iter().map(UserDto::from).collect()))
}

pub(super) async fn create_user(
    State(tracker): State<SharedTracker>,
    uri: OriginalUri,
    payload: Result<Json<CreateUserBody>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let ctx = RequestContext::new(&uri);
    let body = ctx.body(payload)?;
    let user = tracker
        .create_user(body.into())
        .await
        .map_err(|err| ctx.fail(&err))?;
    Ok((StatusCode::CREATED, Json(UserDto::from(&user))))
}

pub(super) async fn update_user(
    State(tracker): State<SharedTracker>,
    uri: OriginalUri,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUserBody>, JsonRejection>,
) -> ApiResult<Json<UserDto>> {
    let ctx = RequestContext::new(&uri);
    let user_id = ctx.user_id(&id)?;
    let body = ctx.body(payload)?;
    let user = tracker
        .update_user(user_id, body.into())
        .await
        .map_err(|err| ctx.fail(&err))?;
    Ok(Json(UserDto::from(&user)))
}

pub(super) async fn delete_user(
    State(tracker): State<SharedTracker>,
    uri: OriginalUri,
    Path(id): Path<String>,
) -> ApiResult<Json<DeletedUserDto>> {
    let ctx = RequestContext::new(&uri);
    let user_id = ctx.user_id(&id)?;
    let deleted = tracker
        .delete_user(user_id)
        .await
        .map_err(|err| ctx.fail(&err))?;
    Ok(Json(DeletedUserDto::from(&deleted)))
}

pub(super) async fn list_user_tasks(
    State(tracker): State<SharedTracker>,
    uri: OriginalUri,
    Path(id): Path<String>,
    Query(query): Query<TaskRangeQuery>,
) -> ApiResult<Json<Vec<TaskDto>>> {
    let ctx = RequestContext::new(&uri);
    let user_id = ctx.user_id(&id)?;
    // The window applies only when both bounds are given.
    let range = match (query.start_time.as_deref(), query.end_time.as_deref()) {
        (Some(start), Some(end)) => Some(
            TaskTimeRange::parse(start, end).map_err(|err| ctx.invalid(err.to_string()))?,
        ),
        _ => None,
    };
    let tasks = tracker
        .list_user_tasks(user_id, range)
        .await
        .map_err(|err| ctx.fail(&err))?;
    Ok(Json(tasks.iter().map(TaskDto::from).collect()))
}

pub(super) async fn start_task(
    State(tracker): State<SharedTracker>,
    uri: OriginalUri,
    Path(id): Path<String>,
    payload: Result<Json<StartTaskBody>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let ctx = RequestContext::new(&uri);
    let user_id = ctx.user_id(&id)?;
    let body = ctx.body(payload)?;
    let task = tracker
        .start_task(StartTaskRequest::new(user_id, body.name))
        .await
        .map_err(|err| ctx.fail(&err))?;
    Ok((StatusCode::CREATED, Json(TaskDto::from(&task))))
}

pub(super) async fn stop_task(
    State(tracker): State<SharedTracker>,
    uri: OriginalUri,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<TaskDto>> {
    let ctx = RequestContext::new(&uri);
    let user_id = ctx.user_id(&id)?;
    let selector = stop_selector(&ctx, user_id, &body)?;
    debug!(?selector, "stop requested");
    let task = tracker
        .stop_task(selector)
        .await
        .map_err(|err| ctx.fail(&err))?;
    Ok(Json(TaskDto::from(&task)))
}

pub(super) async fn fallback(uri: OriginalUri) -> ProblemResponse {
    let ctx = RequestContext::new(&uri);
    ctx.fail(&TrackerError::NotFound(format!("no route for {}", ctx.path)))
}

fn stop_selector(ctx: &RequestContext, user_id: UserId, body: &[u8]) -> ApiResult<StopSelector> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(StopSelector::LatestForUser(user_id));
    }
    let parsed: StopTaskBody =
        serde_json::from_slice(body).map_err(|err| ctx.invalid(format!("invalid body: {err}")))?;
    match parsed.task_id {
        None => Ok(StopSelector::LatestForUser(user_id)),
        Some(raw) => {
            let task_id = TaskId::new(raw).map_err(|err| ctx.invalid(err.to_string()))?;
            Ok(StopSelector::ById {
                user_id: Some(user_id),
                task_id,
            })
        }
    }
}
