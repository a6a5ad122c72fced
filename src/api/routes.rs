//! Route table.

use axum::{
    Router,
    routing::{get, patch, post},
};
use tower_http::trace::TraceLayer;

use super::{SharedTracker, handlers};

/// Builds the application router around a tracker.
pub fn router(api: SharedTracker) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route(
            "/users/{id}",
            patch(handlers::update_user).delete(handlers::delete_user),
        )
        .route("/users/{id}/tasks", get(handlers::list_user_tasks))
        .route("/users/{id}/tasks/start", post(handlers::start_task))
        .route("/users/{id}/tasks/stop", post(handlers::stop_task))
        .fallback(handlers::fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(api)
}
