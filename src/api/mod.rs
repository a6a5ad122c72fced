//! JSON HTTP surface.
//!
//! Handlers talk to a [`TrackerApi`] rather than to the services directly.
//! [`LocalTracker`] implements it in-process and translates service errors
//! into [`TrackerError`], which the handlers render as RFC 9457 problem
//! documents.

mod contract;
mod dto;
mod gateway;
mod handlers;
mod problem;
mod routes;

pub use contract::{SharedTracker, TrackerApi, TrackerError, TrackerResult};
pub use dto::{
    CreateUserBody, DeletedUserDto, HealthDto, StartTaskBody, StopTaskBody, TaskDto,
    UpdateUserBody, UserDto,
};
pub use gateway::LocalTracker;
pub use problem::{APPLICATION_PROBLEM_JSON, Problem, ProblemResponse};
pub use routes::router;
