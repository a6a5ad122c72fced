//! Service orchestration for task time tracking.

mod lifecycle;

pub use lifecycle::{
    StartTaskRequest, StopSelector, TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService,
};
