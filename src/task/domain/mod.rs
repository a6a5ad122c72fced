//! Domain model for task time tracking.
//!
//! Elapsed time is derived from the start and end timestamps only, so the
//! same pair always yields the same [`TrackedTime`].

mod error;
mod ids;
mod range;
mod task;
mod tracked_time;

pub use error::TaskDomainError;
pub use ids::TaskId;
pub use range::TaskTimeRange;
pub use task::{NewTask, PersistedTaskData, Task, TaskState};
pub use tracked_time::TrackedTime;
