//! Error types for task domain validation and transitions.

use super::TaskId;
use chrono::NaiveDate;
use thiserror::Error;

/// Errors returned while constructing or transitioning domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task identifier is not a positive integer.
    #[error("invalid task id {0}, expected a positive integer")]
    InvalidTaskId(i64),

    /// The task name is empty after trimming.
    #[error("task name must not be empty")]
    EmptyTaskName,

    /// The task name is longer than the store accepts.
    #[error("task name must be at most {max} characters")]
    TaskNameTooLong {
        /// Largest accepted length in characters.
        max: usize,
    },

    /// Hours or minutes are negative, or minutes are not below 60.
    #[error("invalid tracked time {hours}h {minutes}m")]
    InvalidTrackedTime {
        /// Whole hours.
        hours: i64,
        /// Remaining minutes.
        minutes: i64,
    },

    /// The task has already been stopped.
    #[error("task {0} is already stopped")]
    AlreadyStopped(TaskId),

    /// A date could not be parsed as `YYYY-MM-DD`.
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    /// The range ends before it starts.
    #[error("invalid time range: {start} is after {end}")]
    InvalidTimeRange {
        /// First day of the range.
        start: NaiveDate,
        /// Last day of the range.
        end: NaiveDate,
    },
}
