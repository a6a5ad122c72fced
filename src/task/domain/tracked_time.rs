//! Whole hours and minutes spent on a task.

use super::TaskDomainError;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Elapsed time truncated to whole hours plus the remaining whole minutes.
///
/// Orders by hours, then minutes.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "RawTrackedTime")]
pub struct TrackedTime {
    hours: i64,
    minutes: i64,
}

/// Unchecked serialized form, validated through [`TrackedTime::new`].
#[derive(Deserialize)]
struct RawTrackedTime {
    hours: i64,
    minutes: i64,
}

impl TryFrom<RawTrackedTime> for TrackedTime {
    type Error = TaskDomainError;

    fn try_from(raw: RawTrackedTime) -> Result<Self, Self::Error> {
        Self::new(raw.hours, raw.minutes)
    }
}

impl TrackedTime {
    /// Minutes per hour.
    const MINUTES_PER_HOUR: i64 = 60;

    /// Time tracked by a task that has not been stopped.
    pub const ZERO: Self = Self {
        hours: 0,
        minutes: 0,
    };

    /// Creates a tracked time from stored parts.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTrackedTime`] when either part is
    /// negative or `minutes` is 60 or more.
    pub const fn new(hours: i64, minutes: i64) -> Result<Self, TaskDomainError> {
        if hours < 0 || minutes < 0 || minutes >= Self::MINUTES_PER_HOUR {
            return Err(TaskDomainError::InvalidTrackedTime { hours, minutes });
        }
        Ok(Self { hours, minutes })
    }

    /// Derives the tracked time between two instants.
    ///
    /// Both parts truncate: 90 minutes is `1h 30m` and 59 seconds is
    /// `0h 0m`. An end before the start counts as no time at all.
    #[must_use]
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let elapsed = end.signed_duration_since(start).max(TimeDelta::zero());
        Self {
            hours: elapsed.num_hours(),
            minutes: elapsed.num_minutes().rem_euclid(Self::MINUTES_PER_HOUR),
        }
    }

    /// Whole hours.
    #[must_use]
    pub const fn hours(self) -> i64 {
        self.hours
    }

    /// Minutes past the last whole hour.
    #[must_use]
    pub const fn minutes(self) -> i64 {
        self.minutes
    }
}

impl fmt::Display for TrackedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.hours, self.minutes)
    }
}
