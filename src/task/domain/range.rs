//! Inclusive day window used to filter task reports.

use super::{Task, TaskDomainError};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// An inclusive `[start, end]` window of UTC calendar days.
///
/// A task falls inside the window when it started on or after the first
/// day and ended before the day after the last. Running tasks have no end
/// and never match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskTimeRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TaskTimeRange {
    /// Wire format of a range bound.
    pub const DATE_FORMAT: &'static str = "%Y-%m-%d";

    /// Creates a validated range.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTimeRange`] when `start` is after
    /// `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, TaskDomainError> {
        if start > end {
            return Err(TaskDomainError::InvalidTimeRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parses a range from two `YYYY-MM-DD` strings.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidDate`] for a malformed bound or
    /// [`TaskDomainError::InvalidTimeRange`] for a reversed range.
    pub fn parse(start: &str, end: &str) -> Result<Self, TaskDomainError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// Earliest accepted start time.
    #[must_use]
    pub fn lower_bound(&self) -> DateTime<Utc> {
        self.start.and_time(NaiveTime::MIN).and_utc()
    }

    /// Exclusive upper bound on end times, or `None` when the window runs to
    /// the last representable day.
    #[must_use]
    pub fn upper_bound(&self) -> Option<DateTime<Utc>> {
        self.end
            .succ_opt()
            .map(|day| day.and_time(NaiveTime::MIN).and_utc())
    }

    /// Returns `true` when the task lies inside the window.
    #[must_use]
    pub fn contains(&self, task: &Task) -> bool {
        let Some(end_time) = task.end_time() else {
            return false;
        };
        task.start_time() >= self.lower_bound()
            && self.upper_bound().is_none_or(|bound| end_time < bound)
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, TaskDomainError> {
    NaiveDate::parse_from_str(value.trim(), TaskTimeRange::DATE_FORMAT)
        .map_err(|_| TaskDomainError::InvalidDate(value.to_owned()))
}
