//! Task aggregate root and its lifecycle state.

use super::{TaskDomainError, TaskId, TrackedTime};
use crate::user::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task lifecycle state, derived from the presence of an end time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Work is being tracked; no end time yet.
    Running,
    /// Tracking finished; hours and minutes are fixed.
    Stopped,
}

impl TaskState {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Stopped => "stopped",
        }
    }
}

/// A task that has been started but not stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    user_id: UserId,
    name: String,
    start_time: DateTime<Utc>,
}

impl NewTask {
    /// Longest task name in characters.
    pub const MAX_NAME_LEN: usize = 255;

    /// Starts tracking a named task for a user at the current time.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTaskName`] when the name is blank and
    /// [`TaskDomainError::TaskNameTooLong`] when it exceeds
    /// [`NewTask::MAX_NAME_LEN`].
    pub fn start(
        user_id: UserId,
        name: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyTaskName);
        }
        if trimmed.chars().count() > Self::MAX_NAME_LEN {
            return Err(TaskDomainError::TaskNameTooLong {
                max: Self::MAX_NAME_LEN,
            });
        }
        Ok(Self {
            user_id,
            name: trimmed.to_owned(),
            start_time: clock.utc(),
        })
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the task name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the start time, also used as creation and update time.
    #[must_use]
    pub const fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Attaches the store-assigned identifier.
    #[must_use]
    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            user_id: self.user_id,
            name: self.name,
            tracked: TrackedTime::ZERO,
            start_time: self.start_time,
            end_time: None,
            created_at: self.start_time,
            updated_at: self.start_time,
        }
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    user_id: UserId,
    name: String,
    #[serde(flatten)]
    tracked: TrackedTime,
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted owner.
    pub user_id: UserId,
    /// Persisted name.
    pub name: String,
    /// Persisted hours and minutes.
    pub tracked: TrackedTime,
    /// Persisted start time.
    pub start_time: DateTime<Utc>,
    /// Persisted end time, absent while running.
    pub end_time: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            user_id: data.user_id,
            name: data.name,
            tracked: data.tracked,
            start_time: data.start_time,
            end_time: data.end_time,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the task name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the tracked hours and minutes, zero while running.
    #[must_use]
    pub const fn tracked_time(&self) -> TrackedTime {
        self.tracked
    }

    /// Returns when tracking started.
    #[must_use]
    pub const fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Returns when tracking stopped, if it has.
    #[must_use]
    pub const fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn state(&self) -> TaskState {
        if self.end_time.is_some() {
            TaskState::Stopped
        } else {
            TaskState::Running
        }
    }

    /// Returns `true` while the task has no end time.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.end_time.is_none()
    }

    /// Stops the task at the current time and fixes its tracked time.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AlreadyStopped`] if the task was stopped
    /// before; the stored values are never recomputed.
    pub fn stop(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        if !self.is_running() {
            return Err(TaskDomainError::AlreadyStopped(self.id));
        }
        let now = clock.utc();
        self.tracked = TrackedTime::between(self.start_time, now);
        self.end_time = Some(now);
        self.updated_at = now;
        Ok(())
    }
}
