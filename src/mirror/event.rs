//! Mirror event records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Kind of entity an event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MirrorEntity {
    /// A user row.
    User,
    /// A task row.
    Task,
}

impl MirrorEntity {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Task => "task",
        }
    }
}

impl fmt::Display for MirrorEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutation an event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MirrorOperation {
    /// The entity was created.
    Insert,
    /// The entity was changed; the payload is its new full state.
    Update,
    /// The entity was removed.
    Delete,
}

impl MirrorOperation {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for MirrorOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the mirror log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MirrorEvent {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// When the event was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Entity kind.
    pub entity: MirrorEntity,
    /// Store identifier of the entity.
    pub entity_id: i64,
    /// Mutation kind.
    pub operation: MirrorOperation,
    /// Full entity state for inserts and updates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

impl MirrorEvent {
    /// Creates an event with a fresh identifier.
    #[must_use]
    pub fn new(
        entity: MirrorEntity,
        entity_id: i64,
        operation: MirrorOperation,
        payload: Option<serde_json::Value>,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            recorded_at,
            entity,
            entity_id,
            operation,
            payload,
        }
    }
}
