//! Port for the mirror event log.

use super::{MirrorEntity, MirrorEvent};
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for mirror log operations.
pub type MirrorResult<T> = Result<T, MirrorError>;

/// Append-only store of mirror events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MirrorLog: Send + Sync {
    /// Appends one event.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError`] when the event cannot be encoded or written.
    async fn append(&self, event: &MirrorEvent) -> MirrorResult<()>;

    /// Reads every event recorded for `entity`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::Corrupt`] when a stored entry cannot be
    /// decoded, or [`MirrorError::Io`] when the log cannot be read.
    async fn read_all(&self, entity: MirrorEntity) -> MirrorResult<Vec<MirrorEvent>>;
}

/// Errors returned by mirror log implementations.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// Reading or writing the log failed.
    #[error("mirror log I/O failed on {}: {source}", path.display())]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A stored entry is not a valid event.
    #[error("malformed mirror entry at {}:{line}: {source}", path.display())]
    Corrupt {
        /// File holding the entry.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// Decoding error.
        #[source]
        source: serde_json::Error,
    },

    /// An entity could not be encoded as an event payload.
    #[error("failed to encode mirror payload: {0}")]
    Encode(#[from] serde_json::Error),

    /// An event payload could not be folded into an entity.
    #[error("cannot replay {entity} {entity_id}: {reason}")]
    Replay {
        /// Entity kind.
        entity: MirrorEntity,
        /// Store identifier of the entity.
        entity_id: i64,
        /// What was wrong with the event.
        reason: String,
    },
}
