//! In-memory mirror log for tests.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use crate::mirror::{MirrorEntity, MirrorEvent, MirrorLog, MirrorResult};

/// Thread-safe in-memory mirror log.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMirrorLog {
    events: Arc<Mutex<Vec<MirrorEvent>>>,
}

impl InMemoryMirrorLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every recorded event, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<MirrorEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl MirrorLog for InMemoryMirrorLog {
    async fn append(&self, event: &MirrorEvent) -> MirrorResult<()> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
        Ok(())
    }

    async fn read_all(&self, entity: MirrorEntity) -> MirrorResult<Vec<MirrorEvent>> {
        let events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(events
            .iter()
            .filter(|event| event.entity == entity)
            .cloned()
            .collect())
    }
}
