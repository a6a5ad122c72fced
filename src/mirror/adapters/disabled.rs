//! Mirror log that records nothing.

use async_trait::async_trait;

use crate::mirror::{MirrorEntity, MirrorEvent, MirrorLog, MirrorResult};

/// Drops every event and replays nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledMirrorLog;

#[async_trait]
impl MirrorLog for DisabledMirrorLog {
    async fn append(&self, _event: &MirrorEvent) -> MirrorResult<()> {
        Ok(())
    }

    async fn read_all(&self, _entity: MirrorEntity) -> MirrorResult<Vec<MirrorEvent>> {
        Ok(Vec::new())
    }
}
