//! Best-effort facade used by services to mirror store mutations.

use std::fmt;
use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use serde::Serialize;
use tracing::{debug, warn};

use super::{
    MirrorEntity, MirrorEvent, MirrorLog, MirrorOperation, MirrorResult,
    adapters::DisabledMirrorLog,
};
use crate::task::domain::{Task, TaskId};
use crate::user::domain::{User, UserId};

/// Records store mutations in a [`MirrorLog`], swallowing failures.
///
/// Every method logs a warning when the log rejects the event and then
/// returns normally, so callers never observe mirror errors.
///
/// Events are appended after the store mutation has committed and are not
/// ordered with it. Racing mutations of one entity may reach the log in a
/// different order than they reached the store, so a replay can disagree
/// with the store (for example, an update logged after a racing delete
/// brings the user back). The store stays authoritative.
#[derive(Clone)]
pub struct MirrorPublisher {
    log: Arc<dyn MirrorLog>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for MirrorPublisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MirrorPublisher").finish_non_exhaustive()
    }
}

impl MirrorPublisher {
    /// Creates a publisher writing to `log` with timestamps from `clock`.
    #[must_use]
    pub fn new(log: Arc<dyn MirrorLog>, clock: Arc<dyn Clock>) -> Self {
        Self { log, clock }
    }

    /// Creates a publisher that drops every event.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(Arc::new(DisabledMirrorLog), Arc::new(DefaultClock))
    }

    /// Records a newly inserted user.
    pub async fn user_inserted(&self, user: &User) {
        self.publish(
            MirrorEntity::User,
            user.id().value(),
            MirrorOperation::Insert,
            Some(user),
        )
        .await;
    }

    /// Records the new state of an updated user.
    pub async fn user_updated(&self, user: &User) {
        self.publish(
            MirrorEntity::User,
            user.id().value(),
            MirrorOperation::Update,
            Some(user),
        )
        .await;
    }

    /// Records the removal of a user.
    pub async fn user_removed(&self, id: UserId) {
        self.publish::<User>(MirrorEntity::User, id.value(), MirrorOperation::Delete, None)
            .await;
    }

    /// Records a newly started task.
    pub async fn task_inserted(&self, task: &Task) {
        self.publish(
            MirrorEntity::Task,
            task.id().value(),
            MirrorOperation::Insert,
            Some(task),
        )
        .await;
    }

    /// Records the new state of an updated task.
    pub async fn task_updated(&self, task: &Task) {
        self.publish(
            MirrorEntity::Task,
            task.id().value(),
            MirrorOperation::Update,
            Some(task),
        )
        .await;
    }

    /// Records the removal of a task.
    pub async fn task_removed(&self, id: TaskId) {
        self.publish::<Task>(MirrorEntity::Task, id.value(), MirrorOperation::Delete, None)
            .await;
    }

    async fn publish<T: Serialize + Sync>(
        &self,
        entity: MirrorEntity,
        entity_id: i64,
        operation: MirrorOperation,
        payload: Option<&T>,
    ) {
        match self.try_publish(entity, entity_id, operation, payload).await {
            Ok(()) => debug!(%entity, entity_id, %operation, "mirrored"),
            Err(err) => warn!(
                %entity,
                entity_id,
                %operation,
                error = %err,
                "mirror log write failed; store state is unaffected"
            ),
        }
    }

    async fn try_publish<T: Serialize + Sync>(
        &self,
        entity: MirrorEntity,
        entity_id: i64,
        operation: MirrorOperation,
        payload: Option<&T>,
    ) -> MirrorResult<()> {
        let value = payload.map(serde_json::to_value).transpose()?;
        let event = MirrorEvent::new(entity, entity_id, operation, value, self.clock.utc());
        self.log.append(&event).await
    }
}
