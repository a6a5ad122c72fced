//! Folding the mirror log back into entity state.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;

use super::{MirrorEntity, MirrorError, MirrorEvent, MirrorLog, MirrorOperation, MirrorResult};
use crate::task::domain::Task;
use crate::user::domain::User;

/// Latest state of every entity the log has not deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorSnapshot {
    /// Surviving users ordered by identifier.
    pub users: Vec<User>,
    /// Surviving tasks ordered by identifier.
    pub tasks: Vec<Task>,
}

impl MirrorSnapshot {
    /// Returns `true` when the log holds no surviving entity.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.tasks.is_empty()
    }
}

/// Reads both entity streams from `log` and folds them.
///
/// # Errors
///
/// Returns [`MirrorError`] when the log cannot be read or an insert or
/// update event carries no decodable payload.
pub async fn load_snapshot(log: &dyn MirrorLog) -> MirrorResult<MirrorSnapshot> {
    let users = fold::<User>(MirrorEntity::User, log.read_all(MirrorEntity::User).await?)?;
    let tasks = fold::<Task>(MirrorEntity::Task, log.read_all(MirrorEntity::Task).await?)?;
    Ok(MirrorSnapshot {
        users: users.into_values().collect(),
        tasks: tasks.into_values().collect(),
    })
}

/// Applies `events` in order, keeping the latest payload per identifier.
///
/// Events for other entity kinds are ignored.
///
/// # Errors
///
/// Returns [`MirrorError::Replay`] when an insert or update has a missing
/// or malformed payload.
pub fn fold<T: DeserializeOwned>(
    entity: MirrorEntity,
    events: impl IntoIterator<Item = MirrorEvent>,
) -> MirrorResult<BTreeMap<i64, T>> {
    let mut state = BTreeMap::new();
    for event in events.into_iter().filter(|event| event.entity == entity) {
        let entity_id = event.entity_id;
        match event.operation {
            MirrorOperation::Insert | MirrorOperation::Update => {
                let payload = event.payload.ok_or_else(|| MirrorError::Replay {
                    entity,
                    entity_id,
                    reason: format!("{} event without payload", event.operation),
                })?;
                let value = serde_json::from_value::<T>(payload).map_err(|err| {
                    MirrorError::Replay {
                        entity,
                        entity_id,
                        reason: err.to_string(),
                    }
                })?;
                state.insert(entity_id, value);
            }
            MirrorOperation::Delete => {
                state.remove(&entity_id);
            }
        }
    }
    Ok(state)
}
