//! In-memory record store for tests and the `--in-memory` server mode.

use std::collections::BTreeMap;
use std::io;
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::task::domain::{Task, TaskId};
use crate::user::domain::{User, UserId};

/// A store step that can be forced to fail once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFault {
    /// The next cascade step removing a user's tasks fails.
    DeleteTasks,
    /// The next cascade step removing the user row fails.
    DeleteUser,
}

/// Thread-safe in-memory store holding both tables behind one lock.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
    faults: Arc<Mutex<Vec<StoreFault>>>,
}

/// Table contents, keyed and therefore ordered by identifier.
#[derive(Debug, Clone, Default)]
pub(crate) struct StoreState {
    pub(crate) users: BTreeMap<UserId, User>,
    pub(crate) tasks: BTreeMap<TaskId, Task>,
}

impl StoreState {
    pub(crate) fn has_running_task(&self, user_id: UserId) -> bool {
        self.tasks
            .values()
            .any(|task| task.user_id() == user_id && task.is_running())
    }
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a one-shot failure for the given step.
    pub fn inject_fault(&self, fault: StoreFault) {
        self.faults
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(fault);
    }

    /// Consumes an armed fault, returning whether it was armed.
    pub(crate) fn take_fault(&self, fault: StoreFault) -> bool {
        let mut armed = self.faults.lock().unwrap_or_else(PoisonError::into_inner);
        armed
            .iter()
            .position(|candidate| *candidate == fault)
            .map(|index| armed.swap_remove(index))
            .is_some()
    }

    pub(crate) fn read(&self) -> io::Result<RwLockReadGuard<'_, StoreState>> {
        self.state
            .read()
            .map_err(|err| io::Error::other(err.to_string()))
    }

    pub(crate) fn write(&self) -> io::Result<RwLockWriteGuard<'_, StoreState>> {
        self.state
            .write()
            .map_err(|err| io::Error::other(err.to_string()))
    }
}
