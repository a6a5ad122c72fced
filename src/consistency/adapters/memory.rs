//! In-memory cascade transactions over [`InMemoryStore`].
//!
//! A transaction works on a copy of the tables and swaps it in on commit,
//! holding the write lock throughout.

use std::io;

use async_trait::async_trait;

use crate::consistency::ports::{CascadeError, CascadeResult, CascadeStore, CascadeTransaction};
use crate::store::{InMemoryStore, StoreFault, memory::StoreState};
use crate::task::domain::TaskId;
use crate::user::domain::UserId;

struct StagedTransaction<'a> {
    staged: StoreState,
    store: &'a InMemoryStore,
}

impl StagedTransaction<'_> {
    fn check_fault(&self, fault: StoreFault) -> CascadeResult<()> {
        if self.store.take_fault(fault) {
            return Err(CascadeError::persistence(io::Error::other(format!(
                "injected store failure: {fault:?}"
            ))));
        }
        Ok(())
    }
}

impl CascadeTransaction for StagedTransaction<'_> {
    fn lock_user(&mut self, user_id: UserId) -> CascadeResult<bool> {
        Ok(self.staged.users.contains_key(&user_id))
    }

    fn delete_tasks_for_user(&mut self, user_id: UserId) -> CascadeResult<Vec<TaskId>> {
        self.check_fault(StoreFault::DeleteTasks)?;
        let owned: Vec<TaskId> = self
            .staged
            .tasks
            .values()
            .filter(|task| task.user_id() == user_id)
            .map(|task| task.id())
            .collect();
        for id in &owned {
            self.staged.tasks.remove(id);
        }
        Ok(owned)
    }

    fn delete_user(&mut self, user_id: UserId) -> CascadeResult<bool> {
        self.check_fault(StoreFault::DeleteUser)?;
        Ok(self.staged.users.remove(&user_id).is_some())
    }
}

#[async_trait]
impl CascadeStore for InMemoryStore {
    async fn run_in_transaction<T, F>(&self, work: F) -> CascadeResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut dyn CascadeTransaction) -> CascadeResult<T> + Send + 'static,
    {
        let mut state = self.write().map_err(CascadeError::persistence)?;
        let mut transaction = StagedTransaction {
            staged: state.clone(),
            store: self,
        };
        let value = work(&mut transaction)?;
        *state = transaction.staged;
        Ok(value)
    }
}
