//! In-memory task repository backed by [`InMemoryStore`].

use std::cmp::Reverse;

use async_trait::async_trait;

use crate::store::{InMemoryStore, memory::StoreState};
use crate::task::{
    domain::{NewTask, Task, TaskId, TaskTimeRange},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use crate::user::domain::UserId;

const FIRST_ID: i64 = 1;

#[async_trait]
impl TaskRepository for InMemoryStore {
    async fn insert(&self, task: &NewTask) -> TaskRepositoryResult<Task> {
        let mut state = self.write().map_err(TaskRepositoryError::persistence)?;
        check_owner(&state, task.user_id())?;
        let id = next_id(&state)?;
        let stored = task.clone().into_task(id);
        state.tasks.insert(id, stored.clone());
        Ok(stored)
    }

    async fn restore(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write().map_err(TaskRepositoryError::persistence)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        if task.is_running() {
            check_owner(&state, task.user_id())?;
        } else if !state.users.contains_key(&task.user_id()) {
            return Err(TaskRepositoryError::OwnerNotFound(task.user_id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn record_stop(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write().map_err(TaskRepositoryError::persistence)?;
        let stored = state
            .tasks
            .get_mut(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        if !stored.is_running() {
            return Err(TaskRepositoryError::NotRunning(task.id()));
        }
        *stored = task.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.read().map_err(TaskRepositoryError::persistence)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn find_active_for_user(&self, user_id: UserId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.read().map_err(TaskRepositoryError::persistence)?;
        Ok(state
            .tasks
            .values()
            .filter(|task| task.user_id() == user_id && task.is_running())
            .max_by_key(|task| (task.start_time(), task.id()))
            .cloned())
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        range: Option<TaskTimeRange>,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read().map_err(TaskRepositoryError::persistence)?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| task.user_id() == user_id)
            .filter(|task| range.is_none_or(|window| window.contains(task)))
            .cloned()
            .collect();
        tasks.sort_by_key(|task| (Reverse(task.tracked_time()), task.id()));
        Ok(tasks)
    }

    async fn next_free_id(&self) -> TaskRepositoryResult<TaskId> {
        let state = self.read().map_err(TaskRepositoryError::persistence)?;
        next_id(&state)
    }
}

fn check_owner(state: &StoreState, user_id: UserId) -> TaskRepositoryResult<()> {
    if !state.users.contains_key(&user_id) {
        return Err(TaskRepositoryError::OwnerNotFound(user_id));
    }
    if state.has_running_task(user_id) {
        return Err(TaskRepositoryError::ActiveTaskExists(user_id));
    }
    Ok(())
}

fn next_id(state: &StoreState) -> TaskRepositoryResult<TaskId> {
    state
        .tasks
        .keys()
        .next_back()
        .map_or(TaskId::new(FIRST_ID), |last| Ok(last.next()))
        .map_err(TaskRepositoryError::persistence)
}
