//! In-memory user repository backed by [`InMemoryStore`].

use async_trait::async_trait;

use crate::store::{InMemoryStore, memory::StoreState};
use crate::user::{
    domain::{NewUser, Pagination, User, UserId},
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
};

const FIRST_ID: i64 = 1;

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &NewUser) -> UserRepositoryResult<User> {
        let mut state = self.write().map_err(UserRepositoryError::persistence)?;
        let id = next_id(&state)?;
        let stored = user.clone().into_user(id);
        state.users.insert(id, stored.clone());
        Ok(stored)
    }

    async fn restore(&self, user: &User) -> UserRepositoryResult<()> {
        let mut state = self.write().map_err(UserRepositoryError::persistence)?;
        if state.users.contains_key(&user.id()) {
            return Err(UserRepositoryError::DuplicateUser(user.id()));
        }
        state.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> UserRepositoryResult<()> {
        let mut state = self.write().map_err(UserRepositoryError::persistence)?;
        let stored = state
            .users
            .get_mut(&user.id())
            .ok_or(UserRepositoryError::NotFound(user.id()))?;
        *stored = user.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        let state = self.read().map_err(UserRepositoryError::persistence)?;
        Ok(state.users.get(&id).cloned())
    }

    async fn list(&self, page: Pagination) -> UserRepositoryResult<Vec<User>> {
        let state = self.read().map_err(UserRepositoryError::persistence)?;
        let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        Ok(state.users.values().skip(skip).take(take).cloned().collect())
    }

    async fn next_free_id(&self) -> UserRepositoryResult<UserId> {
        let state = self.read().map_err(UserRepositoryError::persistence)?;
        next_id(&state)
    }
}

fn next_id(state: &StoreState) -> UserRepositoryResult<UserId> {
    state
        .users
        .keys()
        .next_back()
        .map_or(UserId::new(FIRST_ID), |last| Ok(last.next()))
        .map_err(UserRepositoryError::persistence)
}
