//! Service layer for registering, updating, and listing users.

use crate::mirror::MirrorPublisher;
use crate::user::{
    domain::{NewUser, Pagination, Passport, User, UserDomainError, UserId, UserPatch, UserProfile},
    ports::{UserRepository, UserRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument};

/// Request payload for registering a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserRequest {
    passport: String,
    surname: String,
    name: String,
    patronymic: Option<String>,
    address: String,
}

impl CreateUserRequest {
    /// Creates a request with the required fields. `passport` uses the
    /// `"SSSS NNNNNN"` form.
    #[must_use]
    pub fn new(
        passport: impl Into<String>,
        surname: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            passport: passport.into(),
            surname: surname.into(),
            name: name.into(),
            patronymic: None,
            address: address.into(),
        }
    }

    /// Sets the patronymic.
    #[must_use]
    pub fn with_patronymic(mut self, patronymic: impl Into<String>) -> Self {
        self.patronymic = Some(patronymic.into());
        self
    }
}

/// Request payload for a partial user update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUserRequest {
    passport: Option<String>,
    surname: Option<String>,
    name: Option<String>,
    patronymic: Option<String>,
    address: Option<String>,
}

impl UpdateUserRequest {
    /// Creates a request that changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the passport (`"SSSS NNNNNN"`).
    #[must_use]
    pub fn with_passport(mut self, passport: impl Into<String>) -> Self {
        self.passport = Some(passport.into());
        self
    }

    /// Replaces the surname.
    #[must_use]
    pub fn with_surname(mut self, surname: impl Into<String>) -> Self {
        self.surname = Some(surname.into());
        self
    }

    /// Replaces the given name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replaces the patronymic; an empty value clears it.
    #[must_use]
    pub fn with_patronymic(mut self, patronymic: impl Into<String>) -> Self {
        self.patronymic = Some(patronymic.into());
        self
    }

    /// Replaces the address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    fn into_patch(self) -> Result<UserPatch, UserDomainError> {
        Ok(UserPatch {
            passport: self.passport.as_deref().map(Passport::parse).transpose()?,
            surname: self.surname,
            name: self.name,
            patronymic: self.patronymic,
            address: self.address,
        })
    }
}

/// Service-level errors for user directory operations.
#[derive(Debug, Error)]
pub enum UserDirectoryError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] UserDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] UserRepositoryError),
}

/// Result type for user directory service operations.
pub type UserDirectoryResult<T> = Result<T, UserDirectoryError>;

/// User directory orchestration service.
#[derive(Clone)]
pub struct UserDirectoryService<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    mirror: MirrorPublisher,
    clock: Arc<C>,
}

impl<R, C> UserDirectoryService<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new user directory service.
    #[must_use]
    pub const fn new(repository: Arc<R>, mirror: MirrorPublisher, clock: Arc<C>) -> Self {
        Self {
            repository,
            mirror,
            clock,
        }
    }

    /// Validates and stores a new user.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::Domain`] for a malformed passport or a
    /// blank or overlong name field, and [`UserDirectoryError::Repository`] when the
    /// store rejects the insert.
    #[instrument(name = "user.create", skip(self, request))]
    pub async fn create_user(&self, request: CreateUserRequest) -> UserDirectoryResult<User> {
        let passport = Passport::parse(&request.passport)?;
        let mut profile = UserProfile::new(request.surname, request.name, request.address)?;
        if let Some(patronymic) = request.patronymic {
            profile = profile.with_patronymic(patronymic)?;
        }

        let user = self
            .repository
            .insert(&NewUser::new(passport, profile, &*self.clock))
            .await?;
        info!(user_id = %user.id(), "user created");
        self.mirror.user_inserted(&user).await;
        Ok(user)
    }

    /// Applies a partial update to an existing user.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::NotFound`] (wrapped) when the user does
    /// not exist and [`UserDirectoryError::Domain`] when a replacement value
    /// is invalid.
    #[instrument(name = "user.update", skip(self, request), fields(user_id = %id))]
    pub async fn update_user(
        &self,
        id: UserId,
        request: UpdateUserRequest,
    ) -> UserDirectoryResult<User> {
        let patch = request.into_patch()?;
        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserRepositoryError::NotFound(id))?;
        user.apply(patch, &*self.clock)?;
        self.repository.update(&user).await?;
        info!("user updated");
        self.mirror.user_updated(&user).await;
        Ok(user)
    }

    /// Retrieves a user by identifier.
    ///
    /// Returns `Ok(None)` when the user does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::Repository`] when the lookup fails.
    #[instrument(name = "user.find", skip(self), fields(user_id = %id))]
    pub async fn find_user(&self, id: UserId) -> UserDirectoryResult<Option<User>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Returns one page of users ordered by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::Repository`] when the listing fails.
    #[instrument(
        name = "user.list",
        skip(self, page),
        fields(page = page.page(), limit = page.limit())
    )]
    pub async fn list_users(&self, page: Pagination) -> UserDirectoryResult<Vec<User>> {
        Ok(self.repository.list(page).await?)
    }
}
