//! `PostgreSQL` repository implementation for user storage.

use std::sync::Arc;

use super::models::{NewUserRow, UserChangeset, UserRow};
use crate::store::PostgresStore;
use crate::store::postgres::blocking::{BoxError, with_connection};
use crate::store::postgres::schema::users;
use crate::user::{
    domain::{
        NewUser, Pagination, Passport, PassportNumber, PassportSeries, PersistedUserData, User,
        UserId, UserProfile,
    },
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
};
use async_trait::async_trait;
use diesel::dsl::max;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed user repository.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    store: PostgresStore,
}

impl PostgresUserRepository {
    /// Creates a repository over the shared store handle.
    #[must_use]
    pub const fn new(store: PostgresStore) -> Self {
        Self { store }
    }

    async fn run<F, T>(&self, f: F) -> UserRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> UserRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        with_connection(self.store.pool(), boxed, f).await
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn insert(&self, user: &NewUser) -> UserRepositoryResult<User> {
        let row = to_new_row(None, user.passport(), user.profile(), user.created_at());
        self.run(move |connection| {
            let stored = diesel::insert_into(users::table)
                .values(&row)
                .returning(UserRow::as_returning())
                .get_result::<UserRow>(connection)
                .map_err(UserRepositoryError::persistence)?;
            row_to_user(stored)
        })
        .await
    }

    async fn restore(&self, user: &User) -> UserRepositoryResult<()> {
        let user_id = user.id();
        let mut row = to_new_row(
            Some(user_id),
            user.passport(),
            user.profile(),
            user.created_at(),
        );
        row.updated_at = user.updated_at();
        self.run(move |connection| {
            diesel::insert_into(users::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        UserRepositoryError::DuplicateUser(user_id)
                    }
                    _ => UserRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, user: &User) -> UserRepositoryResult<()> {
        let user_id = user.id();
        let changeset = to_changeset(user);
        self.run(move |connection| {
            let updated = diesel::update(users::table.filter(users::id.eq(user_id.value())))
                .set(&changeset)
                .execute(connection)
                .map_err(UserRepositoryError::persistence)?;
            if updated == 0 {
                return Err(UserRepositoryError::NotFound(user_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        self.run(move |connection| {
            let row = users::table
                .filter(users::id.eq(id.value()))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn list(&self, page: Pagination) -> UserRepositoryResult<Vec<User>> {
        let limit = i64::from(page.limit());
        let offset = i64::try_from(page.offset()).map_err(UserRepositoryError::persistence)?;
        self.run(move |connection| {
            let rows = users::table
                .order(users::id.asc())
                .limit(limit)
                .offset(offset)
                .select(UserRow::as_select())
                .load::<UserRow>(connection)
                .map_err(UserRepositoryError::persistence)?;
            rows.into_iter().map(row_to_user).collect()
        })
        .await
    }

    async fn next_free_id(&self) -> UserRepositoryResult<UserId> {
        self.run(|connection| {
            let current = users::table
                .select(max(users::id))
                .first::<Option<i64>>(connection)
                .map_err(UserRepositoryError::persistence)?;
            UserId::new(current.unwrap_or(0).saturating_add(1))
                .map_err(UserRepositoryError::persistence)
        })
        .await
    }
}

fn boxed(err: BoxError) -> UserRepositoryError {
    UserRepositoryError::Persistence(Arc::from(err))
}

fn to_new_row(
    id: Option<UserId>,
    passport: &Passport,
    profile: &UserProfile,
    created_at: chrono::DateTime<chrono::Utc>,
) -> NewUserRow {
    NewUserRow {
        id: id.map(UserId::value),
        passport_series: passport.series().as_str().to_owned(),
        passport_number: passport.number().as_str().to_owned(),
        surname: profile.surname().to_owned(),
        name: profile.name().to_owned(),
        patronymic: profile.patronymic().map(str::to_owned),
        address: profile.address().to_owned(),
        created_at,
        updated_at: created_at,
    }
}

fn to_changeset(user: &User) -> UserChangeset {
    let passport = user.passport();
    let profile = user.profile();
    UserChangeset {
        passport_series: passport.series().as_str().to_owned(),
        passport_number: passport.number().as_str().to_owned(),
        surname: profile.surname().to_owned(),
        name: profile.name().to_owned(),
        patronymic: profile.patronymic().map(str::to_owned),
        address: profile.address().to_owned(),
        updated_at: user.updated_at(),
    }
}

fn row_to_user(row: UserRow) -> UserRepositoryResult<User> {
    let UserRow {
        id,
        passport_series,
        passport_number,
        surname,
        name,
        patronymic,
        address,
        created_at,
        updated_at,
    } = row;

    let passport = Passport::new(
        PassportSeries::new(passport_series).map_err(UserRepositoryError::persistence)?,
        PassportNumber::new(passport_number).map_err(UserRepositoryError::persistence)?,
    );
    let mut profile =
        UserProfile::new(surname, name, address).map_err(UserRepositoryError::persistence)?;
    if let Some(value) = patronymic {
        profile = profile
            .with_patronymic(value)
            .map_err(UserRepositoryError::persistence)?;
    }

    Ok(User::from_persisted(PersistedUserData {
        id: UserId::new(id).map_err(UserRepositoryError::persistence)?,
        passport,
        profile,
        created_at,
        updated_at,
    }))
}
