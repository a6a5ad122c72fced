//! User aggregate root and profile types.

use super::{Passport, UserDomainError, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Personal details of a user apart from the passport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    surname: String,
    name: String,
    patronymic: Option<String>,
    address: String,
}

impl UserProfile {
    /// Longest surname, name, or patronymic in characters.
    pub const MAX_FIELD_LEN: usize = 255;

    /// Creates a profile with the required fields.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::EmptyField`] when `surname` or `name` is
    /// blank and [`UserDomainError::FieldTooLong`] when either exceeds
    /// [`UserProfile::MAX_FIELD_LEN`].
    pub fn new(
        surname: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
    ) -> Result<Self, UserDomainError> {
        Ok(Self {
            surname: required("surname", &surname.into())?,
            name: required("name", &name.into())?,
            patronymic: None,
            address: address.into().trim().to_owned(),
        })
    }

    /// Sets the patronymic. A blank value leaves it unset.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::FieldTooLong`] when the patronymic exceeds
    /// [`UserProfile::MAX_FIELD_LEN`].
    pub fn with_patronymic(
        mut self,
        patronymic: impl Into<String>,
    ) -> Result<Self, UserDomainError> {
        self.patronymic = optional("patronymic", &patronymic.into())?;
        Ok(self)
    }

    /// Returns the surname.
    #[must_use]
    pub fn surname(&self) -> &str {
        &self.surname
    }

    /// Returns the given name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the patronymic, if any.
    #[must_use]
    pub fn patronymic(&self) -> Option<&str> {
        self.patronymic.as_deref()
    }

    /// Returns the postal address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }
}

/// A user that has not been stored yet and has no identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    passport: Passport,
    profile: UserProfile,
    created_at: DateTime<Utc>,
}

impl NewUser {
    /// Prepares a user for insertion, stamped with the current time.
    #[must_use]
    pub fn new(passport: Passport, profile: UserProfile, clock: &impl Clock) -> Self {
        Self {
            passport,
            profile,
            created_at: clock.utc(),
        }
    }

    /// Returns the passport.
    #[must_use]
    pub const fn passport(&self) -> &Passport {
        &self.passport
    }

    /// Returns the profile.
    #[must_use]
    pub const fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Returns the creation timestamp, also used as the first update time.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Attaches the store-assigned identifier.
    #[must_use]
    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            passport: self.passport,
            profile: self.profile,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

/// Partial replacement of user fields.
///
/// Absent fields are left untouched. An empty patronymic clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    /// Replacement passport.
    pub passport: Option<Passport>,
    /// Replacement surname.
    pub surname: Option<String>,
    /// Replacement given name.
    pub name: Option<String>,
    /// Replacement patronymic.
    pub patronymic: Option<String>,
    /// Replacement address.
    pub address: Option<String>,
}

/// User aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    passport: Passport,
    #[serde(flatten)]
    profile: UserProfile,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted user aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Persisted user identifier.
    pub id: UserId,
    /// Persisted passport.
    pub passport: Passport,
    /// Persisted profile.
    pub profile: UserProfile,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            passport: data.passport,
            profile: data.profile,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the passport.
    #[must_use]
    pub const fn passport(&self) -> &Passport {
        &self.passport
    }

    /// Returns the profile.
    #[must_use]
    pub const fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies a partial update and refreshes `updated_at`.
    ///
    /// Validation happens before any field changes, so a rejected patch
    /// leaves the user untouched.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::EmptyField`] when the patch blanks out the
    /// surname or name, and [`UserDomainError::FieldTooLong`] when a name
    /// field is too long.
    pub fn apply(&mut self, patch: UserPatch, clock: &impl Clock) -> Result<(), UserDomainError> {
        let surname = patch
            .surname
            .map(|value| required("surname", &value))
            .transpose()?;
        let name = patch.name.map(|value| required("name", &value)).transpose()?;
        let patronymic = patch
            .patronymic
            .map(|value| optional("patronymic", &value))
            .transpose()?;

        if let Some(passport) = patch.passport {
            self.passport = passport;
        }
        if let Some(value) = surname {
            self.profile.surname = value;
        }
        if let Some(value) = name {
            self.profile.name = value;
        }
        if let Some(value) = patronymic {
            self.profile.patronymic = value;
        }
        if let Some(value) = patch.address {
            value.trim().clone_into(&mut self.profile.address);
        }
        self.updated_at = clock.utc();
        Ok(())
    }
}

fn required(field: &'static str, value: &str) -> Result<String, UserDomainError> {
    optional(field, value)?.ok_or(UserDomainError::EmptyField(field))
}

fn optional(field: &'static str, value: &str) -> Result<Option<String>, UserDomainError> {
    let trimmed = value.trim();
    if trimmed.chars().count() > UserProfile::MAX_FIELD_LEN {
        return Err(UserDomainError::FieldTooLong {
            field,
            max: UserProfile::MAX_FIELD_LEN,
        });
    }
    Ok((!trimmed.is_empty()).then(|| trimmed.to_owned()))
}
