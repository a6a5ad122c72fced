//! Domain model for registered users.

mod error;
mod ids;
mod pagination;
mod passport;
mod user;

pub use error::UserDomainError;
pub use ids::UserId;
pub use pagination::Pagination;
pub use passport::{Passport, PassportNumber, PassportSeries};
pub use user::{NewUser, PersistedUserData, User, UserPatch, UserProfile};
