//! Error types for user domain validation.

use thiserror::Error;

/// Errors returned while constructing domain user values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserDomainError {
    /// The user identifier is not a positive integer.
    #[error("invalid user id {0}, expected a positive integer")]
    InvalidUserId(i64),

    /// The passport string does not contain exactly two space-separated parts.
    #[error("invalid passport '{0}', expected 'SSSS NNNNNN'")]
    InvalidPassportFormat(String),

    /// The passport series is not exactly four digits.
    #[error("invalid passport series '{0}', expected 4 digits")]
    InvalidPassportSeries(String),

    /// The passport number is not exactly six digits.
    #[error("invalid passport number '{0}', expected 6 digits")]
    InvalidPassportNumber(String),

    /// A required profile field is empty after trimming.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    /// A profile field is longer than the store accepts.
    #[error("{field} must be at most {max} characters")]
    FieldTooLong {
        /// Name of the offending field.
        field: &'static str,
        /// Largest accepted length in characters.
        max: usize,
    },
}
