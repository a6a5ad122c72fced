//! Passport value objects.

use super::UserDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Four-digit passport series.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PassportSeries(String);

impl PassportSeries {
    /// Number of digits in a series.
    pub const LEN: usize = 4;

    /// Creates a validated series.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::InvalidPassportSeries`] unless the value is
    /// exactly four ASCII digits.
    pub fn new(value: impl Into<String>) -> Result<Self, UserDomainError> {
        let raw = value.into();
        if !is_digits_of_len(&raw, Self::LEN) {
            return Err(UserDomainError::InvalidPassportSeries(raw));
        }
        Ok(Self(raw))
    }

    /// Returns the series as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PassportSeries {
    type Error = UserDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PassportSeries> for String {
    fn from(series: PassportSeries) -> Self {
        series.0
    }
}

/// Six-digit passport number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PassportNumber(String);

impl PassportNumber {
    /// Number of digits in a passport number.
    pub const LEN: usize = 6;

    /// Creates a validated passport number.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::InvalidPassportNumber`] unless the value is
    /// exactly six ASCII digits.
    pub fn new(value: impl Into<String>) -> Result<Self, UserDomainError> {
        let raw = value.into();
        if !is_digits_of_len(&raw, Self::LEN) {
            return Err(UserDomainError::InvalidPassportNumber(raw));
        }
        Ok(Self(raw))
    }

    /// Returns the number as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PassportNumber {
    type Error = UserDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PassportNumber> for String {
    fn from(number: PassportNumber) -> Self {
        number.0
    }
}

/// Identity document of a user, rendered as `"SSSS NNNNNN"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Passport {
    series: PassportSeries,
    number: PassportNumber,
}

impl Passport {
    /// Combines an already validated series and number.
    #[must_use]
    pub const fn new(series: PassportSeries, number: PassportNumber) -> Self {
        Self { series, number }
    }

    /// Parses the combined `"SSSS NNNNNN"` form.
    ///
    /// The value is split on a single ASCII space and must yield exactly two
    /// tokens.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::InvalidPassportFormat`] for any other token
    /// count, or the series/number error when a token has the wrong shape.
    pub fn parse(value: &str) -> Result<Self, UserDomainError> {
        let trimmed = value.trim();
        let mut tokens = trimmed.split(' ');
        let (Some(series), Some(number), None) = (tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(UserDomainError::InvalidPassportFormat(value.to_owned()));
        };

        Ok(Self {
            series: PassportSeries::new(series)?,
            number: PassportNumber::new(number)?,
        })
    }

    /// Returns the series part.
    #[must_use]
    pub const fn series(&self) -> &PassportSeries {
        &self.series
    }

    /// Returns the number part.
    #[must_use]
    pub const fn number(&self) -> &PassportNumber {
        &self.number
    }
}

impl fmt::Display for Passport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.series.as_str(), self.number.as_str())
    }
}

fn is_digits_of_len(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|byte| byte.is_ascii_digit())
}
