//! ISO-3166 alpha-2 country codes used as partition keys.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// A validated ISO-3166 alpha-2 country code.
///
/// The code is always two uppercase ASCII letters. Use [`CountryCode::new`]
/// for strict validation of stored values and [`CountryCode::normalise`] for
/// geocoder output that may carry stray whitespace or lowercase letters.
///
/// # Examples
///
/// ```
/// use bitereserve_core::CountryCode;
///
/// # fn main() -> Result<(), bitereserve_core::CountryCodeError> {
/// let code = CountryCode::new("PT")?;
/// assert_eq!(code.as_str(), "PT");
/// assert!(CountryCode::new("pt").is_err());
/// assert_eq!(CountryCode::normalise(" pt ")?, code);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct CountryCode(String);

/// Errors returned when validating a [`CountryCode`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CountryCodeError {
    /// The value was not exactly two characters long.
    #[error("country code {value:?} must be exactly two letters")]
    Length {
        /// Rejected input.
        value: String,
    },
    /// The value contained something other than uppercase ASCII letters.
    #[error("country code {value:?} must contain only uppercase ASCII letters")]
    Alphabet {
        /// Rejected input.
        value: String,
    },
}

impl CountryCode {
    /// Validate and construct a [`CountryCode`] without altering the input.
    pub fn new(value: impl Into<String>) -> Result<Self, CountryCodeError> {
        let raw = value.into();
        if raw.chars().count() != 2 {
            return Err(CountryCodeError::Length { value: raw });
        }
        if !raw.bytes().all(|byte| byte.is_ascii_uppercase()) {
            return Err(CountryCodeError::Alphabet { value: raw });
        }
        Ok(Self(raw))
    }

    /// Trim and uppercase the input before validating it.
    pub fn normalise(value: &str) -> Result<Self, CountryCodeError> {
        Self::new(value.trim().to_ascii_uppercase())
    }

    /// Borrow the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for CountryCode {
    type Err = CountryCodeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::new(value)
    }
}

impl TryFrom<String> for CountryCode {
    type Error = CountryCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CountryCode> for String {
    fn from(value: CountryCode) -> Self {
        value.0
    }
}

impl AsRef<str> for CountryCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
