//! Fixed-width numeric booking codes and the space they are drawn from.

use std::fmt;

use thiserror::Error;

/// Width used for BiteReserve codes unless configured otherwise.
pub const DEFAULT_CODE_WIDTH: u32 = 5;

/// Widest code the space supports; `10^9 - 1` still fits in a `u32`.
pub const MAX_CODE_WIDTH: u32 = 9;

/// The closed range `[1, 10^W - 1]` of codes for a fixed width `W`.
///
/// # Examples
///
/// ```
/// use bitereserve_core::CodeSpace;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let space = CodeSpace::new(5)?;
/// assert_eq!(space.max_value(), 99_999);
/// assert_eq!(space.format(42)?.as_str(), "00042");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeSpace {
    width: u32,
    max_value: u32,
}

/// Errors returned by [`CodeSpace::new`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodeSpaceError {
    /// The requested width cannot be represented.
    #[error("code width {width} must be between 1 and {MAX_CODE_WIDTH}")]
    InvalidWidth {
        /// Rejected width.
        width: u32,
    },
}

/// Errors returned when formatting or parsing a [`BookingCode`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookingCodeError {
    /// A numeric value fell outside `[1, 10^W - 1]`.
    #[error("code value {value} is outside 1..={max}")]
    OutOfRange {
        /// Rejected value.
        value: u32,
        /// Largest value allowed by the space.
        max: u32,
    },
    /// A textual code did not have the configured width.
    #[error("code {value:?} must be exactly {width} digits")]
    Width {
        /// Rejected input.
        value: String,
        /// Expected width.
        width: u32,
    },
    /// A textual code contained non-digit characters.
    #[error("code {value:?} must contain only ASCII digits")]
    NotNumeric {
        /// Rejected input.
        value: String,
    },
    /// A textual code rendered the reserved value zero.
    #[error("code {value:?} is zero, which is never assigned")]
    Zero {
        /// Rejected input.
        value: String,
    },
}

impl CodeSpace {
    /// Construct a code space for `width` digits.
    pub fn new(width: u32) -> Result<Self, CodeSpaceError> {
        if width == 0 || width > MAX_CODE_WIDTH {
            return Err(CodeSpaceError::InvalidWidth { width });
        }
        let max_value = 10_u32
            .checked_pow(width)
            .and_then(|bound| bound.checked_sub(1))
            .ok_or(CodeSpaceError::InvalidWidth { width })?;
        Ok(Self { width, max_value })
    }

    /// Number of digits in every code.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Largest assignable value, `10^W - 1`.
    #[must_use]
    pub const fn max_value(&self) -> u32 {
        self.max_value
    }

    /// Number of distinct codes in the space. Zero is never assigned, so this
    /// equals [`CodeSpace::max_value`].
    #[must_use]
    pub fn capacity(&self) -> usize {
        usize::try_from(self.max_value).unwrap_or(usize::MAX)
    }

    /// Render `value` as a zero-padded code.
    pub fn format(&self, value: u32) -> Result<BookingCode, BookingCodeError> {
        if value == 0 || value > self.max_value {
            return Err(BookingCodeError::OutOfRange {
                value,
                max: self.max_value,
            });
        }
        let width = usize::try_from(self.width).unwrap_or(usize::MAX);
        Ok(BookingCode(format!("{value:0width$}")))
    }

    /// Validate a stored code against this space.
    pub fn parse(&self, raw: &str) -> Result<BookingCode, BookingCodeError> {
        if !raw.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(BookingCodeError::NotNumeric {
                value: raw.to_owned(),
            });
        }
        if u32::try_from(raw.len()).ok() != Some(self.width) {
            return Err(BookingCodeError::Width {
                value: raw.to_owned(),
                width: self.width,
            });
        }
        if raw.bytes().all(|byte| byte == b'0') {
            return Err(BookingCodeError::Zero {
                value: raw.to_owned(),
            });
        }
        Ok(BookingCode(raw.to_owned()))
    }
}

impl Default for CodeSpace {
    fn default() -> Self {
        Self {
            width: DEFAULT_CODE_WIDTH,
            max_value: 99_999,
        }
    }
}

/// A fixed-width, zero-padded numeric booking code.
///
/// Leading zeros are significant: codes compare as strings, never as
/// integers. Instances are only produced by a [`CodeSpace`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct BookingCode(String);

impl BookingCode {
    /// Borrow the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner [`String`].
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for BookingCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
