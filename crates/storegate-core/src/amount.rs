//! # Amount
//!
//! Decimal-string money amounts for settlement and refund calls. The gateway
//! accepts amounts as decimal text, and floats are never permitted for money,
//! so the value is validated and kept in the exact textual form the caller
//! supplied.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A non-negative monetary amount with at most two fractional digits.
///
/// Accepted: `"10"`, `"10.5"`, `"10.50"`, `"0.01"`.
/// Rejected: `""`, `"-1"`, `"1.234"`, `"1e3"`, `".5"`, `"5."`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Amount(String);

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

impl Amount {
    /// Create an amount from decimal text, validating format.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidAmount`] if the text is not a
    /// plain non-negative decimal with at most two fractional digits.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if !Self::is_valid(&s) {
            return Err(ValidationError::InvalidAmount(s));
        }
        Ok(Self(s))
    }

    /// Access the amount in the textual form it was created with.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_valid(s: &str) -> bool {
        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, Some(f)),
            None => (s, None),
        };
        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        match frac {
            None => true,
            Some(f) => (1..=2).contains(&f.len()) && f.bytes().all(|b| b.is_ascii_digit()),
        }
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Amount {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
