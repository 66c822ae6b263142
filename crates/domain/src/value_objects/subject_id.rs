//! Subject identifier value object
//!
//! A subject is the identity (an end-user of the messenger) that rate limits,
//! cache entries and credit balances are scoped to.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// A validated subject identifier
///
/// Messenger user ids are positive integers of at most 15 decimal digits.
/// Anything else is rejected before it can reach a backend call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct SubjectId(u64);

impl SubjectId {
    /// Smallest accepted identifier
    pub const MIN: u64 = 1;

    /// Largest accepted identifier (15 decimal digits)
    pub const MAX: u64 = 999_999_999_999_999;

    /// Create a subject id, validating its range
    pub fn new(value: u64) -> Result<Self, DomainError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DomainError::InvalidSubjectId(value.to_string()))
        }
    }

    /// Create a subject id from a signed messenger id
    pub fn from_signed(value: i64) -> Result<Self, DomainError> {
        u64::try_from(value)
            .map_err(|_| DomainError::InvalidSubjectId(value.to_string()))
            .and_then(Self::new)
    }

    /// Get the raw identifier
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SubjectId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value = trimmed
            .parse::<u64>()
            .map_err(|_| DomainError::InvalidSubjectId(trimmed.to_string()))?;
        Self::new(value)
    }
}

impl TryFrom<u64> for SubjectId {
    type Error = DomainError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SubjectId> for u64 {
    fn from(id: SubjectId) -> Self {
        id.0
    }
}
