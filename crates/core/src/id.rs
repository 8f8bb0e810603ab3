//! Strongly-typed product identifier.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Externally assigned product identifier.
///
/// Always stored trimmed; blank input is rejected with
/// [`DomainError::MissingId`]. Length rules live in the validation engine,
/// not here, so that ids already stored in the backend round-trip untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, DomainError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DomainError::missing_id());
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ProductId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        let id = ProductId::new("  trj-crd ").unwrap();
        assert_eq!(id.as_str(), "trj-crd");
    }

    #[test]
    fn rejects_blank() {
        assert_eq!(ProductId::new("   ").unwrap_err(), DomainError::MissingId);
        assert_eq!("".parse::<ProductId>().unwrap_err(), DomainError::MissingId);
    }
}
