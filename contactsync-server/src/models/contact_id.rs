//! Contact identifiers
//!
//! Identifiers are minted by the service, not by either store, so the primary
//! and the secondary agree on the same identity for a contact.

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use super::ValidationError;

/// Length of the canonical hyphenated UUID form
const HYPHENATED_LEN: usize = 36;

/// Contact identifier (lowercase hyphenated UUID)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ContactId(Uuid);

impl ContactId {
    /// Mint a fresh random (v4) identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier supplied by a caller.
    ///
    /// Only the 36-character hyphenated form is accepted. Upper-case hex is
    /// tolerated and normalised on output.
    ///
    /// # Example
    /// ```
    /// use contactsync_server::models::ContactId;
    ///
    /// let id = ContactId::parse("9F1C2B64-7A0E-4C1B-9D2E-3A4B5C6D7E8F").unwrap();
    /// assert_eq!(id.to_string(), "9f1c2b64-7a0e-4c1b-9d2e-3a4b5c6d7e8f");
    /// assert!(ContactId::parse("9f1c2b647a0e4c1b9d2e3a4b5c6d7e8f").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "id" });
        }

        if s.len() != HYPHENATED_LEN {
            return Err(ValidationError::InvalidFormat {
                field: "id",
                reason: "must be a hyphenated UUID",
            });
        }

        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| ValidationError::InvalidFormat {
                field: "id",
                reason: "must be a hyphenated UUID",
            })
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Uuid's Display is lowercase hyphenated
        write!(f, "{}", self.0.hyphenated())
    }
}
