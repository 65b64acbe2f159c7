//! Contact fields and records
//!
//! Field widths follow the upstream CRM `contacts` columns (varchar(100)).

use serde::Serialize;

use super::{ContactId, ValidationError};

/// Maximum length for any contact field
const MAX_FIELD_LEN: usize = 100;

/// Validated contact fields.
///
/// Updates always rewrite all three fields, so the same type serves both
/// create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactFields {
    first_name: String,
    last_name: String,
    phone_work: String,
}

impl ContactFields {
    /// Validate raw input.
    ///
    /// # Rules
    /// - Surrounding whitespace is trimmed
    /// - First and last name must be non-empty
    /// - Every field is at most 100 characters
    pub fn new(
        first_name: &str,
        last_name: &str,
        phone_work: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            first_name: required("first_name", first_name)?,
            last_name: required("last_name", last_name)?,
            phone_work: bounded("phone_work", phone_work)?,
        })
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn phone_work(&self) -> &str {
        &self.phone_work
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let value = bounded(field, value)?;
    if value.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(value)
}

fn bounded(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.chars().count() > MAX_FIELD_LEN {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_FIELD_LEN,
        });
    }
    Ok(value.to_owned())
}

/// Contact as returned by the read path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contact {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_work: String,
}

impl Contact {
    pub fn new(id: &ContactId, fields: &ContactFields) -> Self {
        Self {
            id: id.to_string(),
            first_name: fields.first_name.clone(),
            last_name: fields.last_name.clone(),
            phone_work: fields.phone_work.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_fields() {
        let fields = ContactFields::new("Ada", "Lovelace", "").unwrap();
        assert_eq!(fields.first_name(), "Ada");
        assert_eq!(fields.last_name(), "Lovelace");
        assert_eq!(fields.phone_work(), "");
    }

    #[test]
    fn trims_whitespace() {
        let fields = ContactFields::new("  Grace ", "Hopper\n", " 555-0100 ").unwrap();
        assert_eq!(fields.first_name(), "Grace");
        assert_eq!(fields.last_name(), "Hopper");
        assert_eq!(fields.phone_work(), "555-0100");
    }

    #[test]
    fn rejects_blank_names() {
        let err = ContactFields::new("", "Lovelace", "").unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "first_name" });

        let err = ContactFields::new("Ada", "   ", "").unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "last_name" });
    }

    #[test]
    fn max_length() {
        let name_100 = "a".repeat(100);
        assert!(ContactFields::new(&name_100, "b", "").is_ok());

        let name_101 = "a".repeat(101);
        let err = ContactFields::new("a", &name_101, "").unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { field: "last_name", max: 100 }));

        let err = ContactFields::new("a", "b", &name_101).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { field: "phone_work", .. }));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let name = "é".repeat(100);
        assert!(ContactFields::new(&name, "b", "").is_ok());
    }

    #[test]
    fn contact_serializes_flat() {
        let id = ContactId::parse("a1b2c3d4-e5f6-4a7b-8c9d-0e1f2a3b4c5d").unwrap();
        let fields = ContactFields::new("Ada", "Lovelace", "555").unwrap();
        let json = serde_json::to_value(Contact::new(&id, &fields)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": "a1b2c3d4-e5f6-4a7b-8c9d-0e1f2a3b4c5d",
                "first_name": "Ada",
                "last_name": "Lovelace",
                "phone_work": "555",
            })
        );
    }
}
