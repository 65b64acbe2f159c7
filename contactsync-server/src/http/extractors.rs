//! Custom Axum extractors

use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::Deserialize;

use super::error::ApiError;
use crate::models::{ContactFields, ContactId, ValidationError};

/// Extract and validate a contact id from path
pub struct ValidContactId(pub ContactId);

impl<S> FromRequestParts<S> for ValidContactId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::Empty { field: "id" }))?;

        Ok(Self(ContactId::parse(&id)?))
    }
}

/// Create/update request body. Missing and null fields read as empty, so the
/// caller gets a validation error naming the field.
#[derive(Debug, Default, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone_work: Option<String>,
}

impl TryFrom<ContactRequest> for ContactFields {
    type Error = ValidationError;

    fn try_from(req: ContactRequest) -> Result<Self, Self::Error> {
        ContactFields::new(
            req.first_name.as_deref().unwrap_or_default(),
            req.last_name.as_deref().unwrap_or_default(),
            req.phone_work.as_deref().unwrap_or_default(),
        )
    }
}

/// Extract and validate contact fields from a JSON body
pub struct ValidContact(pub ContactFields);

impl<S> FromRequest<S> for ValidContact
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body): Json<ContactRequest> = Json::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest {
                message: rejection.body_text(),
            })?;

        Ok(Self(ContactFields::try_from(body)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_phone_defaults_to_empty() {
        let req: ContactRequest =
            serde_json::from_str(r#"{"first_name":"Ada","last_name":"Lovelace"}"#).unwrap();
        let fields = ContactFields::try_from(req).unwrap();
        assert_eq!(fields.phone_work(), "");
    }

    #[test]
    fn null_name_is_empty() {
        let req: ContactRequest =
            serde_json::from_str(r#"{"first_name":null,"last_name":"Lovelace"}"#).unwrap();
        let err = ContactFields::try_from(req).unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "first_name" });
    }

    #[test]
    fn unknown_fields_ignored() {
        let req: ContactRequest = serde_json::from_str(
            r#"{"first_name":"Ada","last_name":"Lovelace","id":"ignored","deleted":1}"#,
        )
        .unwrap();
        assert!(ContactFields::try_from(req).is_ok());
    }
}
