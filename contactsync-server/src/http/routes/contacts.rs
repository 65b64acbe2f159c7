//! Contact endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, put},
    Json, Router,
};
use serde::Serialize;

use crate::http::error::ApiError;
use crate::http::extractors::{ValidContact, ValidContactId};
use crate::http::server::AppState;
use crate::models::Contact;
use crate::service::{CreateOutcome, StoreKind};

/// Create contact response
#[derive(Debug, Serialize)]
pub struct CreateContactResponse {
    pub status: &'static str,
    pub id: String,
    pub synced: Vec<StoreKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<&'static str>,
}

impl From<CreateOutcome> for CreateContactResponse {
    fn from(outcome: CreateOutcome) -> Self {
        Self {
            status: "success",
            id: outcome.id.to_string(),
            synced: outcome.synced,
            warning: outcome.warning,
        }
    }
}

/// Update/delete response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

/// GET /contacts - active contacts, newest first
async fn list_contacts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Contact>>, ApiError> {
    let contacts = state.service.list().await?;
    Ok(Json(contacts))
}

/// POST /contacts - create in primary, then mirror to secondary
async fn create_contact(
    State(state): State<Arc<AppState>>,
    ValidContact(fields): ValidContact,
) -> Result<Json<CreateContactResponse>, ApiError> {
    let outcome = state.service.create(&fields).await?;
    Ok(Json(CreateContactResponse::from(outcome)))
}

/// PUT /contacts/{id} - full replace in both stores
async fn update_contact(
    State(state): State<Arc<AppState>>,
    ValidContactId(id): ValidContactId,
    ValidContact(fields): ValidContact,
) -> Result<Json<StatusResponse>, ApiError> {
    state.service.update(&id, &fields).await?;
    Ok(Json(StatusResponse { status: "updated" }))
}

/// DELETE /contacts/{id} - soft delete in primary, hard delete in secondary
async fn delete_contact(
    State(state): State<Arc<AppState>>,
    ValidContactId(id): ValidContactId,
) -> Result<Json<StatusResponse>, ApiError> {
    state.service.delete(&id).await?;
    Ok(Json(StatusResponse { status: "deleted" }))
}

/// Contact routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/contacts", get(list_contacts).post(create_contact))
        .route("/contacts/{id}", put(update_contact).delete(delete_contact))
}
