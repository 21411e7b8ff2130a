//! Contact handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use core_kernel::ContactId;
use domain_party::{Contact, ContactRole};

use crate::dto::contact::*;
use crate::{error::ApiError, AppState};

/// Creates a contact
pub async fn create_contact(
    State(state): State<AppState>,
    Json(request): Json<CreateContactRequest>,
) -> Result<(StatusCode, Json<ContactResponse>), ApiError> {
    request.validate()?;
    let role: ContactRole = request.role.parse()?;
    let contact = Contact::new(request.name, role)?;

    state.store.save_contact(&contact).await?;
    tracing::info!(contact_id = %contact.id, role = %contact.role, "Contact created");

    Ok((StatusCode::CREATED, Json(ContactResponse::from(&contact))))
}

/// Gets a contact by ID
pub async fn get_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ContactResponse>, ApiError> {
    let id: ContactId = id
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid contact id '{}'", id)))?;
    let contact = state.store.get_contact(id).await?;
    Ok(Json(ContactResponse::from(&contact)))
}
