use crate::dtos::{ContactResponse, CreateContactRequest, MessageResponse, UpdateContactRequest};
use crate::models::{ContactChanges, NewContact};
use crate::services::record_store_operation;
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::WithRejection;
use service_core::error::AppError;

pub async fn list_contacts(
    State(state): State<AppState>,
) -> Result<Json<Vec<ContactResponse>>, AppError> {
    let result = state.store.list_all().await;
    record_store_operation("list", &result);

    let contacts = result?;
    Ok(Json(contacts.into_iter().map(ContactResponse::from).collect()))
}

pub async fn get_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ContactResponse>, AppError> {
    let result = state.store.get_by_id(&id).await;
    record_store_operation("get", &result);

    Ok(Json(ContactResponse::from(result?)))
}

pub async fn create_contact(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateContactRequest>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let input = NewContact::try_from(payload)?;

    let result = state.store.create(input).await;
    record_store_operation("create", &result);
    let contact = result?;

    tracing::info!(contact_id = %contact.id, "Contact created");

    Ok((StatusCode::CREATED, Json(ContactResponse::from(contact))))
}

pub async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateContactRequest>, AppError>,
) -> Result<Json<ContactResponse>, AppError> {
    let changes = ContactChanges::try_from(payload)?;

    let result = state.store.update_by_id(&id, changes).await;
    record_store_operation("update", &result);
    let contact = result?;

    tracing::info!(contact_id = %contact.id, "Contact updated");

    Ok(Json(ContactResponse::from(contact)))
}

pub async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let result = state.store.delete_by_id(&id).await;
    record_store_operation("delete", &result);
    result?;

    tracing::info!(contact_id = %id, "Contact deleted");

    Ok(Json(MessageResponse::new("Contact deleted")))
}
