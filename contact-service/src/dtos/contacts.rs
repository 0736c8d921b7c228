use crate::models::{Contact, ContactChanges, NewContact};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use service_core::error::AppError;
use validator::Validate;

pub const REQUIRED_FIELDS_MESSAGE: &str = "Name and email are required";
pub const EMPTY_FIELDS_MESSAGE: &str = "Name and email cannot be empty";

/// Body of `POST /api/contacts`.
///
/// A `name` or `email` that is not a JSON string counts as missing.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateContactRequest {
    #[serde(default, deserialize_with = "string_or_none")]
    #[validate(required, length(min = 1))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "string_or_none")]
    #[validate(required, length(min = 1))]
    pub email: Option<String>,

    pub phone: Option<String>,
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

impl TryFrom<CreateContactRequest> for NewContact {
    type Error = AppError;

    fn try_from(req: CreateContactRequest) -> Result<Self, Self::Error> {
        req.validate()
            .map_err(|_| AppError::BadRequest(anyhow::anyhow!(REQUIRED_FIELDS_MESSAGE)))?;

        match (req.name, req.email) {
            (Some(name), Some(email)) => Ok(NewContact {
                name,
                email,
                phone: req.phone,
            }),
            _ => Err(AppError::BadRequest(anyhow::anyhow!(REQUIRED_FIELDS_MESSAGE))),
        }
    }
}

/// Body of `PUT`/`PATCH /api/contacts/:id`.
///
/// Only these fields are writable; `id`, `createdAt` and anything else in
/// the body is dropped during deserialization.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateContactRequest {
    #[validate(length(min = 1))]
    pub name: Option<String>,

    #[validate(length(min = 1))]
    pub email: Option<String>,

    /// `null` clears the phone, absence leaves it alone.
    #[serde(default, deserialize_with = "present")]
    pub phone: Option<Option<String>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl TryFrom<UpdateContactRequest> for ContactChanges {
    type Error = AppError;

    fn try_from(req: UpdateContactRequest) -> Result<Self, Self::Error> {
        req.validate()
            .map_err(|_| AppError::BadRequest(anyhow::anyhow!(EMPTY_FIELDS_MESSAGE)))?;

        Ok(ContactChanges {
            name: req.name,
            email: req.email,
            phone: req.phone,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Contact> for ContactResponse {
    fn from(contact: Contact) -> Self {
        Self {
            id: contact.id.to_hex(),
            name: contact.name,
            email: contact.email,
            phone: contact.phone,
            created_at: contact.created_at,
            updated_at: contact.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
