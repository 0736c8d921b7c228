//! Persistence seam for contacts.
//!
//! Handlers only see [`ContactStore`]; production wires in [`super::ContactDb`],
//! tests and `STORE_BACKEND=memory` runs use [`super::InMemoryContactStore`].

use crate::models::{Contact, ContactChanges, NewContact};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Contact not found")]
    NotFound,

    #[error("Email already exists")]
    Conflict,

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

impl StoreError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::NotFound => "not_found",
            StoreError::Conflict => "conflict",
            StoreError::Database(_) => "error",
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::NotFound(anyhow::anyhow!("Contact not found")),
            StoreError::Conflict => AppError::BadRequest(anyhow::anyhow!("Email already exists")),
            StoreError::Database(e) => AppError::from(e),
        }
    }
}

#[async_trait]
pub trait ContactStore: Send + Sync {
    /// All contacts, newest `created_at` first.
    async fn list_all(&self) -> Result<Vec<Contact>, StoreError>;

    async fn get_by_id(&self, id: &str) -> Result<Contact, StoreError>;

    /// Fails with [`StoreError::Conflict`] if the email is taken.
    async fn create(&self, input: NewContact) -> Result<Contact, StoreError>;

    /// Applies `changes` and returns the updated contact.
    async fn update_by_id(&self, id: &str, changes: ContactChanges)
        -> Result<Contact, StoreError>;

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Ids that are not valid ObjectIds cannot match any contact.
pub(crate) fn parse_id(id: &str) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(id).map_err(|_| StoreError::NotFound)
}
