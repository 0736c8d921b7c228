use crate::models::{contact, Contact, ContactChanges, NewContact};
use crate::services::store::{parse_id, ContactStore, StoreError};
use async_trait::async_trait;
use std::cmp::Reverse;
use tokio::sync::RwLock;

/// Process-local contact store with the same semantics as [`super::ContactDb`].
///
/// Email uniqueness is checked and the write applied under one write lock.
#[derive(Debug, Default)]
pub struct InMemoryContactStore {
    contacts: RwLock<Vec<Contact>>,
}

impl InMemoryContactStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContactStore for InMemoryContactStore {
    async fn list_all(&self) -> Result<Vec<Contact>, StoreError> {
        let mut contacts = self.contacts.read().await.clone();
        contacts.sort_by_key(|c| Reverse((c.created_at, c.id)));
        Ok(contacts)
    }

    async fn get_by_id(&self, id: &str) -> Result<Contact, StoreError> {
        let oid = parse_id(id)?;
        self.contacts
            .read()
            .await
            .iter()
            .find(|c| c.id == oid)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create(&self, input: NewContact) -> Result<Contact, StoreError> {
        let mut contacts = self.contacts.write().await;
        if contacts.iter().any(|c| c.email == input.email) {
            return Err(StoreError::Conflict);
        }
        let contact = Contact::new(input);
        contacts.push(contact.clone());
        Ok(contact)
    }

    async fn update_by_id(
        &self,
        id: &str,
        changes: ContactChanges,
    ) -> Result<Contact, StoreError> {
        let oid = parse_id(id)?;
        let mut contacts = self.contacts.write().await;

        // A missing target is NotFound even if the new email is taken
        let index = contacts
            .iter()
            .position(|c| c.id == oid)
            .ok_or(StoreError::NotFound)?;

        if let Some(email) = &changes.email {
            if contacts.iter().any(|c| c.id != oid && &c.email == email) {
                return Err(StoreError::Conflict);
            }
        }

        let existing = &mut contacts[index];
        changes.apply(existing, contact::now());
        Ok(existing.clone())
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        let oid = parse_id(id)?;
        let mut contacts = self.contacts.write().await;
        let before = contacts.len();
        contacts.retain(|c| c.id != oid);
        if contacts.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
