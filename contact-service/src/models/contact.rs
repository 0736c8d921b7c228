use chrono::{DateTime, Utc};
use mongodb::bson::{doc, oid::ObjectId, Bson, DateTime as BsonDateTime, Document};
use serde::{Deserialize, Serialize};

/// A stored contact. `email` is unique across the collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a contact.
#[derive(Debug, Clone, PartialEq)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// A partial update. `None` leaves a field untouched; for `phone`,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<Option<String>>,
}

/// Current time at the millisecond precision BSON stores.
pub fn now() -> DateTime<Utc> {
    BsonDateTime::now().to_chrono()
}

impl Contact {
    pub fn new(input: NewContact) -> Self {
        let now = now();
        Self {
            id: ObjectId::new(),
            name: input.name,
            email: input.email,
            phone: input.phone,
            created_at: now,
            updated_at: now,
        }
    }
}

impl ContactChanges {
    pub fn apply(self, contact: &mut Contact, at: DateTime<Utc>) {
        if let Some(name) = self.name {
            contact.name = name;
        }
        if let Some(email) = self.email {
            contact.email = email;
        }
        if let Some(phone) = self.phone {
            contact.phone = phone;
        }
        contact.updated_at = at;
    }

    /// Builds the `$set`/`$unset` update document for these changes.
    pub fn to_update_document(&self, at: DateTime<Utc>) -> Document {
        let mut set = doc! { "updatedAt": Bson::DateTime(at.into()) };
        let mut unset = Document::new();

        if let Some(name) = &self.name {
            set.insert("name", name.as_str());
        }
        if let Some(email) = &self.email {
            set.insert("email", email.as_str());
        }
        match &self.phone {
            Some(Some(phone)) => {
                set.insert("phone", phone.as_str());
            }
            Some(None) => {
                unset.insert("phone", "");
            }
            None => {}
        }

        let mut update = doc! { "$set": set };
        if !unset.is_empty() {
            update.insert("$unset", unset);
        }
        update
    }
}
