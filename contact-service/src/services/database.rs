use crate::models::{contact, Contact, ContactChanges, NewContact};
use crate::services::store::{parse_id, ContactStore, StoreError};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    error::{ErrorKind, WriteFailure},
    options::{FindOneAndUpdateOptions, FindOptions, IndexOptions, ReturnDocument},
    Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;
use tracing::instrument;

/// Database used when neither the config nor the URI names one.
pub const DEFAULT_DATABASE: &str = "contactapp";

const CONTACTS_COLLECTION: &str = "contacts";
const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Clone)]
pub struct ContactDb {
    client: MongoClient,
    db: Database,
}

impl ContactDb {
    /// Connects and pings the server, so an unreachable database fails here
    /// rather than on the first request.
    pub async fn connect(uri: &str, database: Option<&str>) -> Result<Self, AppError> {
        tracing::info!("Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            AppError::from(e)
        })?;

        let db = match database {
            Some(name) => client.database(name),
            None => client
                .default_database()
                .unwrap_or_else(|| client.database(DEFAULT_DATABASE)),
        };

        let store = Self { client, db };
        store.ping().await?;

        tracing::info!(database = %store.db.name(), "Successfully connected to MongoDB database");
        Ok(store)
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for contact-service");

        let contacts = self.contacts();

        // Unique email backs the no-duplicate-contacts invariant
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .name("email_unique".to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        contacts.create_index(email_index, None).await.map_err(|e| {
            tracing::error!("Failed to create email index: {}", e);
            AppError::from(e)
        })?;
        tracing::info!("Created unique index on contacts.email");

        let created_index = IndexModel::builder()
            .keys(doc! { "createdAt": -1 })
            .options(
                IndexOptions::builder()
                    .name("created_at_idx".to_string())
                    .build(),
            )
            .build();

        contacts.create_index(created_index, None).await.map_err(|e| {
            tracing::error!("Failed to create createdAt index: {}", e);
            AppError::from(e)
        })?;
        tracing::info!("Created index on contacts.createdAt");

        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB ping failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    pub fn contacts(&self) -> Collection<Contact> {
        self.db.collection(CONTACTS_COLLECTION)
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

/// Inserts and find-and-modify report unique index violations differently.
fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY_CODE,
        ErrorKind::Command(e) => e.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

fn classify(err: mongodb::error::Error) -> StoreError {
    if is_duplicate_key(&err) {
        StoreError::Conflict
    } else {
        StoreError::Database(err)
    }
}

#[async_trait]
impl ContactStore for ContactDb {
    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<Contact>, StoreError> {
        let options = FindOptions::builder()
            .sort(doc! { "createdAt": -1, "_id": -1 })
            .build();

        let cursor = self.contacts().find(None, options).await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: &str) -> Result<Contact, StoreError> {
        let oid = parse_id(id)?;
        self.contacts()
            .find_one(doc! { "_id": oid }, None)
            .await?
            .ok_or(StoreError::NotFound)
    }

    #[instrument(skip(self, input), fields(email = %input.email))]
    async fn create(&self, input: NewContact) -> Result<Contact, StoreError> {
        let contact = Contact::new(input);
        self.contacts()
            .insert_one(&contact, None)
            .await
            .map_err(classify)?;
        Ok(contact)
    }

    #[instrument(skip(self, changes))]
    async fn update_by_id(
        &self,
        id: &str,
        changes: ContactChanges,
    ) -> Result<Contact, StoreError> {
        let oid = parse_id(id)?;
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.contacts()
            .find_one_and_update(
                doc! { "_id": oid },
                changes.to_update_document(contact::now()),
                options,
            )
            .await
            .map_err(classify)?
            .ok_or(StoreError::NotFound)
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        let oid = parse_id(id)?;
        let result = self.contacts().delete_one(doc! { "_id": oid }, None).await?;
        if result.deleted_count == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await?;
        Ok(())
    }
}
