//! MongoDB-backed store tests. Set `TEST_MONGODB_URI` to run them; each test
//! works in its own throwaway database.

mod common;

use common::TestApp;
use contact_service::dtos::ContactResponse;
use contact_service::models::{ContactChanges, NewContact};
use contact_service::services::{ContactDb, ContactStore, StoreError};
use reqwest::StatusCode;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

struct TestDb {
    db: ContactDb,
    name: String,
}

impl TestDb {
    async fn cleanup(&self) {
        let _ = self.db.client().database(&self.name).drop(None).await;
    }
}

async fn test_db() -> Option<TestDb> {
    let Ok(uri) = std::env::var("TEST_MONGODB_URI") else {
        eprintln!("TEST_MONGODB_URI not set; skipping MongoDB test");
        return None;
    };

    let name = format!("contact_test_{}", Uuid::new_v4().simple());
    let db = ContactDb::connect(&uri, Some(name.as_str()))
        .await
        .expect("Failed to connect to MongoDB");
    db.initialize_indexes()
        .await
        .expect("Failed to create indexes");

    Some(TestDb { db, name })
}

fn new_contact(name: &str, email: &str) -> NewContact {
    NewContact {
        name: name.to_string(),
        email: email.to_string(),
        phone: None,
    }
}

#[tokio::test]
async fn unique_index_rejects_duplicate_emails() {
    let Some(test) = test_db().await else { return };

    test.db.create(new_contact("Ann", "ann@x.com")).await.unwrap();
    let err = test
        .db
        .create(new_contact("Ann Again", "ann@x.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict), "got {err:?}");
    assert_eq!(test.db.list_all().await.unwrap().len(), 1);

    test.cleanup().await;
}

#[tokio::test]
async fn update_into_taken_email_is_a_conflict() {
    let Some(test) = test_db().await else { return };

    test.db.create(new_contact("Ann", "ann@x.com")).await.unwrap();
    let bob = test.db.create(new_contact("Bob", "bob@x.com")).await.unwrap();

    let err = test
        .db
        .update_by_id(
            &bob.id.to_hex(),
            ContactChanges {
                email: Some("ann@x.com".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict), "got {err:?}");

    test.cleanup().await;
}

#[tokio::test]
async fn partial_update_and_phone_clearing_persist() {
    let Some(test) = test_db().await else { return };

    let ann = test
        .db
        .create(NewContact {
            phone: Some("555-0100".to_string()),
            ..new_contact("Ann", "ann@x.com")
        })
        .await
        .unwrap();
    let id = ann.id.to_hex();

    let renamed = test
        .db
        .update_by_id(
            &id,
            ContactChanges {
                name: Some("Annie".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Annie");
    assert_eq!(renamed.phone.as_deref(), Some("555-0100"));
    assert_eq!(renamed.created_at, ann.created_at);

    let cleared = test
        .db
        .update_by_id(
            &id,
            ContactChanges {
                phone: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.phone, None);
    assert_eq!(test.db.get_by_id(&id).await.unwrap(), cleared);

    test.cleanup().await;
}

#[tokio::test]
async fn missing_and_malformed_ids_are_not_found() {
    let Some(test) = test_db().await else { return };

    for id in ["65a1f0c2e4b0a1b2c3d4e5f6", "123"] {
        assert!(matches!(
            test.db.get_by_id(id).await,
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            test.db.update_by_id(id, ContactChanges::default()).await,
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            test.db.delete_by_id(id).await,
            Err(StoreError::NotFound)
        ));
    }

    test.cleanup().await;
}

#[tokio::test]
async fn http_round_trip_against_mongodb() {
    let Some(test) = test_db().await else { return };
    let app = TestApp::spawn_with_store(Arc::new(test.db.clone())).await;

    let response = app
        .create_contact(&json!({ "name": "Ann", "email": "ann@x.com" }))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let first: ContactResponse = response.json().await.unwrap();

    let response = app
        .create_contact(&json!({ "name": "Ann", "email": "ann@x.com" }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second: ContactResponse = app
        .create_contact(&json!({ "name": "Bob", "email": "bob@x.com" }))
        .await
        .json()
        .await
        .unwrap();

    let listed: Vec<ContactResponse> = app.list_contacts().await.json().await.unwrap();
    let ids: Vec<_> = listed.into_iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![second.id, first.id.clone()]);

    assert_eq!(app.delete_contact(&first.id).await.status(), StatusCode::OK);
    assert_eq!(
        app.delete_contact(&first.id).await.status(),
        StatusCode::NOT_FOUND
    );

    test.cleanup().await;
}
