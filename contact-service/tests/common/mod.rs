//! Common test utilities for contact-service integration tests.
#![allow(dead_code)]

use contact_service::config::{ContactConfig, MongoConfig, StoreBackend};
use contact_service::services::{init_metrics, ContactStore, InMemoryContactStore};
use contact_service::startup::Application;
use service_core::config::Config as CoreConfig;
use std::sync::{Arc, Once};

static INIT: Once = Once::new();

/// Initialize tracing and the metrics recorder for tests (only once).
pub fn init_test_environment() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,contact_service=debug")
            .with_test_writer()
            .try_init()
            .ok();
        init_metrics().expect("Failed to install metrics recorder");
    });
}

pub fn test_config(store: StoreBackend) -> ContactConfig {
    ContactConfig {
        common: CoreConfig { port: 0 }, // Random port for testing
        mongodb: MongoConfig {
            uri: "mongodb://localhost:27017".to_string(),
            database: None,
        },
        store,
    }
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: Arc<dyn ContactStore>,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn the service on a random port backed by a fresh in-memory store.
    pub async fn spawn() -> Self {
        Self::spawn_with_store(Arc::new(InMemoryContactStore::new())).await
    }

    pub async fn spawn_with_store(store: Arc<dyn ContactStore>) -> Self {
        init_test_environment();

        let app = Application::build_with_store(test_config(StoreBackend::Memory), store)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let store = app.store();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            store,
            client,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn create_contact(&self, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(self.url("/api/contacts"))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_contact(&self, id: &str) -> reqwest::Response {
        self.client
            .get(self.url(&format!("/api/contacts/{}", id)))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn list_contacts(&self) -> reqwest::Response {
        self.client
            .get(self.url("/api/contacts"))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn patch_contact(&self, id: &str, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .patch(self.url(&format!("/api/contacts/{}", id)))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn put_contact(&self, id: &str, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .put(self.url(&format!("/api/contacts/{}", id)))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn delete_contact(&self, id: &str) -> reqwest::Response {
        self.client
            .delete(self.url(&format!("/api/contacts/{}", id)))
            .send()
            .await
            .expect("Failed to execute request")
    }
}
