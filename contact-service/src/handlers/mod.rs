pub mod contacts;
pub mod health;

pub use contacts::{create_contact, delete_contact, get_contact, list_contacts, update_contact};
pub use health::{health_check, metrics_endpoint, ping, readiness_check, welcome};
