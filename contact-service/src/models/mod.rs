pub mod contact;

pub use contact::{Contact, ContactChanges, NewContact};
