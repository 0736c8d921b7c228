pub mod contacts;

pub use contacts::{
    ContactResponse, CreateContactRequest, MessageResponse, UpdateContactRequest,
};
