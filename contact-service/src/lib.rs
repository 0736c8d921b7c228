//! Contact service: CRUD over contacts stored in MongoDB, exposed over HTTP.
pub mod config;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
