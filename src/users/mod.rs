//! # Users Module
//!
//! Accounts, authentication against stored credentials, partial profile
//! updates, and per-user favorites.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod validators;


pub use routes::users_routes;
