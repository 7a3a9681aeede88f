//! # Items Module
//!
//! Menu item CRUD. Reads are public; mutations are admin-only.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod validators;


pub use routes::items_routes;
