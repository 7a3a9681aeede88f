//! # Categories Module
//!
//! Menu category CRUD. Reads are public; mutations are admin-only.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod validators;

#[cfg(test)]
mod tests;

pub use routes::categories_routes;
