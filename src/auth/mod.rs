//! # Auth Module
//!
//! Token issue/verification, password hashing, and the request authorization
//! gates (anonymous / logged-in / admin / self-or-admin).

pub mod extractors;
pub mod handlers;
pub mod models;
pub mod passwords;
pub mod routes;
pub mod token;

#[cfg(test)]
mod tests;

pub use extractors::{ensure_self_or_admin, AdminUser, AuthedUser, Identity, OptionalIdentity};
pub use routes::auth_routes;
