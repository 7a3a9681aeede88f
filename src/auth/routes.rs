//! Authentication routes

use axum::{routing::post, Router};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `POST /auth/token` - Log in, returns a bearer token
/// - `POST /auth/register` - Register a new user, returns a bearer token
pub fn auth_routes() -> Router {
    Router::new()
        .route("/auth/token", post(handlers::login))
        .route("/auth/register", post(handlers::register))
}
