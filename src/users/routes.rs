use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Creates the users router
pub fn users_routes() -> Router {
    Router::new()
        .route("/users", get(handlers::list_users))
        .route(
            "/users/:username",
            get(handlers::get_user)
                .patch(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .route(
            "/users/:username/items/:item_name",
            post(handlers::add_favorite).delete(handlers::remove_favorite),
        )
}
