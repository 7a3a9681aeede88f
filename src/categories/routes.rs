use axum::{routing::get, Router};

use super::handlers;

/// Creates the menu categories router
pub fn categories_routes() -> Router {
    Router::new()
        .route(
            "/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/categories/:category",
            get(handlers::items_in_category)
                .patch(handlers::update_category)
                .delete(handlers::delete_category),
        )
}
