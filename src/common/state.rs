// Application state shared across all modules

use sqlx::SqlitePool;

/// Application state containing the database pool and auth configuration
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub jwt_secret: String,
    pub bcrypt_cost: u32,
}
