//! Shared fixtures for DB-backed tests

use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tokio::sync::RwLock;

use super::migrations::run_migrations;
use super::state::AppState;

pub const TEST_JWT_SECRET: &str = "test-secret";

// bcrypt minimum cost, to keep test runs fast
pub const TEST_BCRYPT_COST: u32 = 4;

/// In-memory database with the real schema. A single connection keeps the
/// `:memory:` database alive for the pool's lifetime.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");
    run_migrations(&pool).await.expect("migrations failed");
    pool
}

pub async fn test_state() -> Arc<RwLock<AppState>> {
    let pool = test_pool().await;
    Arc::new(RwLock::new(AppState {
        db: pool,
        jwt_secret: TEST_JWT_SECRET.to_string(),
        bcrypt_cost: TEST_BCRYPT_COST,
    }))
}
