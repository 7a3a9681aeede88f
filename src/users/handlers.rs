use axum::{
    extract::{Extension, Path},
    response::IntoResponse,
    Json,
};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::models::{
    DeletedResponse, FavoriteResponse, RemovedResponse, UserDetailResponse, UserListResponse,
    UserUpdateResponse,
};
use super::services::UsersService;
use super::validators::validate_user_update;
use crate::auth::{ensure_self_or_admin, AdminUser, AuthedUser};
use crate::common::{ApiError, AppState};

/// GET /users - List all users. Authorization: admin
pub async fn list_users(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    AdminUser(_): AdminUser,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let users_service = UsersService::new(app_state.db.clone());

    let users = users_service.find_all().await?;

    Ok(Json(UserListResponse { users }))
}

/// GET /users/:username - Profile with favorites. Authorization: self or admin
pub async fn get_user(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    AuthedUser(identity): AuthedUser,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_self_or_admin(&identity, &username)?;

    let app_state = state.read().await;
    let users_service = UsersService::new(app_state.db.clone());

    let user = users_service.get(&username).await?;

    Ok(Json(UserDetailResponse { user }))
}

/// PATCH /users/:username - Partial update. Authorization: self or admin
pub async fn update_user(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    AuthedUser(identity): AuthedUser,
    Path(username): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_self_or_admin(&identity, &username)?;

    let updates = match body {
        Value::Object(map) => map,
        _ => return Err(ApiError::BadRequest("Expected a JSON object".to_string())),
    };
    // only an admin may grant or revoke the admin flag
    if updates.contains_key("isAdmin") && !identity.is_admin {
        return Err(ApiError::Unauthorized("Unauthorized".to_string()));
    }
    validate_user_update(&updates)?;

    let app_state = state.read().await;
    let users_service = UsersService::new(app_state.db.clone());

    let user = users_service
        .update(&username, updates, app_state.bcrypt_cost)
        .await?;

    Ok(Json(UserUpdateResponse { user }))
}

/// DELETE /users/:username - Authorization: self or admin
pub async fn delete_user(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    AuthedUser(identity): AuthedUser,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_self_or_admin(&identity, &username)?;

    let app_state = state.read().await;
    let users_service = UsersService::new(app_state.db.clone());

    users_service.remove(&username).await?;

    Ok(Json(DeletedResponse { deleted: username }))
}

/// POST /users/:username/items/:item_name - Add a favorite.
/// Authorization: self or admin
pub async fn add_favorite(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    AuthedUser(identity): AuthedUser,
    Path((username, item_name)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_self_or_admin(&identity, &username)?;

    let app_state = state.read().await;
    let users_service = UsersService::new(app_state.db.clone());

    users_service.add_favorite(&username, &item_name).await?;

    Ok(Json(FavoriteResponse {
        favorite: item_name,
    }))
}

/// DELETE /users/:username/items/:item_name - Remove a favorite.
/// Authorization: self or admin
pub async fn remove_favorite(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    AuthedUser(identity): AuthedUser,
    Path((username, item_name)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_self_or_admin(&identity, &username)?;

    let app_state = state.read().await;
    let users_service = UsersService::new(app_state.db.clone());

    users_service.remove_favorite(&username, &item_name).await?;

    Ok(Json(RemovedResponse { removed: item_name }))
}
