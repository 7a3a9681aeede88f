use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::models::{CreateItemRequest, DeletedResponse, ItemListResponse, ItemResponse};
use super::services::ItemsService;
use super::validators::validate_item_update;
use crate::auth::AdminUser;
use crate::common::{parse_body, ApiError, AppState, Validator};

/// GET /items - List all menu items. Authorization: none
pub async fn list_items(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let items_service = ItemsService::new(app_state.db.clone());

    let items = items_service.find_all().await?;

    Ok(Json(ItemListResponse { items }))
}

/// GET /items/:item_name - Authorization: none
pub async fn get_item(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    Path(item_name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let items_service = ItemsService::new(app_state.db.clone());

    let item = items_service.get(&item_name).await?;

    Ok(Json(ItemResponse { item }))
}

/// POST /items - Create a menu item. Authorization: admin
pub async fn create_item(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    AdminUser(_): AdminUser,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let request: CreateItemRequest = parse_body(body)?;
    let validation = request.validate(&request);
    if !validation.is_valid {
        return Err(ApiError::from(validation));
    }

    let app_state = state.read().await;
    let items_service = ItemsService::new(app_state.db.clone());

    let item = items_service.create(request).await?;

    Ok((StatusCode::CREATED, Json(ItemResponse { item })))
}

/// PATCH /items/:item_name - Partial update. Authorization: admin
pub async fn update_item(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    AdminUser(_): AdminUser,
    Path(item_name): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let updates = match body {
        Value::Object(map) => map,
        _ => return Err(ApiError::BadRequest("Expected a JSON object".to_string())),
    };
    validate_item_update(&updates)?;

    let app_state = state.read().await;
    let items_service = ItemsService::new(app_state.db.clone());

    let item = items_service.update(&item_name, updates).await?;

    Ok(Json(ItemResponse { item }))
}

/// DELETE /items/:item_name - Authorization: admin
pub async fn delete_item(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    AdminUser(_): AdminUser,
    Path(item_name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let items_service = ItemsService::new(app_state.db.clone());

    items_service.delete(&item_name).await?;

    Ok(Json(DeletedResponse { deleted: item_name }))
}
