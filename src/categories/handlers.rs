use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::models::{CategoryListResponse, CategoryResponse, CreateCategoryRequest, DeletedResponse};
use super::services::CategoriesService;
use super::validators::validate_category_update;
use crate::auth::AdminUser;
use crate::common::{parse_body, ApiError, AppState, Validator};
use crate::items::models::ItemListResponse;

/// GET /categories - List category names. Authorization: none
pub async fn list_categories(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let categories_service = CategoriesService::new(app_state.db.clone());

    let categories = categories_service.find_all().await?;

    Ok(Json(CategoryListResponse { categories }))
}

/// GET /categories/:category - Items in the category. Authorization: none
pub async fn items_in_category(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    Path(category): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let categories_service = CategoriesService::new(app_state.db.clone());

    let items = categories_service.items_in(&category).await?;

    Ok(Json(ItemListResponse { items }))
}

/// POST /categories - Create a category. Authorization: admin
pub async fn create_category(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    AdminUser(_): AdminUser,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let request: CreateCategoryRequest = parse_body(body)?;
    let validation = request.validate(&request);
    if !validation.is_valid {
        return Err(ApiError::from(validation));
    }

    let app_state = state.read().await;
    let categories_service = CategoriesService::new(app_state.db.clone());

    let category = categories_service.create(request).await?;

    Ok((StatusCode::CREATED, Json(CategoryResponse { category })))
}

/// PATCH /categories/:category - Rename. Authorization: admin
pub async fn update_category(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    AdminUser(_): AdminUser,
    Path(category): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let updates = match body {
        Value::Object(map) => map,
        _ => return Err(ApiError::BadRequest("Expected a JSON object".to_string())),
    };
    validate_category_update(&updates)?;

    let app_state = state.read().await;
    let categories_service = CategoriesService::new(app_state.db.clone());

    let category = categories_service.update(&category, updates).await?;

    Ok(Json(CategoryResponse { category }))
}

/// DELETE /categories/:category - Authorization: admin
pub async fn delete_category(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    AdminUser(_): AdminUser,
    Path(category): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let app_state = state.read().await;
    let categories_service = CategoriesService::new(app_state.db.clone());

    categories_service.delete(&category).await?;

    Ok(Json(DeletedResponse { deleted: category }))
}
