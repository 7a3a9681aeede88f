use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::models::{LoginRequest, TokenResponse};
use super::token::create_token;
use crate::common::{parse_body, ApiError, AppState, Validator};
use crate::users::models::RegisterRequest;
use crate::users::services::UsersService;

/// POST /auth/token - Exchange username/password for a bearer token
pub async fn login(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let request: LoginRequest = parse_body(body)?;
    if request.username.trim().is_empty() || request.password.is_empty() {
        return Err(ApiError::BadRequest(
            "username and password are required".to_string(),
        ));
    }

    let app_state = state.read().await;
    let users_service = UsersService::new(app_state.db.clone());

    let user = users_service
        .authenticate(&request.username, &request.password)
        .await?;

    let token = create_token(&user.username, user.is_admin, &app_state.jwt_secret)?;

    info!(username = %user.username, "user logged in");
    Ok(Json(TokenResponse { token }))
}

/// POST /auth/register - Create an account and return a token for it
pub async fn register(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let request: RegisterRequest = parse_body(body)?;
    let validation = request.validate(&request);
    if !validation.is_valid {
        return Err(ApiError::from(validation));
    }

    let app_state = state.read().await;
    let users_service = UsersService::new(app_state.db.clone());

    let user = users_service
        .register(request, app_state.bcrypt_cost)
        .await?;

    let token = create_token(&user.username, user.is_admin, &app_state.jwt_secret)?;

    info!(username = %user.username, "user registered");
    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}
