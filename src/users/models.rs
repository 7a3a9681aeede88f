use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Public view of a user; the password hash never leaves the service layer.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub is_admin: bool,
}

/// Full database row, only used inside the service for authentication.
#[derive(Debug, FromRow)]
pub struct UserRow {
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub is_admin: bool,
}

impl From<UserRow> for UserProfile {
    fn from(row: UserRow) -> Self {
        Self {
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            is_admin: row.is_admin,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserWithFavorites {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub favorites: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserProfile>,
}

#[derive(Serialize)]
pub struct UserDetailResponse {
    pub user: UserWithFavorites,
}

#[derive(Serialize)]
pub struct UserUpdateResponse {
    pub user: UserProfile,
}

#[derive(Serialize)]
pub struct DeletedResponse {
    pub deleted: String,
}

#[derive(Serialize)]
pub struct FavoriteResponse {
    pub favorite: String,
}

#[derive(Serialize)]
pub struct RemovedResponse {
    pub removed: String,
}
