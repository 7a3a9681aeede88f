//! Authentication data models

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

/// JWT claims carried by a bearer token
#[derive(Serialize, Deserialize, Debug)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Admin flag; a token issued without one is a non-admin token
    #[serde(default)]
    pub is_admin: bool,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(username: &str, is_admin: bool) -> Self {
        let now = Utc::now();
        Self {
            sub: username.to_string(),
            is_admin,
            iat: now.timestamp(),
            exp: (now + Duration::hours(super::token::TOKEN_EXPIRY_HOURS)).timestamp(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}
