//! JWT issue/decode helpers

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::models::Claims;
use crate::common::ApiError;

pub const TOKEN_EXPIRY_HOURS: i64 = 24;

/// Sign a token for the given user. Callers that don't know better pass
/// `is_admin = false`.
pub fn create_token(username: &str, is_admin: bool, secret: &str) -> Result<String, ApiError> {
    let claims = Claims::new(username, is_admin);
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::InternalServer(format!("token generation failed: {}", e)))
}

/// Verify signature and expiry, returning the embedded claims.
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )?;
    Ok(data.claims)
}
