//! Password hashing and verification

use crate::common::ApiError;

/// Hash a password with bcrypt at the configured cost.
pub fn hash_password(plaintext: &str, cost: u32) -> Result<String, ApiError> {
    bcrypt::hash(plaintext, cost)
        .map_err(|e| ApiError::InternalServer(format!("password hashing failed: {}", e)))
}

/// Check a password against a stored hash. A wrong password is `false`, not
/// an error; an unparseable hash is treated the same way.
pub fn verify_password(plaintext: &str, hash: &str) -> bool {
    bcrypt::verify(plaintext, hash).unwrap_or(false)
}
