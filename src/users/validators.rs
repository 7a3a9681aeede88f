use serde_json::{Map, Value};

use super::models::RegisterRequest;
use crate::common::{ApiError, ValidationResult, Validator};

pub const MIN_PASSWORD_LEN: usize = 5;
pub const MAX_USERNAME_LEN: usize = 30;

fn is_ten_digit_phone(phone: &str) -> bool {
    phone.len() == 10 && phone.chars().all(|c| c.is_ascii_digit())
}

fn is_plausible_email(email: &str) -> bool {
    email.len() > 3 && email.contains('@') && email.contains('.')
}

impl Validator<RegisterRequest> for RegisterRequest {
    fn validate(&self, data: &RegisterRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.username.trim().is_empty() {
            result.add_error("username", "Username is required");
        }
        if data.username.len() > MAX_USERNAME_LEN {
            result.add_error("username", "Username must not exceed 30 characters");
        }
        if data.password.len() < MIN_PASSWORD_LEN {
            result.add_error("password", "Password must be at least 5 characters");
        }
        if data.first_name.trim().is_empty() {
            result.add_error("firstName", "First name is required");
        }
        if data.last_name.trim().is_empty() {
            result.add_error("lastName", "Last name is required");
        }
        if !is_plausible_email(&data.email) {
            result.add_error("email", "Email must be a valid address");
        }
        if !is_ten_digit_phone(&data.phone) {
            result.add_error("phone", "Phone number must have exactly 10 digits");
        }

        result
    }
}

/// Shape check for the PATCH /users/:username body: only known fields, each
/// with the right type. Emptiness is the update builder's concern.
pub fn validate_user_update(updates: &Map<String, Value>) -> Result<(), ApiError> {
    let mut result = ValidationResult::new();

    for (field, value) in updates {
        match field.as_str() {
            "firstName" | "lastName" => {
                match value.as_str() {
                    Some(s) if !s.trim().is_empty() => {}
                    _ => result.add_error(field, "must be a non-empty string"),
                }
            }
            "email" => match value.as_str() {
                Some(s) if is_plausible_email(s) => {}
                _ => result.add_error(field, "must be a valid address"),
            },
            "phone" => match value.as_str() {
                Some(s) if is_ten_digit_phone(s) => {}
                _ => result.add_error(field, "must have exactly 10 digits"),
            },
            "password" => match value.as_str() {
                Some(s) if s.len() >= MIN_PASSWORD_LEN => {}
                _ => result.add_error(field, "must be at least 5 characters"),
            },
            "isAdmin" => {
                if !value.is_boolean() {
                    result.add_error(field, "must be a boolean");
                }
            }
            _ => result.add_error(field, "unknown field"),
        }
    }

    if result.is_valid {
        Ok(())
    } else {
        Err(ApiError::from(result))
    }
}
