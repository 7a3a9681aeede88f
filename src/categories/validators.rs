use serde_json::{Map, Value};

use super::models::CreateCategoryRequest;
use crate::common::{ApiError, ValidationResult, Validator};

pub const MAX_CATEGORY_NAME_LEN: usize = 50;

impl Validator<CreateCategoryRequest> for CreateCategoryRequest {
    fn validate(&self, data: &CreateCategoryRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.category_name.trim().is_empty() {
            result.add_error("categoryName", "Category name is required");
        }
        if data.category_name.len() > MAX_CATEGORY_NAME_LEN {
            result.add_error("categoryName", "Category name must not exceed 50 characters");
        }

        result
    }
}

/// Shape check for the PATCH /categories/:category body.
pub fn validate_category_update(updates: &Map<String, Value>) -> Result<(), ApiError> {
    let mut result = ValidationResult::new();

    for (field, value) in updates {
        match field.as_str() {
            "categoryName" => match value.as_str() {
                Some(s) if !s.trim().is_empty() && s.len() <= MAX_CATEGORY_NAME_LEN => {}
                _ => result.add_error(field, "must be a non-empty string of at most 50 characters"),
            },
            _ => result.add_error(field, "unknown field"),
        }
    }

    if result.is_valid {
        Ok(())
    } else {
        Err(ApiError::from(result))
    }
}
