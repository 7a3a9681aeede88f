use serde_json::{Map, Value};

use super::models::CreateItemRequest;
use crate::common::{ApiError, ValidationResult, Validator};

fn is_valid_price(price: &str) -> bool {
    matches!(price.parse::<f64>(), Ok(p) if p.is_finite() && p >= 0.0)
}

impl Validator<CreateItemRequest> for CreateItemRequest {
    fn validate(&self, data: &CreateItemRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.item_name.trim().is_empty() {
            result.add_error("itemName", "Item name is required");
        }
        if data.item_name.len() > 100 {
            result.add_error("itemName", "Item name must not exceed 100 characters");
        }
        if data.item_desc.trim().is_empty() {
            result.add_error("itemDesc", "Item description is required");
        }
        if !is_valid_price(&data.item_price) {
            result.add_error("itemPrice", "Price must be a non-negative decimal string");
        }
        if data.category.trim().is_empty() {
            result.add_error("category", "Category is required");
        }

        result
    }
}

/// Shape check for the PATCH /items/:item_name body.
pub fn validate_item_update(updates: &Map<String, Value>) -> Result<(), ApiError> {
    let mut result = ValidationResult::new();

    for (field, value) in updates {
        match field.as_str() {
            "itemName" | "itemDesc" | "category" => match value.as_str() {
                Some(s) if !s.trim().is_empty() => {}
                _ => result.add_error(field, "must be a non-empty string"),
            },
            "itemPrice" => match value.as_str() {
                Some(s) if is_valid_price(s) => {}
                _ => result.add_error(field, "must be a non-negative decimal string"),
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
