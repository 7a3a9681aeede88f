// Common module - shared types and utilities across all modules

pub mod error;
pub mod migrations;
pub mod sql;
pub mod state;
pub mod validation;

#[cfg(test)]
pub mod test_util;

// Re-export commonly used types for convenience
pub use error::ApiError;
pub use state::AppState;
pub use validation::{parse_body, ValidationResult, Validator};
