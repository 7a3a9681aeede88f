use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub category_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateCategoryRequest {
    pub category_name: String,
}

#[derive(Serialize)]
pub struct CategoryListResponse {
    pub categories: Vec<Category>,
}

#[derive(Serialize)]
pub struct CategoryResponse {
    pub category: Category,
}

#[derive(Serialize)]
pub struct DeletedResponse {
    pub deleted: String,
}
