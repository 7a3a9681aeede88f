use serde_json::{Map, Value};
use sqlx::SqlitePool;
use tracing::info;

use super::models::{Category, CreateCategoryRequest};
use crate::common::sql::{bind_value, partial_update};
use crate::common::ApiError;
use crate::items::models::Item;

const CATEGORY_COLUMN_ALIASES: &[(&str, &str)] = &[("categoryName", "category_name")];

pub struct CategoriesService {
    db: SqlitePool,
}

impl CategoriesService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn find_all(&self) -> Result<Vec<Category>, ApiError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT category_name FROM categories ORDER BY category_name",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(categories)
    }

    /// All items belonging to the named category.
    pub async fn items_in(&self, category_name: &str) -> Result<Vec<Item>, ApiError> {
        let category: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM categories WHERE category_name = ?1")
                .bind(category_name)
                .fetch_optional(&self.db)
                .await?;
        let (category_id,) = category
            .ok_or_else(|| ApiError::NotFound(format!("No category: {}", category_name)))?;

        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT i.item_name, i.item_desc, i.item_price, c.category_name AS category
            FROM items i
            JOIN categories c ON c.id = i.category_id
            WHERE i.category_id = ?1
            ORDER BY i.item_name
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.db)
        .await?;
        Ok(items)
    }

    pub async fn create(&self, request: CreateCategoryRequest) -> Result<Category, ApiError> {
        let mut tx = self.db.begin().await?;

        let duplicate: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM categories WHERE category_name = ?1")
                .bind(&request.category_name)
                .fetch_optional(&mut *tx)
                .await?;
        if duplicate.is_some() {
            return Err(ApiError::Conflict(format!(
                "Duplicate category: {}",
                request.category_name
            )));
        }

        sqlx::query("INSERT INTO categories (category_name) VALUES (?1)")
            .bind(&request.category_name)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(category = %request.category_name, "created category");
        Ok(Category {
            category_name: request.category_name,
        })
    }

    /// Rename in place, keeping the row (and its items) intact.
    pub async fn update(
        &self,
        category_name: &str,
        updates: Map<String, Value>,
    ) -> Result<Category, ApiError> {
        let set = partial_update(&updates, CATEGORY_COLUMN_ALIASES)?;

        let mut tx = self.db.begin().await?;

        let sql = format!(
            "UPDATE categories SET {} WHERE category_name = ?{}",
            set.clause,
            set.next_placeholder()
        );
        let mut query = sqlx::query(&sql);
        for value in &set.values {
            query = bind_value(query, value);
        }
        let result = query
            .bind(category_name)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if e.to_string().contains("UNIQUE constraint failed") {
                    ApiError::Conflict("Category name already exists".to_string())
                } else {
                    ApiError::Database(e)
                }
            })?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(format!("No category: {}", category_name)));
        }

        let current_name = updates
            .get("categoryName")
            .and_then(Value::as_str)
            .unwrap_or(category_name);
        let category =
            sqlx::query_as::<_, Category>("SELECT category_name FROM categories WHERE category_name = ?1")
                .bind(current_name)
                .fetch_one(&mut *tx)
                .await?;

        tx.commit().await?;
        Ok(category)
    }

    pub async fn delete(&self, category_name: &str) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM categories WHERE category_name = ?1")
            .bind(category_name)
            .execute(&self.db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(format!("No category: {}", category_name)));
        }
        Ok(())
    }
}
