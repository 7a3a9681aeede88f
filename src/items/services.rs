use serde_json::{json, Map, Value};
use sqlx::SqlitePool;
use tracing::info;

use super::models::{CreateItemRequest, Item};
use crate::common::sql::{bind_value, partial_update};
use crate::common::ApiError;

const ITEM_COLUMN_ALIASES: &[(&str, &str)] = &[
    ("itemName", "item_name"),
    ("itemDesc", "item_desc"),
    ("itemPrice", "item_price"),
];

const ITEM_SELECT: &str = r#"
    SELECT i.item_name, i.item_desc, i.item_price, c.category_name AS category
    FROM items i
    JOIN categories c ON c.id = i.category_id
"#;

pub struct ItemsService {
    db: SqlitePool,
}

impl ItemsService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn find_all(&self) -> Result<Vec<Item>, ApiError> {
        let items =
            sqlx::query_as::<_, Item>(&format!("{} ORDER BY i.item_name", ITEM_SELECT))
                .fetch_all(&self.db)
                .await?;
        Ok(items)
    }

    pub async fn get(&self, item_name: &str) -> Result<Item, ApiError> {
        let item =
            sqlx::query_as::<_, Item>(&format!("{} WHERE i.item_name = ?1", ITEM_SELECT))
                .bind(item_name)
                .fetch_optional(&self.db)
                .await?
                .ok_or_else(|| ApiError::NotFound(format!("No item: {}", item_name)))?;
        Ok(item)
    }

    /// Create a menu item. The name must be free and the referenced category
    /// must exist; both checks and the insert share one transaction so a
    /// failure leaves no row behind.
    pub async fn create(&self, request: CreateItemRequest) -> Result<Item, ApiError> {
        let mut tx = self.db.begin().await?;

        let duplicate: Option<(i64,)> = sqlx::query_as("SELECT id FROM items WHERE item_name = ?1")
            .bind(&request.item_name)
            .fetch_optional(&mut *tx)
            .await?;
        if duplicate.is_some() {
            return Err(ApiError::Conflict(format!(
                "Duplicate item: {}",
                request.item_name
            )));
        }

        let category_id = category_id(&mut tx, &request.category).await?;

        sqlx::query(
            r#"
            INSERT INTO items (item_name, item_desc, item_price, category_id)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&request.item_name)
        .bind(&request.item_desc)
        .bind(&request.item_price)
        .bind(category_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(item = %request.item_name, "created item");
        Ok(Item {
            item_name: request.item_name,
            item_desc: request.item_desc,
            item_price: request.item_price,
            category: request.category,
        })
    }

    /// Partial update keyed by the current item name. A `category` entry is
    /// resolved to its id before the clause is built, so an unknown category
    /// aborts before anything is written.
    pub async fn update(
        &self,
        item_name: &str,
        mut updates: Map<String, Value>,
    ) -> Result<Item, ApiError> {
        let mut tx = self.db.begin().await?;

        if let Some(category) = updates.remove("category") {
            let name = category
                .as_str()
                .ok_or_else(|| ApiError::BadRequest("category: must be a string".to_string()))?;
            let id = category_id(&mut tx, name).await?;
            updates.insert("category_id".to_string(), json!(id));
        }

        let set = partial_update(&updates, ITEM_COLUMN_ALIASES)?;

        let sql = format!(
            "UPDATE items SET {} WHERE item_name = ?{}",
            set.clause,
            set.next_placeholder()
        );
        let mut query = sqlx::query(&sql);
        for value in &set.values {
            query = bind_value(query, value);
        }
        let result = query
            .bind(item_name)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if e.to_string().contains("UNIQUE constraint failed") {
                    ApiError::Conflict("Item name already exists".to_string())
                } else {
                    ApiError::Database(e)
                }
            })?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(format!("No item: {}", item_name)));
        }

        let current_name = updates
            .get("itemName")
            .and_then(Value::as_str)
            .unwrap_or(item_name);
        let item = sqlx::query_as::<_, Item>(&format!("{} WHERE i.item_name = ?1", ITEM_SELECT))
            .bind(current_name)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(item)
    }

    pub async fn delete(&self, item_name: &str) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM items WHERE item_name = ?1")
            .bind(item_name)
            .execute(&self.db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(format!("No item: {}", item_name)));
        }
        Ok(())
    }
}

async fn category_id(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    category_name: &str,
) -> Result<i64, ApiError> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM categories WHERE category_name = ?1")
        .bind(category_name)
        .fetch_optional(&mut **tx)
        .await?;
    row.map(|(id,)| id)
        .ok_or_else(|| ApiError::NotFound(format!("No category: {}", category_name)))
}
