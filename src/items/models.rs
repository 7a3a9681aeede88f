use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Menu item as served by the API; `category` is the owning category's name,
/// `item_price` a decimal-as-string.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub item_name: String,
    pub item_desc: String,
    pub item_price: String,
    pub category: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateItemRequest {
    pub item_name: String,
    pub item_desc: String,
    pub item_price: String,
    pub category: String,
}

#[derive(Serialize)]
pub struct ItemListResponse {
    pub items: Vec<Item>,
}

#[derive(Serialize)]
pub struct ItemResponse {
    pub item: Item,
}

#[derive(Serialize)]
pub struct DeletedResponse {
    pub deleted: String,
}
