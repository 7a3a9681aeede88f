//! Tests for the categories module

#[cfg(test)]
mod tests {
    use serde_json::{json, Map, Value};

    use crate::categories::models::CreateCategoryRequest;
    use crate::categories::services::CategoriesService;
    use crate::categories::validators::validate_category_update;
    use crate::common::test_util::test_pool;
    use crate::common::ApiError;
    use crate::items::models::CreateItemRequest;
    use crate::items::services::ItemsService;

    fn new_category(name: &str) -> CreateCategoryRequest {
        CreateCategoryRequest {
            category_name: name.to_string(),
        }
    }

    fn updates(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[tokio::test]
    async fn create_and_list_sorted_by_name() {
        let pool = test_pool().await;
        let service = CategoriesService::new(pool);

        service.create(new_category("sides")).await.unwrap();
        service.create(new_category("noodles")).await.unwrap();

        let names: Vec<String> = service
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.category_name)
            .collect();
        assert_eq!(names, vec!["noodles".to_string(), "sides".to_string()]);
    }

    #[tokio::test]
    async fn duplicate_category_is_a_conflict() {
        let pool = test_pool().await;
        let service = CategoriesService::new(pool);

        service.create(new_category("noodles")).await.unwrap();
        let err = service.create(new_category("noodles")).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn items_in_lists_only_that_categorys_items() {
        let pool = test_pool().await;
        let service = CategoriesService::new(pool.clone());
        service.create(new_category("noodles")).await.unwrap();
        service.create(new_category("sides")).await.unwrap();

        let items = ItemsService::new(pool);
        items
            .create(CreateItemRequest {
                item_name: "item1".to_string(),
                item_desc: "soup".to_string(),
                item_price: "18.95".to_string(),
                category: "noodles".to_string(),
            })
            .await
            .unwrap();
        items
            .create(CreateItemRequest {
                item_name: "item2".to_string(),
                item_desc: "dumplings".to_string(),
                item_price: "7.50".to_string(),
                category: "sides".to_string(),
            })
            .await
            .unwrap();

        let in_noodles = service.items_in("noodles").await.unwrap();
        assert_eq!(in_noodles.len(), 1);
        assert_eq!(in_noodles[0].item_name, "item1");

        let err = service.items_in("desserts").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn rename_keeps_the_row_and_its_items() {
        let pool = test_pool().await;
        let service = CategoriesService::new(pool.clone());
        service.create(new_category("noodles")).await.unwrap();
        ItemsService::new(pool)
            .create(CreateItemRequest {
                item_name: "item1".to_string(),
                item_desc: "soup".to_string(),
                item_price: "18.95".to_string(),
                category: "noodles".to_string(),
            })
            .await
            .unwrap();

        let category = service
            .update("noodles", updates(json!({ "categoryName": "ramen" })))
            .await
            .unwrap();
        assert_eq!(category.category_name, "ramen");

        // still one category, and the item followed the rename
        assert_eq!(service.find_all().await.unwrap().len(), 1);
        let items = service.items_in("ramen").await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].category, "ramen");
    }

    #[tokio::test]
    async fn rename_to_existing_name_is_a_conflict() {
        let pool = test_pool().await;
        let service = CategoriesService::new(pool);
        service.create(new_category("noodles")).await.unwrap();
        service.create(new_category("sides")).await.unwrap();

        let err = service
            .update("noodles", updates(json!({ "categoryName": "sides" })))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_of_unknown_category_is_not_found() {
        let pool = test_pool().await;
        let service = CategoriesService::new(pool);

        let err = service
            .update("ghost", updates(json!({ "categoryName": "new" })))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_twice_fails_the_second_time() {
        let pool = test_pool().await;
        let service = CategoriesService::new(pool);
        service.create(new_category("noodles")).await.unwrap();

        service.delete("noodles").await.unwrap();
        let err = service.delete("noodles").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn update_shape_validation() {
        assert!(validate_category_update(&updates(json!({ "categoryName": "ramen" }))).is_ok());
        assert!(validate_category_update(&updates(json!({ "categoryName": "" }))).is_err());
        assert!(validate_category_update(&updates(json!({ "name": "ramen" }))).is_err());
    }
}
