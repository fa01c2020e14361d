use std::sync::Arc;

use uuid::Uuid;

use crate::domain::inventory::{InventoryItem, ItemPatch, ItemStatus, NewItem};
use crate::error::ApiError;
use crate::metrics::Metrics;
use crate::store::{CatalogStore, ItemFilter, OrderStore, PageWindow};

// ============================================================================
// Inventory Management & Public Catalog
// ============================================================================

/// How a delete request was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// No order history referenced the item; it was removed outright.
    Removed,
    /// The item appears in order history and was soft-deleted to
    /// discontinued, preserving the id referenced by order lines.
    Discontinued,
}

#[derive(Clone)]
pub struct InventoryService {
    catalog: Arc<dyn CatalogStore>,
    orders: Arc<dyn OrderStore>,
    metrics: Arc<Metrics>,
}

impl InventoryService {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        orders: Arc<dyn OrderStore>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            catalog,
            orders,
            metrics,
        }
    }

    pub async fn create(&self, new: NewItem) -> Result<InventoryItem, ApiError> {
        new.validate()?;

        if self
            .catalog
            .find_item_by_code(&new.item_code)
            .await?
            .is_some()
        {
            return Err(ApiError::DuplicateItemCode);
        }

        let item = InventoryItem::from_new(new);
        self.catalog.insert_item(item.clone()).await?;
        self.metrics.items_created.inc();
        tracing::info!(item_id = %item.id, item_code = %item.item_code, "inventory item created");
        Ok(item)
    }

    pub async fn get(&self, id: Uuid) -> Result<InventoryItem, ApiError> {
        self.catalog
            .find_item(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))
    }

    pub async fn list(
        &self,
        filter: &ItemFilter,
        window: PageWindow,
    ) -> Result<(Vec<InventoryItem>, usize), ApiError> {
        Ok(self.catalog.list_items(filter, window).await?)
    }

    pub async fn update(&self, id: Uuid, patch: ItemPatch) -> Result<InventoryItem, ApiError> {
        patch.validate()?;

        let mut item = self.get(id).await?;

        // A changed code must stay unique, case-insensitively.
        if let Some(new_code) = &patch.item_code {
            if !new_code.eq_ignore_ascii_case(&item.item_code)
                && self.catalog.find_item_by_code(new_code).await?.is_some()
            {
                return Err(ApiError::DuplicateItemCode);
            }
        }

        item.apply(patch);
        self.catalog.update_item(item.clone()).await?;
        Ok(item)
    }

    pub async fn delete(&self, id: Uuid) -> Result<DeleteOutcome, ApiError> {
        let mut item = self.get(id).await?;

        if self.orders.exists_with_item(id).await? {
            item.apply(ItemPatch {
                status: Some(ItemStatus::Discontinued),
                ..ItemPatch::default()
            });
            self.catalog.update_item(item).await?;
            self.metrics.items_discontinued.inc();
            tracing::info!(item_id = %id, "item has order history, discontinued instead of removed");
            Ok(DeleteOutcome::Discontinued)
        } else {
            self.catalog.delete_item(id).await?;
            tracing::info!(item_id = %id, "item removed");
            Ok(DeleteOutcome::Removed)
        }
    }

    // ------------------------------------------------------------------------
    // Public catalog views: only in-stock items are ever visible.
    // ------------------------------------------------------------------------

    pub async fn list_catalog(
        &self,
        filter: &ItemFilter,
        window: PageWindow,
    ) -> Result<(Vec<InventoryItem>, usize), ApiError> {
        let filter = ItemFilter {
            status: Some(ItemStatus::InStock),
            ..filter.clone()
        };
        Ok(self.catalog.list_items(&filter, window).await?)
    }

    pub async fn get_catalog_item(&self, id: Uuid) -> Result<InventoryItem, ApiError> {
        let item = self.get(id).await?;
        if item.status != ItemStatus::InStock {
            return Err(ApiError::NotFound("Item not found".to_string()));
        }
        Ok(item)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::inventory::{Category, MetalType};
    use crate::domain::order::{NewOrder, OrderLineRequest, ShippingAddress};
    use crate::store::MemoryStore;
    use crate::workflow::orders::OrderService;

    fn services() -> (Arc<MemoryStore>, InventoryService, OrderService) {
        let store = Arc::new(MemoryStore::new());
        let metrics = Arc::new(Metrics::new().unwrap());
        let inventory = InventoryService::new(store.clone(), store.clone(), metrics.clone());
        let orders = OrderService::new(store.clone(), store.clone(), metrics);
        (store, inventory, orders)
    }

    fn new_item(code: &str) -> NewItem {
        NewItem {
            item_code: code.to_string(),
            name: format!("{code} piece"),
            description: "test".to_string(),
            category: Category::Necklace,
            price: 150_000,
            weight: 8.0,
            metal_type: MetalType::Silver,
            stones: None,
            images: vec!["https://img.example/a.jpg".to_string()],
            quantity: 4,
            status: ItemStatus::InStock,
        }
    }

    const WINDOW: PageWindow = PageWindow {
        offset: 0,
        limit: 20,
    };

    #[tokio::test]
    async fn test_duplicate_code_rejected_case_insensitively() {
        let (_, inventory, _) = services();
        inventory.create(new_item("NECK-001")).await.unwrap();

        let err = inventory.create(new_item("neck-001")).await.unwrap_err();
        assert_eq!(err.code(), "DUPLICATE_ITEM_CODE");
    }

    #[tokio::test]
    async fn test_update_checks_code_uniqueness() {
        let (_, inventory, _) = services();
        let first = inventory.create(new_item("NECK-001")).await.unwrap();
        inventory.create(new_item("NECK-002")).await.unwrap();

        let err = inventory
            .update(
                first.id,
                ItemPatch {
                    item_code: Some("neck-002".to_string()),
                    ..ItemPatch::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "DUPLICATE_ITEM_CODE");

        // Re-casing your own code is not a collision.
        let updated = inventory
            .update(
                first.id,
                ItemPatch {
                    item_code: Some("neck-001".to_string()),
                    ..ItemPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.item_code, "neck-001");
    }

    #[tokio::test]
    async fn test_delete_without_history_removes() {
        let (_, inventory, _) = services();
        let item = inventory.create(new_item("NECK-001")).await.unwrap();

        let outcome = inventory.delete(item.id).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Removed);
        assert!(inventory.get(item.id).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_with_history_discontinues() {
        let (_, inventory, orders) = services();
        let item = inventory.create(new_item("NECK-001")).await.unwrap();

        orders
            .place(NewOrder {
                customer_name: "Priya Shah".to_string(),
                customer_email: "priya@example.com".to_string(),
                customer_phone: "04412345678".to_string(),
                items: vec![OrderLineRequest {
                    item_id: item.id,
                    quantity: 1,
                }],
                shipping_address: ShippingAddress {
                    line1: "12 Marine Drive".to_string(),
                    line2: None,
                    city: "Mumbai".to_string(),
                    state: "MH".to_string(),
                    zip: "400001".to_string(),
                    country: "IN".to_string(),
                },
                notes: None,
            })
            .await
            .unwrap();

        let outcome = inventory.delete(item.id).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Discontinued);

        let kept = inventory.get(item.id).await.unwrap();
        assert_eq!(kept.status, ItemStatus::Discontinued);
    }

    #[tokio::test]
    async fn test_catalog_hides_non_stock_items() {
        let (_, inventory, _) = services();
        let visible = inventory.create(new_item("NECK-001")).await.unwrap();
        let hidden = inventory.create(new_item("NECK-002")).await.unwrap();
        inventory
            .update(
                hidden.id,
                ItemPatch {
                    status: Some(ItemStatus::Sold),
                    ..ItemPatch::default()
                },
            )
            .await
            .unwrap();

        let (page, total) = inventory
            .list_catalog(&ItemFilter::default(), WINDOW)
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(page[0].id, visible.id);

        assert!(inventory.get_catalog_item(visible.id).await.is_ok());
        let err = inventory.get_catalog_item(hidden.id).await.unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");
    }
}
