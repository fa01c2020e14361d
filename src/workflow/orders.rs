use std::sync::Arc;

use uuid::Uuid;

use crate::domain::order::{NewOrder, Order, OrderLine, OrderStatusUpdate};
use crate::error::ApiError;
use crate::metrics::Metrics;
use crate::store::{CatalogStore, OrderFilter, OrderStore, PageWindow, StoreError};

// ============================================================================
// Order Placement Workflow
// ============================================================================
//
// Placement runs in two phases:
//
//   1. Validation: every line is checked against the live catalog and a
//      denormalized snapshot (code, name, unit price) is taken. Any failure
//      aborts before anything is touched.
//   2. Reservation: a conditional decrement per line. The store only
//      subtracts when the item is in stock with enough quantity, so a
//      concurrent order can lose the race here even after passing
//      validation. On any failed line, decrements already applied are
//      compensated and the whole order fails.
//
// The order record is written only after every reservation succeeds, so a
// failed placement is never visible and inventory is left exactly as found.
// ============================================================================

#[derive(Clone)]
pub struct OrderService {
    catalog: Arc<dyn CatalogStore>,
    orders: Arc<dyn OrderStore>,
    metrics: Arc<Metrics>,
}

impl OrderService {
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

    pub async fn place(&self, draft: NewOrder) -> Result<Order, ApiError> {
        draft.validate()?;

        match self.try_place(draft).await {
            Ok(order) => {
                self.metrics.orders_placed.inc();
                tracing::info!(
                    order_id = %order.id,
                    lines = order.items.len(),
                    total_amount = order.total_amount,
                    "order placed"
                );
                Ok(order)
            }
            Err(err) => {
                self.metrics.record_order_rejected(err.code());
                Err(err)
            }
        }
    }

    async fn try_place(&self, draft: NewOrder) -> Result<Order, ApiError> {
        // Phase 1: validate every line and snapshot pricing.
        let mut lines = Vec::with_capacity(draft.items.len());
        let mut total_amount: u64 = 0;

        for request in &draft.items {
            let item = self
                .catalog
                .find_item(request.item_id)
                .await?
                .ok_or_else(|| ApiError::NotFound(format!("Item {} not found", request.item_id)))?;

            if item.status != crate::domain::inventory::ItemStatus::InStock {
                return Err(ApiError::ItemNotAvailable(item.item_code));
            }
            if item.quantity < request.quantity {
                return Err(ApiError::InsufficientStock(item.item_code));
            }

            let subtotal = item
                .price
                .checked_mul(u64::from(request.quantity))
                .ok_or_else(|| ApiError::Validation("line subtotal overflows".to_string()))?;
            total_amount = total_amount
                .checked_add(subtotal)
                .ok_or_else(|| ApiError::Validation("order total overflows".to_string()))?;

            lines.push(OrderLine {
                item_id: item.id,
                item_code: item.item_code,
                name: item.name,
                price: item.price,
                quantity: request.quantity,
                subtotal,
            });
        }

        // Phase 2: reserve stock with conditional decrements; compensate on
        // the first failure so inventory nets out untouched.
        let mut reserved: Vec<(Uuid, u32)> = Vec::with_capacity(lines.len());
        for line in &lines {
            match self
                .catalog
                .decrement_quantity(line.item_id, line.quantity)
                .await
            {
                Ok(()) => reserved.push((line.item_id, line.quantity)),
                Err(err) => {
                    self.release(&reserved).await;
                    return Err(match err {
                        StoreError::NotFound => {
                            ApiError::NotFound(format!("Item {} not found", line.item_id))
                        }
                        StoreError::NotInStock => {
                            ApiError::ItemNotAvailable(line.item_code.clone())
                        }
                        StoreError::InsufficientQuantity => {
                            ApiError::InsufficientStock(line.item_code.clone())
                        }
                    });
                }
            }
        }

        let order = Order::from_draft(draft, lines, total_amount);
        self.orders.insert_order(order.clone()).await?;
        Ok(order)
    }

    async fn release(&self, reserved: &[(Uuid, u32)]) {
        for (item_id, quantity) in reserved {
            if let Err(err) = self.catalog.increment_quantity(*item_id, *quantity).await {
                // The item vanished mid-rollback; nothing left to restore.
                tracing::error!(
                    item_id = %item_id,
                    quantity,
                    "failed to release reserved stock: {}",
                    err
                );
            }
        }
    }

    pub async fn get(&self, id: Uuid) -> Result<Order, ApiError> {
        self.orders
            .find_order(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))
    }

    pub async fn list(
        &self,
        filter: &OrderFilter,
        window: PageWindow,
    ) -> Result<(Vec<Order>, usize), ApiError> {
        Ok(self.orders.list_orders(filter, window).await?)
    }

    /// Overwrite the order's status. No transition graph is enforced; any
    /// status may follow any other.
    pub async fn update_status(
        &self,
        id: Uuid,
        update: OrderStatusUpdate,
    ) -> Result<Order, ApiError> {
        match self
            .orders
            .update_status(id, update.status, update.notes)
            .await
        {
            Ok(order) => {
                tracing::info!(order_id = %id, status = ?order.status, "order status updated");
                Ok(order)
            }
            Err(StoreError::NotFound) => Err(ApiError::NotFound("Order not found".to_string())),
            Err(err) => Err(err.into()),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::inventory::{Category, InventoryItem, ItemStatus, MetalType, NewItem};
    use crate::domain::order::{NewOrder, OrderLineRequest, OrderStatus, ShippingAddress};
    use crate::store::MemoryStore;

    fn services() -> (Arc<MemoryStore>, OrderService) {
        let store = Arc::new(MemoryStore::new());
        let metrics = Arc::new(Metrics::new().unwrap());
        let service = OrderService::new(store.clone(), store.clone(), metrics);
        (store, service)
    }

    async fn seed_item(
        store: &MemoryStore,
        code: &str,
        quantity: u32,
        price: u64,
        status: ItemStatus,
    ) -> Uuid {
        let item = InventoryItem::from_new(NewItem {
            item_code: code.to_string(),
            name: format!("{code} piece"),
            description: "test".to_string(),
            category: Category::Ring,
            price,
            weight: 2.0,
            metal_type: MetalType::Gold,
            stones: None,
            images: vec!["https://img.example/a.jpg".to_string()],
            quantity,
            status,
        });
        let id = item.id;
        store.insert_item(item).await.unwrap();
        id
    }

    fn draft(lines: Vec<OrderLineRequest>) -> NewOrder {
        NewOrder {
            customer_name: "Priya Shah".to_string(),
            customer_email: "priya@example.com".to_string(),
            customer_phone: "04412345678".to_string(),
            items: lines,
            shipping_address: ShippingAddress {
                line1: "12 Marine Drive".to_string(),
                line2: None,
                city: "Mumbai".to_string(),
                state: "MH".to_string(),
                zip: "400001".to_string(),
                country: "IN".to_string(),
            },
            notes: None,
        }
    }

    async fn quantity_of(store: &MemoryStore, id: Uuid) -> u32 {
        store.find_item(id).await.unwrap().unwrap().quantity
    }

    #[tokio::test]
    async fn test_placement_decrements_and_totals() {
        let (store, service) = services();
        let id = seed_item(&store, "RING-001", 10, 250_000, ItemStatus::InStock).await;

        let order = service
            .place(draft(vec![OrderLineRequest {
                item_id: id,
                quantity: 2,
            }]))
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total_amount, 500_000);
        assert_eq!(order.items[0].subtotal, 500_000);
        assert_eq!(quantity_of(&store, id).await, 8);

        // The persisted record matches what the caller got.
        let stored = service.get(order.id).await.unwrap();
        assert_eq!(stored.total_amount, 500_000);
    }

    #[tokio::test]
    async fn test_oversubscribed_order_leaves_quantity_unchanged() {
        let (store, service) = services();
        let id = seed_item(&store, "RING-001", 10, 250_000, ItemStatus::InStock).await;

        // Worked example: qty 2 succeeds, then qty 1000 fails at quantity 8.
        service
            .place(draft(vec![OrderLineRequest {
                item_id: id,
                quantity: 2,
            }]))
            .await
            .unwrap();

        let err = service
            .place(draft(vec![OrderLineRequest {
                item_id: id,
                quantity: 1000,
            }]))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "INSUFFICIENT_STOCK");
        assert_eq!(quantity_of(&store, id).await, 8);
    }

    #[tokio::test]
    async fn test_boundary_quantity_plus_one() {
        let (store, service) = services();
        let id = seed_item(&store, "RING-002", 5, 100_000, ItemStatus::InStock).await;

        let err = service
            .place(draft(vec![OrderLineRequest {
                item_id: id,
                quantity: 6,
            }]))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "INSUFFICIENT_STOCK");
        assert_eq!(quantity_of(&store, id).await, 5);

        // Exactly the available quantity drains the item to zero.
        service
            .place(draft(vec![OrderLineRequest {
                item_id: id,
                quantity: 5,
            }]))
            .await
            .unwrap();
        assert_eq!(quantity_of(&store, id).await, 0);
    }

    #[tokio::test]
    async fn test_mixed_valid_and_invalid_lines_all_or_nothing() {
        let (store, service) = services();
        let good = seed_item(&store, "RING-OK", 10, 100_000, ItemStatus::InStock).await;

        let err = service
            .place(draft(vec![
                OrderLineRequest {
                    item_id: good,
                    quantity: 1,
                },
                OrderLineRequest {
                    item_id: Uuid::new_v4(),
                    quantity: 1,
                },
            ]))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");
        assert_eq!(quantity_of(&store, good).await, 10);
    }

    #[tokio::test]
    async fn test_unavailable_item_rejected() {
        let (store, service) = services();
        let id = seed_item(&store, "RING-RSV", 10, 100_000, ItemStatus::Reserved).await;

        let err = service
            .place(draft(vec![OrderLineRequest {
                item_id: id,
                quantity: 1,
            }]))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "ITEM_NOT_AVAILABLE");
        assert_eq!(quantity_of(&store, id).await, 10);
    }

    #[tokio::test]
    async fn test_partial_reservation_is_rolled_back() {
        let (store, service) = services();
        let id = seed_item(&store, "RING-001", 10, 100_000, ItemStatus::InStock).await;

        // Both lines pass validation against the same quantity-10 snapshot,
        // but the second conditional decrement fails (4 < 6) and the first
        // must be compensated.
        let err = service
            .place(draft(vec![
                OrderLineRequest {
                    item_id: id,
                    quantity: 6,
                },
                OrderLineRequest {
                    item_id: id,
                    quantity: 6,
                },
            ]))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "INSUFFICIENT_STOCK");
        assert_eq!(quantity_of(&store, id).await, 10);

        // And no order was persisted.
        let (orders, total) = service
            .list(
                &OrderFilter::default(),
                PageWindow {
                    offset: 0,
                    limit: 10,
                },
            )
            .await
            .unwrap();
        assert_eq!(total, 0);
        assert!(orders.is_empty());
    }

    #[tokio::test]
    async fn test_multi_line_total_is_exact_sum() {
        let (store, service) = services();
        let a = seed_item(&store, "RING-A", 10, 123_456, ItemStatus::InStock).await;
        let b = seed_item(&store, "CHAIN-B", 10, 999_999, ItemStatus::InStock).await;

        let order = service
            .place(draft(vec![
                OrderLineRequest {
                    item_id: a,
                    quantity: 3,
                },
                OrderLineRequest {
                    item_id: b,
                    quantity: 2,
                },
            ]))
            .await
            .unwrap();

        assert_eq!(order.total_amount, 123_456 * 3 + 999_999 * 2);
        assert_eq!(quantity_of(&store, a).await, 7);
        assert_eq!(quantity_of(&store, b).await, 8);
    }

    #[tokio::test]
    async fn test_line_snapshot_survives_catalog_edit() {
        let (store, service) = services();
        let id = seed_item(&store, "RING-001", 10, 250_000, ItemStatus::InStock).await;

        let order = service
            .place(draft(vec![OrderLineRequest {
                item_id: id,
                quantity: 1,
            }]))
            .await
            .unwrap();

        // Reprice the live item; the historical order keeps its snapshot.
        let mut item = store.find_item(id).await.unwrap().unwrap();
        item.price = 1;
        store.update_item(item).await.unwrap();

        let stored = service.get(order.id).await.unwrap();
        assert_eq!(stored.items[0].price, 250_000);
        assert_eq!(stored.total_amount, 250_000);
    }

    #[tokio::test]
    async fn test_status_update() {
        let (store, service) = services();
        let id = seed_item(&store, "RING-001", 10, 250_000, ItemStatus::InStock).await;
        let order = service
            .place(draft(vec![OrderLineRequest {
                item_id: id,
                quantity: 1,
            }]))
            .await
            .unwrap();

        let updated = service
            .update_status(
                order.id,
                OrderStatusUpdate {
                    status: OrderStatus::Shipped,
                    notes: Some("dispatched via courier".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Shipped);
        assert_eq!(updated.notes.as_deref(), Some("dispatched via courier"));

        // No transition graph: delivered back to pending is allowed.
        let updated = service
            .update_status(
                order.id,
                OrderStatusUpdate {
                    status: OrderStatus::Pending,
                    notes: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Pending);

        let err = service
            .update_status(
                Uuid::new_v4(),
                OrderStatusUpdate {
                    status: OrderStatus::Confirmed,
                    notes: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");
    }
}
