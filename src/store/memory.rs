use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::inventory::{InventoryItem, ItemStatus};
use crate::domain::order::{Order, OrderStatus};
use crate::domain::status::StatusCheck;
use crate::domain::user::UserRecord;

use super::{
    CatalogStore, ItemFilter, OrderFilter, OrderStore, PageWindow, StatusCheckStore, StoreError,
    UserStore,
};

// ============================================================================
// In-Process Document Store
// ============================================================================
//
// One RwLock-guarded map per collection. Each trait call takes the guard
// once, which gives the same per-document atomicity a real document store
// provides; there are deliberately no cross-collection locks.
// ============================================================================

#[derive(Default)]
pub struct MemoryStore {
    items: RwLock<HashMap<Uuid, InventoryItem>>,
    orders: RwLock<HashMap<Uuid, Order>>,
    users: RwLock<HashMap<Uuid, UserRecord>>,
    checks: RwLock<Vec<StatusCheck>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_search(item: &InventoryItem, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    item.item_code.to_lowercase().contains(&needle)
        || item.name.to_lowercase().contains(&needle)
        || item.description.to_lowercase().contains(&needle)
}

fn matches_item_filter(item: &InventoryItem, filter: &ItemFilter) -> bool {
    if let Some(category) = filter.category {
        if item.category != category {
            return false;
        }
    }
    if let Some(status) = filter.status {
        if item.status != status {
            return false;
        }
    }
    if let Some(metal_type) = filter.metal_type {
        if item.metal_type != metal_type {
            return false;
        }
    }
    if let Some(min_price) = filter.min_price {
        if item.price < min_price {
            return false;
        }
    }
    if let Some(max_price) = filter.max_price {
        if item.price > max_price {
            return false;
        }
    }
    if let Some(search) = &filter.search {
        if !matches_search(item, search) {
            return false;
        }
    }
    true
}

fn matches_order_filter(order: &Order, filter: &OrderFilter) -> bool {
    if let Some(status) = filter.status {
        if order.status != status {
            return false;
        }
    }
    if let Some(from) = filter.from {
        if order.created_at < from {
            return false;
        }
    }
    if let Some(to) = filter.to {
        if order.created_at > to {
            return false;
        }
    }
    true
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn insert_item(&self, item: InventoryItem) -> Result<(), StoreError> {
        self.items.write().await.insert(item.id, item);
        Ok(())
    }

    async fn find_item(&self, id: Uuid) -> Result<Option<InventoryItem>, StoreError> {
        Ok(self.items.read().await.get(&id).cloned())
    }

    async fn find_item_by_code(&self, code: &str) -> Result<Option<InventoryItem>, StoreError> {
        let items = self.items.read().await;
        Ok(items
            .values()
            .find(|item| item.item_code.eq_ignore_ascii_case(code))
            .cloned())
    }

    async fn list_items(
        &self,
        filter: &ItemFilter,
        window: PageWindow,
    ) -> Result<(Vec<InventoryItem>, usize), StoreError> {
        let items = self.items.read().await;
        let mut matching: Vec<InventoryItem> = items
            .values()
            .filter(|item| matches_item_filter(item, filter))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = matching.len();
        let page = matching
            .into_iter()
            .skip(window.offset)
            .take(window.limit)
            .collect();
        Ok((page, total))
    }

    async fn update_item(&self, item: InventoryItem) -> Result<(), StoreError> {
        let mut items = self.items.write().await;
        if !items.contains_key(&item.id) {
            return Err(StoreError::NotFound);
        }
        items.insert(item.id, item);
        Ok(())
    }

    async fn delete_item(&self, id: Uuid) -> Result<(), StoreError> {
        match self.items.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound),
        }
    }

    async fn decrement_quantity(&self, id: Uuid, amount: u32) -> Result<(), StoreError> {
        let mut items = self.items.write().await;
        let item = items.get_mut(&id).ok_or(StoreError::NotFound)?;
        if item.status != ItemStatus::InStock {
            return Err(StoreError::NotInStock);
        }
        if item.quantity < amount {
            return Err(StoreError::InsufficientQuantity);
        }
        item.quantity -= amount;
        item.updated_at = Utc::now();
        Ok(())
    }

    async fn increment_quantity(&self, id: Uuid, amount: u32) -> Result<(), StoreError> {
        let mut items = self.items.write().await;
        let item = items.get_mut(&id).ok_or(StoreError::NotFound)?;
        item.quantity += amount;
        item.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn insert_order(&self, order: Order) -> Result<(), StoreError> {
        self.orders.write().await.insert(order.id, order);
        Ok(())
    }

    async fn find_order(&self, id: Uuid) -> Result<Option<Order>, StoreError> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn list_orders(
        &self,
        filter: &OrderFilter,
        window: PageWindow,
    ) -> Result<(Vec<Order>, usize), StoreError> {
        let orders = self.orders.read().await;
        let mut matching: Vec<Order> = orders
            .values()
            .filter(|order| matches_order_filter(order, filter))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = matching.len();
        let page = matching
            .into_iter()
            .skip(window.offset)
            .take(window.limit)
            .collect();
        Ok((page, total))
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: OrderStatus,
        notes: Option<String>,
    ) -> Result<Order, StoreError> {
        let mut orders = self.orders.write().await;
        let order = orders.get_mut(&id).ok_or(StoreError::NotFound)?;
        order.status = status;
        if let Some(notes) = notes {
            order.notes = Some(notes);
        }
        order.updated_at = Utc::now();
        Ok(order.clone())
    }

    async fn exists_with_item(&self, item_id: Uuid) -> Result<bool, StoreError> {
        let orders = self.orders.read().await;
        Ok(orders
            .values()
            .any(|order| order.items.iter().any(|line| line.item_id == item_id)))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, record: UserRecord) -> Result<(), StoreError> {
        self.users.write().await.insert(record.user.id, record);
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|record| record.user.email == email)
            .cloned())
    }

    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserRecord>, StoreError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|record| record.user.username == username)
            .cloned())
    }

    async fn count_users(&self) -> Result<usize, StoreError> {
        Ok(self.users.read().await.len())
    }
}

#[async_trait]
impl StatusCheckStore for MemoryStore {
    async fn insert_check(&self, check: StatusCheck) -> Result<(), StoreError> {
        self.checks.write().await.push(check);
        Ok(())
    }

    async fn list_checks(&self, limit: usize) -> Result<Vec<StatusCheck>, StoreError> {
        let checks = self.checks.read().await;
        Ok(checks.iter().take(limit).cloned().collect())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
