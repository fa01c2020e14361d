use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::inventory::{Category, InventoryItem, ItemStatus, MetalType};
use crate::domain::order::{Order, OrderStatus};
use crate::domain::status::StatusCheck;
use crate::domain::user::UserRecord;

mod memory;

pub use memory::MemoryStore;

// ============================================================================
// Store Contracts
// ============================================================================
//
// One trait per collection, mirroring a document store: every call is
// individually atomic, and nothing here spans documents. The conditional
// `decrement_quantity` is the single-writer point the order workflow builds
// its all-or-nothing guarantee on.
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("document not found")]
    NotFound,

    #[error("item is not available for sale")]
    NotInStock,

    #[error("insufficient quantity on hand")]
    InsufficientQuantity,
}

/// 1-based page window, already clamped by the HTTP layer.
#[derive(Debug, Clone, Copy)]
pub struct PageWindow {
    pub offset: usize,
    pub limit: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    pub category: Option<Category>,
    pub status: Option<ItemStatus>,
    pub metal_type: Option<MetalType>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    /// Case-insensitive substring match over item_code, name and description.
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn insert_item(&self, item: InventoryItem) -> Result<(), StoreError>;

    async fn find_item(&self, id: Uuid) -> Result<Option<InventoryItem>, StoreError>;

    /// Case-insensitive lookup by human item code.
    async fn find_item_by_code(&self, code: &str) -> Result<Option<InventoryItem>, StoreError>;

    /// Newest-first listing with the total count of matching documents.
    async fn list_items(
        &self,
        filter: &ItemFilter,
        window: PageWindow,
    ) -> Result<(Vec<InventoryItem>, usize), StoreError>;

    /// Full-document replace. `NotFound` if the item no longer exists.
    async fn update_item(&self, item: InventoryItem) -> Result<(), StoreError>;

    async fn delete_item(&self, id: Uuid) -> Result<(), StoreError>;

    /// Conditional decrement: only succeeds when the item is in stock and
    /// holds at least `amount`. Check and subtract happen under one write
    /// guard, so concurrent orders can never drive quantity negative.
    async fn decrement_quantity(&self, id: Uuid, amount: u32) -> Result<(), StoreError>;

    /// Compensating increment used to roll back a partially reserved order.
    async fn increment_quantity(&self, id: Uuid, amount: u32) -> Result<(), StoreError>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn insert_order(&self, order: Order) -> Result<(), StoreError>;

    async fn find_order(&self, id: Uuid) -> Result<Option<Order>, StoreError>;

    async fn list_orders(
        &self,
        filter: &OrderFilter,
        window: PageWindow,
    ) -> Result<(Vec<Order>, usize), StoreError>;

    /// Overwrite status (+ optional notes) and bump updated_at, returning
    /// the updated document.
    async fn update_status(
        &self,
        id: Uuid,
        status: OrderStatus,
        notes: Option<String>,
    ) -> Result<Order, StoreError>;

    /// Whether any order's line history references this item. Drives the
    /// soft-delete rule for discontinuation.
    async fn exists_with_item(&self, item_id: Uuid) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert_user(&self, record: UserRecord) -> Result<(), StoreError>;

    async fn find_user(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    async fn find_user_by_username(&self, username: &str)
        -> Result<Option<UserRecord>, StoreError>;

    async fn count_users(&self) -> Result<usize, StoreError>;
}

#[async_trait]
pub trait StatusCheckStore: Send + Sync {
    async fn insert_check(&self, check: StatusCheck) -> Result<(), StoreError>;

    async fn list_checks(&self, limit: usize) -> Result<Vec<StatusCheck>, StoreError>;
}
