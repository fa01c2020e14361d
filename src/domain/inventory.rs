use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

// ============================================================================
// Inventory Value Objects
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Ring,
    Necklace,
    Bracelet,
    Earring,
    Pendant,
    Bangle,
    Chain,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetalType {
    Gold,
    Silver,
    Platinum,
    WhiteGold,
    RoseGold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    InStock,
    Sold,
    Reserved,
    Discontinued,
}

// ============================================================================
// Inventory Item
// ============================================================================
//
// `price` is in minor currency units (integer cents); `quantity` is unsigned
// so the never-negative invariant holds by construction.
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: Uuid,
    pub item_code: String,
    pub name: String,
    pub description: String,
    pub category: Category,
    pub price: u64,
    pub weight: f64,
    pub metal_type: MetalType,
    pub stones: Option<String>,
    pub images: Vec<String>,
    pub quantity: u32,
    pub status: ItemStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    pub fn from_new(new: NewItem) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            item_code: new.item_code,
            name: new.name,
            description: new.description,
            category: new.category,
            price: new.price,
            weight: new.weight,
            metal_type: new.metal_type,
            stones: new.stones,
            images: new.images,
            quantity: new.quantity,
            status: new.status,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update, bumping `updated_at`. Uniqueness of a changed
    /// item code is the caller's concern.
    pub fn apply(&mut self, patch: ItemPatch) {
        if let Some(item_code) = patch.item_code {
            self.item_code = item_code;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(weight) = patch.weight {
            self.weight = weight;
        }
        if let Some(metal_type) = patch.metal_type {
            self.metal_type = metal_type;
        }
        if let Some(stones) = patch.stones {
            self.stones = Some(stones);
        }
        if let Some(images) = patch.images {
            self.images = images;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewItem {
    pub item_code: String,
    pub name: String,
    pub description: String,
    pub category: Category,
    pub price: u64,
    pub weight: f64,
    pub metal_type: MetalType,
    pub stones: Option<String>,
    pub images: Vec<String>,
    pub quantity: u32,
    pub status: ItemStatus,
}

impl NewItem {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_item_code(&self.item_code)?;
        validate_images(&self.images)?;
        if self.name.is_empty() {
            return Err(ApiError::Validation("name must not be empty".to_string()));
        }
        if self.weight <= 0.0 {
            return Err(ApiError::Validation("weight must be positive".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemPatch {
    pub item_code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub price: Option<u64>,
    pub weight: Option<f64>,
    pub metal_type: Option<MetalType>,
    pub stones: Option<String>,
    pub images: Option<Vec<String>>,
    pub quantity: Option<u32>,
    pub status: Option<ItemStatus>,
}

impl ItemPatch {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(item_code) = &self.item_code {
            validate_item_code(item_code)?;
        }
        if let Some(images) = &self.images {
            validate_images(images)?;
        }
        if let Some(name) = &self.name {
            if name.is_empty() {
                return Err(ApiError::Validation("name must not be empty".to_string()));
            }
        }
        if let Some(weight) = self.weight {
            if weight <= 0.0 {
                return Err(ApiError::Validation("weight must be positive".to_string()));
            }
        }
        Ok(())
    }
}

fn validate_item_code(code: &str) -> Result<(), ApiError> {
    if code.len() < 3 || code.len() > 50 {
        return Err(ApiError::Validation(
            "item_code must be 3-50 characters".to_string(),
        ));
    }
    Ok(())
}

fn validate_images(images: &[String]) -> Result<(), ApiError> {
    if images.is_empty() || images.len() > 10 {
        return Err(ApiError::Validation(
            "between 1 and 10 images are required".to_string(),
        ));
    }
    Ok(())
}

// ============================================================================
// Unit Tests
// ============================================================================
