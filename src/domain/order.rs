use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

// ============================================================================
// Order Value Objects
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

/// COD is the sole supported payment method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cod,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

/// Denormalized snapshot of an item at order time. Later catalog edits never
/// retroactively alter historical orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub item_id: Uuid,
    pub item_code: String,
    pub name: String,
    pub price: u64,
    pub quantity: u32,
    pub subtotal: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub items: Vec<OrderLine>,
    pub total_amount: u64,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub shipping_address: ShippingAddress,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Assemble a pending order from validated lines.
    pub fn from_draft(draft: NewOrder, items: Vec<OrderLine>, total_amount: u64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            customer_name: draft.customer_name,
            customer_email: draft.customer_email,
            customer_phone: draft.customer_phone,
            items,
            total_amount,
            status: OrderStatus::Pending,
            payment_method: PaymentMethod::Cod,
            shipping_address: draft.shipping_address,
            notes: draft.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

// ============================================================================
// Order Placement Payloads
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct OrderLineRequest {
    pub item_id: Uuid,
    pub quantity: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewOrder {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub items: Vec<OrderLineRequest>,
    pub shipping_address: ShippingAddress,
    pub notes: Option<String>,
}

impl NewOrder {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.items.is_empty() || self.items.len() > 50 {
            return Err(ApiError::Validation(
                "an order must contain between 1 and 50 lines".to_string(),
            ));
        }
        if self.items.iter().any(|line| line.quantity == 0) {
            return Err(ApiError::Validation(
                "line quantity must be positive".to_string(),
            ));
        }
        if !self.customer_email.contains('@') {
            return Err(ApiError::Validation("invalid email address".to_string()));
        }
        if self.customer_phone.len() < 10 || self.customer_phone.len() > 15 {
            return Err(ApiError::Validation(
                "phone number must be 10-15 characters".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
    pub notes: Option<String>,
}

// ============================================================================
// Unit Tests
// ============================================================================
