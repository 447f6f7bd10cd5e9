//! Request and response bodies for the shop backend.

use serde::{Deserialize, Serialize};

use mobile_shop_core::{CartLine, OrderId, Price, ProductId, User};

/// One ordered product. The backend prices orders itself, so only the id
/// and quantity are sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: ProductId,
    pub quantity: u32,
}

impl From<&CartLine> for OrderItem {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id,
            quantity: line.quantity,
        }
    }
}

/// Body of `POST /api/orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub items: Vec<OrderItem>,
    pub customer_name: String,
    pub customer_email: String,
}

impl OrderRequest {
    /// Build an order from cart lines and the customer placing it.
    #[must_use]
    pub fn new(lines: &[CartLine], customer: &User) -> Self {
        Self {
            items: lines.iter().map(OrderItem::from).collect(),
            customer_name: customer.full_name(),
            customer_email: customer.email.clone(),
        }
    }
}

/// Successful response of `POST /api/orders`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderReceipt {
    pub order_id: OrderId,
    #[serde(default)]
    pub order_number: Option<String>,
    /// Backend-computed total; authoritative when present.
    #[serde(default)]
    pub total_amount: Option<Price>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Successful response of `POST /api/auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}
