//! Wire types for the catalog/order REST API.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use voltmart_core::{
    Category, OrderId, OrderStatus, PaymentStatus, Price, ProductId, SessionToken, UserId,
    UserRole,
};

// =============================================================================
// Catalog
// =============================================================================

/// A product as served by `GET /api/products/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: String,
    /// Absolute URL or a path relative to the media root.
    #[serde(default)]
    pub image: Option<String>,
}

impl Product {
    /// Price in the shop currency.
    #[must_use]
    pub const fn price(&self) -> Price {
        Price::inr(self.price)
    }
}

/// Body for `POST /api/admin/products/add/`.
#[derive(Debug, Clone, Serialize)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub category: Category,
    pub image: String,
    pub description: String,
}

/// Partial body for `PUT /api/admin/products/update/{id}/`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

// =============================================================================
// Accounts
// =============================================================================

/// Body for `POST /api/auth/login/`.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    /// Username or email.
    pub identifier: &'a str,
    pub password: &'a str,
}

/// Account details returned by the login and register endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiUser {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
}

/// Response of `POST /api/auth/login/`.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: SessionToken,
    pub user: ApiUser,
}

/// Body for `POST /api/auth/register/`.
#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Response of `POST /api/auth/register/`.
#[derive(Debug, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub user: ApiUser,
}

/// Body for `POST /api/admin/login/`.
#[derive(Debug, Serialize)]
pub struct AdminLoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Response of `POST /api/admin/login/`.
#[derive(Debug, Deserialize)]
pub struct AdminLoginResponse {
    pub token: SessionToken,
}

// =============================================================================
// Orders
// =============================================================================

/// One cart line as submitted with an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLineInput {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
}

/// Body for `POST /api/orders/create/`.
#[derive(Debug, Clone, Serialize)]
pub struct NewOrder {
    pub items: Vec<OrderLineInput>,
    pub customer_email: String,
    pub customer_name: String,
    pub customer_address: String,
}

/// Response of `POST /api/orders/create/` (HTTP 201).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderConfirmation {
    #[serde(default)]
    pub order_id: Option<OrderId>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
}

/// An order as listed by `GET /api/admin/orders/`.
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub customer_address: Option<String>,
    pub total_price: Decimal,
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// A line of a placed order.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItem {
    pub product_name: String,
    pub quantity: u32,
    pub price: Decimal,
}

/// `GET /api/admin/orders/` answers either a bare list or a wrapper object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum OrderList {
    Bare(Vec<Order>),
    Wrapped {
        #[serde(default)]
        orders: Vec<Order>,
    },
}

impl From<OrderList> for Vec<Order> {
    fn from(list: OrderList) -> Self {
        match list {
            OrderList::Bare(orders) | OrderList::Wrapped { orders } => orders,
        }
    }
}

/// Body for `PUT /api/admin/orders/update/{id}/`.
#[derive(Debug, Clone, Serialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}
