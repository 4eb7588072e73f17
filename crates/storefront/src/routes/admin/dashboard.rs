//! Admin dashboard: product and order tables.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use voltmart_core::{Category, OrderStatus, Price};

use crate::api::{ApiError, Order, Product};
use crate::filters;
use crate::middleware::{Nav, RequireAdmin};
use crate::routes::admin::expire_admin_session;
use crate::state::AppState;

/// An `<option>` of a select box.
#[derive(Debug, Clone)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Category choices, with the product's own category selected.
#[must_use]
pub fn category_options(current: &str) -> Vec<SelectOption> {
    Category::ALL
        .iter()
        .map(|c| SelectOption {
            value: c.slug(),
            label: c.label(),
            selected: current.parse::<Category>() == Ok(*c),
        })
        .collect()
}

/// Status choices for an order.
///
/// Only the admin-selectable statuses are offered; an order currently in
/// another status shows it first so the select reflects reality.
#[must_use]
pub fn status_options(current: OrderStatus) -> Vec<SelectOption> {
    let mut options = Vec::with_capacity(OrderStatus::ADMIN_SELECTABLE.len() + 1);
    if !current.is_admin_selectable() {
        options.push(SelectOption {
            value: current.as_str(),
            label: current.as_str(),
            selected: true,
        });
    }
    options.extend(OrderStatus::ADMIN_SELECTABLE.iter().map(|s| SelectOption {
        value: s.as_str(),
        label: s.as_str(),
        selected: *s == current,
    }));
    options
}

/// Editable product row.
#[derive(Debug, Clone)]
pub struct AdminProductRow {
    pub id: i64,
    pub name: String,
    /// Plain decimal for the price input.
    pub price: String,
    pub categories: Vec<SelectOption>,
}

impl From<&Product> for AdminProductRow {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i64(),
            name: product.name.clone(),
            price: product.price.to_string(),
            categories: category_options(&product.category),
        }
    }
}

/// Order row.
#[derive(Debug, Clone)]
pub struct AdminOrderRow {
    pub id: i64,
    pub customer: String,
    pub email: String,
    pub address: String,
    pub items: Vec<String>,
    pub total: String,
    pub payment_status: String,
    pub statuses: Vec<SelectOption>,
    pub placed_at: String,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

impl From<&Order> for AdminOrderRow {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.as_i64(),
            customer: non_blank(order.customer_name.as_deref())
                .unwrap_or("Guest")
                .to_string(),
            email: non_blank(order.customer_email.as_deref())
                .unwrap_or("-")
                .to_string(),
            address: non_blank(order.customer_address.as_deref())
                .unwrap_or("Not provided")
                .to_string(),
            items: order
                .items
                .iter()
                .map(|item| {
                    format!(
                        "{} (x{}) - {}",
                        item.product_name,
                        item.quantity,
                        Price::inr(item.price).display()
                    )
                })
                .collect(),
            total: Price::inr(order.total_price).display(),
            payment_status: order.payment_status.to_string(),
            statuses: status_options(order.status),
            placed_at: order.created_at.format("%d %b %Y, %H:%M").to_string(),
        }
    }
}

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub nav: Nav,
    pub products: Vec<AdminProductRow>,
    pub products_error: Option<String>,
    pub orders: Vec<AdminOrderRow>,
    pub orders_error: Option<String>,
    pub categories: Vec<SelectOption>,
}

/// Display the admin dashboard.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    RequireAdmin(admin): RequireAdmin,
    nav: Nav,
) -> Response {
    let (products, orders) = tokio::join!(
        state.api().list_products(),
        state.api().list_orders(&admin.token)
    );

    let (products, products_error) = match products {
        Ok(products) => (products.iter().map(AdminProductRow::from).collect(), None),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch products for dashboard");
            (
                Vec::new(),
                Some("Failed to fetch products. Please try again.".to_string()),
            )
        }
    };

    let (orders, orders_error) = match orders {
        Ok(orders) => (orders.iter().map(AdminOrderRow::from).collect(), None),
        Err(ApiError::Unauthorized(_)) => return expire_admin_session(&session).await,
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch orders for dashboard");
            (
                Vec::new(),
                Some("Failed to fetch orders. Please try again.".to_string()),
            )
        }
    };

    DashboardTemplate {
        nav,
        products,
        products_error,
        orders,
        orders_error,
        categories: category_options(""),
    }
    .into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn order_json(extra: &str) -> Order {
        let json = format!(
            r#"{{
                "id": 41,
                "total_price": "2598.00",
                "status": "Shipped",
                "payment_status": "Completed",
                "created_at": "2025-03-09T14:05:00Z"
                {extra}
            }}"#
        );
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_order_row_guest_defaults() {
        let row = AdminOrderRow::from(&order_json(""));
        assert_eq!(row.customer, "Guest");
        assert_eq!(row.address, "Not provided");
        assert_eq!(row.total, "₹2,598.00");
        assert_eq!(row.placed_at, "09 Mar 2025, 14:05");
    }

    #[test]
    fn test_order_row_items() {
        let row = AdminOrderRow::from(&order_json(
            r#", "customer_name": "Ravi", "items": [
                {"product_name": "Charger", "quantity": 2, "price": "1299.00"}
            ]"#,
        ));
        assert_eq!(row.customer, "Ravi");
        assert_eq!(row.items, vec!["Charger (x2) - ₹1,299.00"]);
    }

    #[test]
    fn test_status_options_select_current() {
        let options = status_options(OrderStatus::Shipped);
        let values: Vec<&str> = options.iter().map(|o| o.value).collect();
        assert_eq!(values, vec!["Pending", "Shipped", "Delivered"]);
        assert!(options[1].selected);
    }

    #[test]
    fn test_status_options_keep_unselectable_current() {
        let options = status_options(OrderStatus::Cancelled);
        assert_eq!(options[0].value, "Cancelled");
        assert!(options[0].selected);
        assert_eq!(options.len(), 4);
    }

    #[test]
    fn test_category_options() {
        let options = category_options("laptop");
        assert_eq!(options.len(), 4);
        assert!(options.iter().any(|o| o.value == "laptop" && o.selected));
        assert!(category_options("").iter().all(|o| !o.selected));
    }
}
