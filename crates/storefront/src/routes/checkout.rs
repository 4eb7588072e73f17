//! Checkout route handler.
//!
//! Validates the buyer's details, submits the cart as an order and clears
//! the cart once the API confirms it.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use voltmart_core::{Email, OrderId};

use crate::api::{ApiError, NewOrder};
use crate::error::add_breadcrumb;
use crate::filters;
use crate::middleware::Nav;
use crate::models::Cart;
use crate::routes::cart::{CheckoutDetails, render_cart};
use crate::services::CartStore;
use crate::state::AppState;

const EMPTY_CART: &str = "Your cart is empty!";
const MISSING_FIELDS: &str = "Please fill in all required fields.";
const INVALID_EMAIL: &str = "Please enter a valid email address.";
const ORDER_FAILED: &str = "Error placing order. Please try again.";

/// Order confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/success.html")]
pub struct CheckoutSuccessTemplate {
    pub nav: Nav,
    pub order_id: Option<OrderId>,
    pub customer_email: String,
}

/// Check the cart and buyer details, producing the order to submit.
///
/// # Errors
///
/// Returns the message to show above the checkout form.
pub fn build_order(cart: &Cart, details: &CheckoutDetails) -> Result<NewOrder, &'static str> {
    if cart.is_empty() {
        return Err(EMPTY_CART);
    }

    let name = details.customer_name.trim();
    let email = details.customer_email.trim();
    let address = details.customer_address.trim();
    if name.is_empty() || email.is_empty() || address.is_empty() {
        return Err(MISSING_FIELDS);
    }

    let email = Email::parse(email).map_err(|_| INVALID_EMAIL)?;

    Ok(NewOrder {
        items: cart.order_lines(),
        customer_email: email.into_inner(),
        customer_name: name.to_string(),
        customer_address: address.to_string(),
    })
}

/// Message for a failed order submission.
fn order_failure_message(err: &ApiError) -> String {
    match err {
        ApiError::Status { status, .. } if *status < 500 => err
            .server_message()
            .map_or_else(|| ORDER_FAILED.to_string(), String::from),
        _ => ORDER_FAILED.to_string(),
    }
}

/// Place the order for the current cart.
#[instrument(skip(state, session, nav, details))]
pub async fn place_order(
    State(state): State<AppState>,
    session: Session,
    mut nav: Nav,
    Form(details): Form<CheckoutDetails>,
) -> Response {
    let store = CartStore::new(&session);
    let cart = match store.load().await {
        Ok(cart) => cart,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load cart for checkout");
            Cart::default()
        }
    };

    let order = match build_order(&cart, &details) {
        Ok(order) => order,
        Err(message) => {
            return render_cart(&state, nav, &cart, details, Some(message.to_string()));
        }
    };

    match state.api().create_order(&order).await {
        Ok(confirmation) => {
            let mut emptied = cart;
            emptied.clear();
            if let Err(e) = store.save(&emptied).await {
                tracing::error!(error = %e, "Failed to clear cart after order");
            }

            let order_id = confirmation
                .order_id
                .map_or_else(|| "unknown".to_string(), |id| id.to_string());
            add_breadcrumb(
                "checkout",
                "Order placed",
                Some(&[("order_id", order_id.as_str())]),
            );
            tracing::info!(order_id = %order_id, "Order placed");

            nav.cart_count = 0;
            CheckoutSuccessTemplate {
                nav,
                order_id: confirmation.order_id,
                customer_email: confirmation
                    .customer_email
                    .unwrap_or(order.customer_email),
            }
            .into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Order submission failed");
            let message = order_failure_message(&e);
            render_cart(&state, nav, &cart, details, Some(message))
        }
    }
}
