//! Cart route handlers.
//!
//! The cart lives in the visitor's session. Mutations redirect back to the
//! page they came from with a flash message.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use voltmart_core::{Price, ProductId};

use crate::api::ApiError;
use crate::error::add_breadcrumb;
use crate::filters;
use crate::middleware::Nav;
use crate::models::{Cart, CartLine, MAX_LINE_QUANTITY};
use crate::services::{CartStore, Flash, flash};
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Debug, Clone)]
pub struct CartLineView {
    pub id: i64,
    pub name: String,
    pub price: String,
    pub line_total: String,
    pub image_url: String,
    pub quantity: u32,
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl CartView {
    #[must_use]
    pub fn new(cart: &Cart, state: &AppState) -> Self {
        Self {
            lines: cart
                .lines()
                .iter()
                .map(|line| CartLineView::new(line, state))
                .collect(),
            subtotal: cart.subtotal().display(),
            item_count: cart.item_count(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl CartLineView {
    fn new(line: &CartLine, state: &AppState) -> Self {
        Self {
            id: line.id.as_i64(),
            name: line.name.clone(),
            price: Price::inr(line.price).display(),
            line_total: Price::inr(line.line_total()).display(),
            image_url: state.image_url(line.image.as_deref()),
            quantity: line.quantity,
        }
    }
}

/// Checkout fields echoed back into the form after a failed attempt.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutDetails {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_email: String,
    #[serde(default)]
    pub customer_address: String,
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    /// Raw field; blank or malformed input counts as 1.
    pub quantity: Option<String>,
    pub return_to: Option<String>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    /// `increment` or `decrement`; otherwise `quantity` is applied.
    pub action: Option<String>,
    pub quantity: Option<String>,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub nav: Nav,
    pub cart: CartView,
    pub details: CheckoutDetails,
    pub error: Option<String>,
}

/// Cart count badge fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Parse a quantity field into `1..=MAX_LINE_QUANTITY`.
///
/// Anything that is not a number counts as 1; oversized numbers are capped.
fn parse_quantity(raw: Option<&str>) -> u32 {
    let Some(digits) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return 1;
    };
    match digits.parse::<u64>() {
        Ok(n) => u32::try_from(n).unwrap_or(MAX_LINE_QUANTITY).clamp(1, MAX_LINE_QUANTITY),
        Err(_) if digits.bytes().all(|b| b.is_ascii_digit()) => MAX_LINE_QUANTITY,
        Err(_) => 1,
    }
}

/// Only same-site paths are valid redirect targets.
fn safe_return_path(raw: Option<&str>, fallback: &str) -> String {
    match raw {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path.to_string(),
        _ => fallback.to_string(),
    }
}

/// Render the cart page.
pub fn render_cart(
    state: &AppState,
    nav: Nav,
    cart: &Cart,
    details: CheckoutDetails,
    error: Option<String>,
) -> Response {
    CartShowTemplate {
        nav,
        cart: CartView::new(cart, state),
        details,
        error,
    }
    .into_response()
}

/// Display cart page.
#[instrument(skip(state, session, nav))]
pub async fn show(State(state): State<AppState>, session: Session, nav: Nav) -> Response {
    let cart = match CartStore::new(&session).load().await {
        Ok(cart) => cart,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load cart");
            Cart::default()
        }
    };

    render_cart(&state, nav, &cart, CheckoutDetails::default(), None)
}

/// Add a product to the cart.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let fallback = format!("/product/{}", form.product_id);
    let return_to = safe_return_path(form.return_to.as_deref(), &fallback);

    let product = match state.api().get_product(form.product_id).await {
        Ok(product) => product,
        Err(e) => {
            if !matches!(e, ApiError::NotFound(_)) {
                tracing::error!(product_id = %form.product_id, error = %e, "Failed to fetch product for cart");
            }
            flash::set(&session, Flash::error("Could not add this product to the cart.")).await;
            return Redirect::to(&return_to).into_response();
        }
    };

    let quantity = parse_quantity(form.quantity.as_deref());
    match CartStore::new(&session)
        .modify(|cart| cart.add(&product, quantity))
        .await
    {
        Ok(outcome) => {
            let product_id = product.id.to_string();
            add_breadcrumb(
                "cart",
                "Added to cart",
                Some(&[("product_id", product_id.as_str())]),
            );
            flash::set(&session, Flash::success(outcome.message())).await;
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to save cart");
            flash::set(&session, Flash::error("Could not update the cart.")).await;
        }
    }

    Redirect::to(&return_to).into_response()
}

/// Change a line's quantity.
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Response {
    let result = CartStore::new(&session)
        .modify(|cart| match form.action.as_deref() {
            Some("increment") => cart.increment(form.product_id),
            Some("decrement") => cart.decrement(form.product_id),
            _ => cart.update(form.product_id, parse_quantity(form.quantity.as_deref())),
        })
        .await;

    if let Err(e) = result {
        tracing::error!(error = %e, "Failed to update cart");
        flash::set(&session, Flash::error("Could not update the cart.")).await;
    }

    Redirect::to("/cart").into_response()
}

/// Remove a line from the cart.
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Response {
    if let Err(e) = CartStore::new(&session)
        .modify(|cart| cart.remove(form.product_id))
        .await
    {
        tracing::error!(error = %e, "Failed to remove from cart");
        flash::set(&session, Flash::error("Could not update the cart.")).await;
    }

    Redirect::to("/cart").into_response()
}

/// Get cart count badge.
#[instrument(skip(session))]
pub async fn count(session: Session) -> crate::error::Result<CartCountTemplate> {
    let count = CartStore::new(&session).load().await?.item_count();
    Ok(CartCountTemplate { count })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity(Some("3")), 3);
        assert_eq!(parse_quantity(Some(" 2 ")), 2);
        assert_eq!(parse_quantity(Some("0")), 1);
        assert_eq!(parse_quantity(Some("-4")), 1);
        assert_eq!(parse_quantity(Some("")), 1);
        assert_eq!(parse_quantity(None), 1);
        assert_eq!(parse_quantity(Some("4294967295")), MAX_LINE_QUANTITY);
        assert_eq!(parse_quantity(Some("99999999999999999999999")), MAX_LINE_QUANTITY);
        assert_eq!(parse_quantity(Some("1000")), MAX_LINE_QUANTITY);
    }

    #[test]
    fn test_safe_return_path() {
        assert_eq!(safe_return_path(Some("/search?q=pix"), "/"), "/search?q=pix");
        assert_eq!(safe_return_path(Some("//evil.example"), "/"), "/");
        assert_eq!(safe_return_path(Some("https://evil.example"), "/"), "/");
        assert_eq!(safe_return_path(None, "/product/3"), "/product/3");
    }
}
