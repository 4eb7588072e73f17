//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Home page (products grouped by category)
//! GET  /category/{category}       - Category listing
//! GET  /search?q=                 - Search by product name
//! GET  /product/{id}              - Product detail
//!
//! # Cart
//! GET  /cart                      - Cart page with checkout form
//! POST /cart/add                  - Add to cart
//! POST /cart/update               - Set, increment or decrement a quantity
//! POST /cart/remove               - Remove a line
//! GET  /cart/count                - Cart count badge (fragment)
//! POST /checkout                  - Place the order
//!
//! # Auth (POSTs rate limited)
//! GET  /signin                    - Sign-in page
//! POST /signin                    - Sign-in action
//! GET  /signup                    - Sign-up page
//! POST /signup                    - Sign-up action
//! POST /logout                    - Sign out customer and admin
//!
//! # Admin
//! GET  /admin/login               - Admin login page
//! POST /admin/login               - Admin login action (rate limited)
//! GET  /admin                     - Dashboard (requires admin)
//! POST /admin/products            - Add product
//! POST /admin/products/{id}       - Update product
//! POST /admin/products/{id}/delete - Delete product
//! POST /admin/orders/{id}/status  - Update order status
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod home;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::rate_limit::RateLimiterLayer;
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the admin routes router.
pub fn admin_routes(limiter: RateLimiterLayer) -> Router<AppState> {
    Router::new()
        .route("/", get(admin::dashboard::show))
        .route(
            "/login",
            get(admin::auth::login_page).merge(post(admin::auth::login).layer(limiter)),
        )
        .route("/products", post(admin::products::create))
        .route("/products/{id}", post(admin::products::update))
        .route("/products/{id}/delete", post(admin::products::delete))
        .route("/orders/{id}/status", post(admin::orders::update_status))
}

/// Create all routes for the storefront.
///
/// `limiter` guards the credential endpoints; one limiter is shared so a
/// client's budget spans sign-in, sign-up and admin login.
pub fn routes(limiter: RateLimiterLayer) -> Router<AppState> {
    Router::new()
        // Catalog
        .route("/", get(home::home))
        .route("/category/{category}", get(catalog::category))
        .route("/search", get(catalog::search))
        .route("/product/{id}", get(products::show))
        // Cart and checkout
        .nest("/cart", cart_routes())
        .route("/checkout", post(checkout::place_order))
        // Customer auth
        .route(
            "/signin",
            get(auth::sign_in_page).merge(post(auth::sign_in).layer(limiter.clone())),
        )
        .route(
            "/signup",
            get(auth::sign_up_page).merge(post(auth::sign_up).layer(limiter.clone())),
        )
        .route("/logout", post(auth::logout))
        // Admin console
        .nest("/admin", admin_routes(limiter))
        .fallback(products::fallback)
}
