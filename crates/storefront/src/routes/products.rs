//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use voltmart_core::ProductId;

use crate::api::{ApiError, Product};
use crate::filters;
use crate::middleware::Nav;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Debug, Clone)]
pub struct ProductCard {
    pub id: i64,
    pub name: String,
    pub price: String,
    pub image_url: String,
    pub category: String,
    pub description: String,
}

impl ProductCard {
    #[must_use]
    pub fn new(product: &Product, state: &AppState) -> Self {
        Self {
            id: product.id.as_i64(),
            name: product.name.clone(),
            price: product.price().display(),
            image_url: state.image_url(product.image.as_deref()),
            category: product.category.clone(),
            description: product.description.clone().unwrap_or_default(),
        }
    }
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub nav: Nav,
    pub product: ProductCard,
}

/// Not-found page template.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub nav: Nav,
    pub message: String,
}

/// Generic error page template with a retry link.
#[derive(Template, WebTemplate)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub nav: Nav,
    pub message: String,
    pub retry_url: String,
}

/// Render the not-found page with a 404 status.
pub fn not_found(nav: Nav, message: impl Into<String>) -> Response {
    (
        StatusCode::NOT_FOUND,
        NotFoundTemplate {
            nav,
            message: message.into(),
        },
    )
        .into_response()
}

/// Fallback for unknown paths.
pub async fn fallback(nav: Nav) -> Response {
    not_found(nav, "Page not found.")
}

/// Display product detail page.
#[instrument(skip(state, nav))]
pub async fn show(State(state): State<AppState>, nav: Nav, Path(id): Path<String>) -> Response {
    let Ok(id) = id.parse::<ProductId>() else {
        return not_found(nav, "Product not found.");
    };

    match state.api().get_product(id).await {
        Ok(product) => ProductShowTemplate {
            product: ProductCard::new(&product, &state),
            nav,
        }
        .into_response(),
        Err(ApiError::NotFound(_)) => not_found(nav, "Product not found."),
        Err(e) => {
            tracing::error!(product_id = %id, error = %e, "Failed to fetch product");
            (
                StatusCode::BAD_GATEWAY,
                ErrorTemplate {
                    nav,
                    message: "Failed to load product.".to_string(),
                    retry_url: format!("/product/{id}"),
                },
            )
                .into_response()
        }
    }
}
