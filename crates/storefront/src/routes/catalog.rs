//! Category and search route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use crate::filters;
use crate::middleware::Nav;
use crate::routes::products::ProductCard;
use crate::services::catalog;
use crate::state::AppState;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Category page template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog/category.html")]
pub struct CategoryTemplate {
    pub nav: Nav,
    pub heading: String,
    pub products: Vec<ProductCard>,
    pub error: Option<String>,
    /// Where "Add to Cart" returns to.
    pub return_to: String,
}

/// Search results template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog/search.html")]
pub struct SearchTemplate {
    pub nav: Nav,
    pub query: String,
    pub products: Vec<ProductCard>,
    pub error: Option<String>,
    pub return_to: String,
}

/// Display the products of one category.
///
/// An empty category renders a friendly message rather than an error.
#[instrument(skip(state, nav))]
pub async fn category(
    State(state): State<AppState>,
    nav: Nav,
    Path(slug): Path<String>,
) -> Response {
    let heading = format!("{} Products", voltmart_core::category::heading(&slug));

    let (products, error) = match state.api().products_by_category(&slug).await {
        Ok(products) => (
            products
                .iter()
                .map(|p| ProductCard::new(p, &state))
                .collect(),
            None,
        ),
        Err(e) => {
            tracing::error!(category = %slug, error = %e, "Failed to fetch category");
            (Vec::new(), Some("Failed to load products.".to_string()))
        }
    };

    CategoryTemplate {
        nav,
        heading,
        products,
        error,
        return_to: format!("/category/{}", urlencoding::encode(&slug)),
    }
    .into_response()
}

/// Display products whose name matches the query.
#[instrument(skip(state, nav))]
pub async fn search(
    State(state): State<AppState>,
    nav: Nav,
    Query(query): Query<SearchQuery>,
) -> Response {
    let (products, error) = match state.api().list_products().await {
        Ok(all) => (
            catalog::search(&all, &query.q)
                .into_iter()
                .map(|p| ProductCard::new(p, &state))
                .collect(),
            None,
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch products for search");
            (
                Vec::new(),
                Some("Failed to fetch search results.".to_string()),
            )
        }
    };

    SearchTemplate {
        nav,
        query: query.q.to_lowercase(),
        products,
        error,
        return_to: format!("/search?q={}", urlencoding::encode(&query.q)),
    }
    .into_response()
}
