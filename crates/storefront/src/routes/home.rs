//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::filters;
use crate::middleware::Nav;
use crate::routes::products::{ErrorTemplate, ProductCard};
use crate::services::catalog;
use crate::state::AppState;

/// One category section on the home page.
#[derive(Debug, Clone)]
pub struct CategorySection {
    pub slug: String,
    pub heading: String,
    pub products: Vec<ProductCard>,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct HomeTemplate {
    pub nav: Nav,
    pub sections: Vec<CategorySection>,
}

/// Display the home page: every product, grouped by category.
#[instrument(skip(state, nav))]
pub async fn home(State(state): State<AppState>, nav: Nav) -> Response {
    let products = match state.api().list_products().await {
        Ok(products) => products,
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch products for home page");
            return (
                StatusCode::BAD_GATEWAY,
                ErrorTemplate {
                    nav,
                    message: "Failed to load products.".to_string(),
                    retry_url: "/".to_string(),
                },
            )
                .into_response();
        }
    };

    let sections = catalog::group_by_category(&products)
        .into_iter()
        .map(|group| CategorySection {
            slug: group.slug.to_string(),
            heading: voltmart_core::category::heading(group.slug),
            products: group
                .products
                .into_iter()
                .map(|p| ProductCard::new(p, &state))
                .collect(),
        })
        .collect();

    HomeTemplate { nav, sections }.into_response()
}
