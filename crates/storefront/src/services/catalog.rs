//! Catalog helpers: grouping, search and image resolution.

use url::Url;

use crate::api::Product;

/// Products of one category, in catalog order.
#[derive(Debug)]
pub struct CategoryGroup<'a> {
    pub slug: &'a str,
    pub products: Vec<&'a Product>,
}

/// Group products by category, keeping categories in first-seen order.
#[must_use]
pub fn group_by_category(products: &[Product]) -> Vec<CategoryGroup<'_>> {
    let mut groups: Vec<CategoryGroup<'_>> = Vec::new();
    for product in products {
        match groups.iter_mut().find(|g| g.slug == product.category) {
            Some(group) => group.products.push(product),
            None => groups.push(CategoryGroup {
                slug: &product.category,
                products: vec![product],
            }),
        }
    }
    groups
}

/// Products whose name contains `query`, ignoring case.
///
/// The query is used as typed: an empty query matches everything, while
/// surrounding spaces are part of the match.
#[must_use]
pub fn search<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    let needle = query.to_lowercase();
    products
        .iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .collect()
}

/// Fallback image under the media root.
pub const DEFAULT_IMAGE: &str = "default-image.jpg";

/// Resolve a product image reference to a URL.
///
/// Absolute `http(s)` references are kept as-is, blank ones fall back to
/// [`DEFAULT_IMAGE`], and anything else is resolved against the media root.
#[must_use]
pub fn image_url(media: &Url, image: Option<&str>) -> String {
    let reference = image.map(str::trim).unwrap_or_default();
    if reference.starts_with("http") {
        return reference.to_string();
    }
    let reference = if reference.is_empty() {
        DEFAULT_IMAGE
    } else {
        reference
    };
    media
        .join(reference)
        .map_or_else(|_| format!("{media}{reference}"), String::from)
}
