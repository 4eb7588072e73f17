//! Admin product mutations.

use axum::{
    Form,
    extract::{Path, State},
    response::Response,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use voltmart_core::{Category, ProductId};

use crate::api::{NewProduct, ProductUpdate};
use crate::middleware::RequireAdmin;
use crate::routes::admin::{finish, reject};
use crate::state::AppState;

/// Add product form data.
#[derive(Debug, Default, Deserialize)]
pub struct AddProductForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
}

/// Update product form data. Blank fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub category: String,
}

const MISSING_FIELDS: &str = "Please fill in all fields.";
const INVALID_PRICE: &str = "Please enter a valid price.";
const INVALID_CATEGORY: &str = "Please choose a valid category.";
const NOTHING_TO_UPDATE: &str = "Nothing to update.";

fn parse_price(raw: &str) -> Result<Decimal, &'static str> {
    raw.trim()
        .parse::<Decimal>()
        .ok()
        .filter(|p| !p.is_sign_negative())
        .ok_or(INVALID_PRICE)
}

fn parse_category(raw: &str) -> Result<Category, &'static str> {
    raw.parse::<Category>().map_err(|_| INVALID_CATEGORY)
}

/// Validate the add form.
///
/// # Errors
///
/// Returns the message to flash when input is missing or malformed.
pub fn new_product(form: &AddProductForm) -> Result<NewProduct, &'static str> {
    let name = form.name.trim();
    if name.is_empty() || form.price.trim().is_empty() || form.category.trim().is_empty() {
        return Err(MISSING_FIELDS);
    }

    Ok(NewProduct {
        name: name.to_string(),
        price: parse_price(&form.price)?,
        category: parse_category(&form.category)?,
        image: form.image.trim().to_string(),
        description: form.description.trim().to_string(),
    })
}

/// Validate the update form into a partial update.
///
/// # Errors
///
/// Returns the message to flash when a field is malformed or nothing changed.
pub fn product_update(form: &UpdateProductForm) -> Result<ProductUpdate, &'static str> {
    let name = form.name.trim();
    let update = ProductUpdate {
        name: (!name.is_empty()).then(|| name.to_string()),
        price: match form.price.trim() {
            "" => None,
            raw => Some(parse_price(raw)?),
        },
        category: match form.category.trim() {
            "" => None,
            raw => Some(parse_category(raw)?),
        },
    };

    if update.name.is_none() && update.price.is_none() && update.category.is_none() {
        return Err(NOTHING_TO_UPDATE);
    }
    Ok(update)
}

/// Add a product.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    RequireAdmin(admin): RequireAdmin,
    Form(form): Form<AddProductForm>,
) -> Response {
    let product = match new_product(&form) {
        Ok(product) => product,
        Err(message) => return reject(&session, message).await,
    };

    let result = state.api().add_product(&admin.token, &product).await;
    finish(
        &session,
        result,
        "Product added successfully!",
        "Failed to add product. Please try again.",
    )
    .await
}

/// Update a product.
#[instrument(skip(state, session, admin, form))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ProductId>,
    Form(form): Form<UpdateProductForm>,
) -> Response {
    let update = match product_update(&form) {
        Ok(update) => update,
        Err(message) => return reject(&session, message).await,
    };

    let result = state.api().update_product(&admin.token, id, &update).await;
    finish(
        &session,
        result,
        "Product updated successfully!",
        "Failed to update product. Please try again.",
    )
    .await
}

/// Delete a product.
#[instrument(skip(state, session, admin))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ProductId>,
) -> Response {
    let result = state.api().delete_product(&admin.token, id).await;
    finish(
        &session,
        result,
        "Product deleted successfully!",
        "Failed to delete product. Please try again.",
    )
    .await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn add_form(name: &str, price: &str, category: &str) -> AddProductForm {
        AddProductForm {
            name: name.to_string(),
            price: price.to_string(),
            category: category.to_string(),
            ..AddProductForm::default()
        }
    }

    #[test]
    fn test_new_product_requires_fields() {
        assert_eq!(
            new_product(&add_form("", "100", "phone")).err(),
            Some(MISSING_FIELDS)
        );
        assert_eq!(
            new_product(&add_form("Pixel", "", "phone")).err(),
            Some(MISSING_FIELDS)
        );
    }

    #[test]
    fn test_new_product_validates_values() {
        assert_eq!(
            new_product(&add_form("Pixel", "abc", "phone")).err(),
            Some(INVALID_PRICE)
        );
        assert_eq!(
            new_product(&add_form("Pixel", "-1", "phone")).err(),
            Some(INVALID_PRICE)
        );
        assert_eq!(
            new_product(&add_form("Pixel", "100", "fridge")).err(),
            Some(INVALID_CATEGORY)
        );
    }

    #[test]
    fn test_new_product_ok() {
        let product = new_product(&add_form(" Pixel 9 ", "74999.00", "phone")).unwrap();
        assert_eq!(product.name, "Pixel 9");
        assert_eq!(product.category, Category::Phone);
        assert_eq!(product.price, Decimal::new(7_499_900, 2));
    }

    #[test]
    fn test_product_update_is_partial() {
        let update = product_update(&UpdateProductForm {
            price: "999".to_string(),
            ..UpdateProductForm::default()
        })
        .unwrap();
        assert_eq!(update.name, None);
        assert_eq!(update.price, Some(Decimal::from(999)));
        assert_eq!(update.category, None);
    }

    #[test]
    fn test_product_update_rejects_empty() {
        assert_eq!(
            product_update(&UpdateProductForm::default()).err(),
            Some(NOTHING_TO_UPDATE)
        );
    }
}
