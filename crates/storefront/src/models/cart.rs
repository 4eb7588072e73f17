//! The buyer's cart.
//!
//! A cart is an ordered list of lines, each a snapshot of the product taken
//! when it was first added plus a quantity. Quantities stay within
//! `1..=MAX_LINE_QUANTITY`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use voltmart_core::{Price, ProductId};

use crate::api::{OrderLineInput, Product};

/// Largest quantity a single line can hold.
pub const MAX_LINE_QUANTITY: u32 = 999;

/// One product in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub image: Option<String>,
    pub quantity: u32,
}

impl CartLine {
    fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            quantity,
        }
    }

    /// Price × quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Result of adding a product, used for the confirmation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line was appended.
    Added { name: String },
    /// An existing line's quantity grew to `quantity`.
    Updated { name: String, quantity: u32 },
}

impl AddOutcome {
    /// Confirmation shown to the buyer.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Added { name } => format!("{name} added to cart!"),
            Self::Updated { name, quantity } => {
                format!("{name} quantity updated to {quantity}")
            }
        }
    }
}

/// Ordered list of cart lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Add `quantity` of a product; quantities below 1 count as 1.
    pub fn add(&mut self, product: &Product, quantity: u32) -> AddOutcome {
        let quantity = clamp_quantity(quantity);
        if let Some(line) = self.lines.iter_mut().find(|l| l.id == product.id) {
            line.quantity = clamp_quantity(line.quantity.saturating_add(quantity));
            AddOutcome::Updated {
                name: line.name.clone(),
                quantity: line.quantity,
            }
        } else {
            self.lines.push(CartLine::from_product(product, quantity));
            AddOutcome::Added {
                name: product.name.clone(),
            }
        }
    }

    /// Set a line's quantity, clamped to `1..=MAX_LINE_QUANTITY`.
    ///
    /// Returns `false` when the product is not in the cart.
    pub fn update(&mut self, id: ProductId, quantity: u32) -> bool {
        self.lines
            .iter_mut()
            .find(|l| l.id == id)
            .map(|line| line.quantity = clamp_quantity(quantity))
            .is_some()
    }

    /// Increase a line's quantity by one.
    pub fn increment(&mut self, id: ProductId) -> bool {
        let Some(current) = self.quantity_of(id) else {
            return false;
        };
        self.update(id, current.saturating_add(1))
    }

    /// Decrease a line's quantity by one, never below 1.
    pub fn decrement(&mut self, id: ProductId) -> bool {
        let Some(current) = self.quantity_of(id) else {
            return false;
        };
        self.update(id, current.saturating_sub(1))
    }

    /// Remove a line entirely.
    pub fn remove(&mut self, id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.id != id);
        self.lines.len() != before
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn quantity_of(&self, id: ProductId) -> Option<u32> {
        self.lines.iter().find(|l| l.id == id).map(|l| l.quantity)
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0, |total, l| total.saturating_add(l.quantity))
    }

    /// Σ price × quantity.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        Price::inr(self.lines.iter().map(CartLine::line_total).sum())
    }

    /// Lines in the shape the order endpoint expects.
    #[must_use]
    pub fn order_lines(&self) -> Vec<OrderLineInput> {
        self.lines
            .iter()
            .map(|l| OrderLineInput {
                id: l.id,
                name: l.name.clone(),
                price: l.price,
                quantity: l.quantity,
            })
            .collect()
    }
}

fn clamp_quantity(quantity: u32) -> u32 {
    quantity.clamp(1, MAX_LINE_QUANTITY)
}
