//! Domain models for the storefront.
//!
//! Everything here lives in the visitor's session; catalog and order data
//! stay in [`crate::api`].

pub mod cart;
pub mod session;

pub use cart::{AddOutcome, Cart, CartLine, MAX_LINE_QUANTITY};
pub use session::{CurrentAdmin, CurrentUser, keys as session_keys};
