//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Customer and admin sign-in against the catalog API
//! - `cart` - Cart persistence in the visitor's session
//! - `catalog` - Product grouping, search and image URLs
//! - `flash` - One-shot messages across redirects

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod flash;

pub use auth::{AuthError, AuthService};
pub use cart::CartStore;
pub use flash::Flash;
