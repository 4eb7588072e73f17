//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use voltmart_core::{SessionToken, UserId};

/// Session-stored customer identity.
///
/// Minimal data stored in the session to identify the signed-in customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Customer's API account ID.
    pub id: UserId,
    pub username: String,
    pub email: String,
    /// Token issued by the API at sign-in.
    pub token: SessionToken,
}

/// Session-stored administrator identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    pub username: String,
    /// Token sent as `Authorization: Token {token}` on admin calls.
    pub token: SessionToken,
}

/// Session keys.
pub mod keys {
    /// Key for storing the signed-in customer.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for storing the signed-in administrator.
    pub const CURRENT_ADMIN: &str = "current_admin";

    /// Key for storing the cart lines.
    pub const CART: &str = "cart";

    /// Key for a one-shot message shown on the next page.
    pub const FLASH: &str = "flash";
}
