//! Opaque API session tokens.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A session token issued by the catalog API on successful login.
///
/// Stored in the visitor's server-side session and sent back to the API as
/// `Authorization: Token {value}`. `Debug` is redacted so tokens never end up
/// in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a raw token string.
    #[must_use]
    pub const fn new(token: String) -> Self {
        Self(token)
    }

    /// Expose the raw token for an outgoing request.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!("Token {}", self.0)
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken([REDACTED])")
    }
}
