//! Client for the remote catalog/order REST API.
//!
//! # Architecture
//!
//! - The API is the source of truth for products, orders and accounts.
//!   Nothing is persisted locally except the visitor's session.
//! - Catalog reads are cached in memory via `moka` (TTL from configuration);
//!   admin mutations invalidate the cache.
//! - Admin endpoints authenticate with `Authorization: Token {token}`.
//!
//! # Example
//!
//! ```rust,ignore
//! use voltmart_storefront::api::ApiClient;
//!
//! let client = ApiClient::new(&config.api)?;
//! let products = client.list_products().await?;
//! let laptops = client.products_by_category("laptop").await?;
//! ```

mod cache;
mod client;
pub mod types;

pub use client::ApiClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API returned {status}: {}", .message.as_deref().unwrap_or("(no details)"))]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the error body, if any.
        message: Option<String>,
    },

    /// Resource not found (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Credentials missing, expired or rejected (HTTP 401/403).
    #[error("Unauthorized: {}", .0.as_deref().unwrap_or("(no details)"))]
    Unauthorized(Option<String>),

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// True when no response was received at all.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Http(_))
    }

    /// Human-readable message sent by the API in its error body.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } | Self::Unauthorized(message) => message.as_deref(),
            _ => None,
        }
    }
}

/// Keys whose string value is the whole message.
const MESSAGE_KEYS: [&str; 3] = ["error", "message", "detail"];

/// Pull a display message out of an API error body.
///
/// The API answers with `{"error": "..."}`, `{"message": "..."}`,
/// `{"detail": "..."}` or a field-error map such as
/// `{"name": ["This field is required."]}`.
pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;

    for key in MESSAGE_KEYS {
        if let Some(text) = object.get(key).and_then(serde_json::Value::as_str)
            && !text.trim().is_empty()
        {
            return Some(text.to_string());
        }
    }

    object
        .iter()
        .filter(|(field, _)| !MESSAGE_KEYS.contains(&field.as_str()))
        .find_map(|(field, errors)| {
            let first = match errors {
                serde_json::Value::String(s) => Some(s.as_str()),
                serde_json::Value::Array(items) => {
                    items.first().and_then(serde_json::Value::as_str)
                }
                _ => None,
            }
            .filter(|text| !text.trim().is_empty())?;
            if field == "non_field_errors" {
                Some(first.to_string())
            } else {
                Some(format!("{field}: {first}"))
            }
        })
}
