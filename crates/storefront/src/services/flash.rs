//! One-shot messages carried across a redirect.
//!
//! A POST handler stores a [`Flash`] and redirects; the next rendered page
//! takes it out of the session and shows it once.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::models::session_keys;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.kind, FlashKind::Error)
    }
}

/// Store a message for the next rendered page. Failures are logged.
pub async fn set(session: &Session, flash: Flash) {
    if let Err(e) = session.insert(session_keys::FLASH, flash).await {
        tracing::error!(error = %e, "Failed to store flash message");
    }
}

/// Take the pending message, if any.
pub async fn take(session: &Session) -> Option<Flash> {
    session
        .remove::<Flash>(session_keys::FLASH)
        .await
        .ok()
        .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        assert!(Flash::error("Failed").is_error());
        assert!(!Flash::success("Saved").is_error());
    }

    #[test]
    fn test_serialized_kind_is_lowercase() {
        let json = serde_json::to_string(&Flash::success("ok")).unwrap_or_default();
        assert!(json.contains(r#""kind":"success""#));
    }
}
