//! Navigation bar context.
//!
//! Every page renders the same navbar: greeting, cart badge and login or
//! logout controls. [`Nav`] gathers that from the session in one extractor.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use voltmart_core::Category;

use crate::middleware::CspNonce;
use crate::models::{CurrentAdmin, CurrentUser, session_keys};
use crate::services::{CartStore, Flash, flash};

/// A category link in the navbar.
#[derive(Debug, Clone)]
pub struct NavCategory {
    pub slug: &'static str,
    pub label: &'static str,
}

/// Data the navbar needs on every page.
#[derive(Debug, Clone, Default)]
pub struct Nav {
    /// Customer username, or admin username when only an admin is signed in.
    pub username: Option<String>,
    pub is_admin: bool,
    pub cart_count: u32,
    /// CSP nonce for inline scripts on this page.
    pub nonce: String,
    pub categories: Vec<NavCategory>,
    /// Message left by the previous request, shown once.
    pub flash: Option<Flash>,
}

impl Nav {
    #[must_use]
    pub const fn signed_in(&self) -> bool {
        self.username.is_some()
    }

    /// "Welcome, {username}" or the guest greeting.
    #[must_use]
    pub fn greeting(&self) -> String {
        self.username
            .as_ref()
            .map_or_else(|| "Welcome, Guest".to_string(), |name| format!("Welcome, {name}"))
    }
}

fn nav_categories() -> Vec<NavCategory> {
    Category::ALL
        .iter()
        .map(|c| NavCategory {
            slug: c.slug(),
            label: c.label(),
        })
        .collect()
}

impl<S> FromRequestParts<S> for Nav
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let nonce = parts
            .extensions
            .get::<CspNonce>()
            .map(|n| n.value().to_string())
            .unwrap_or_default();

        let mut nav = Self {
            nonce,
            categories: nav_categories(),
            ..Self::default()
        };

        let Some(session) = parts.extensions.get::<Session>() else {
            return Ok(nav);
        };

        let user = session
            .get::<CurrentUser>(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten();
        let admin = session
            .get::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
            .await
            .ok()
            .flatten();

        nav.is_admin = admin.is_some();
        nav.username = user.map(|u| u.username).or_else(|| admin.map(|a| a.username));
        nav.cart_count = CartStore::new(session)
            .load()
            .await
            .map(|cart| cart.item_count())
            .unwrap_or_default();
        nav.flash = flash::take(session).await;

        Ok(nav)
    }
}
