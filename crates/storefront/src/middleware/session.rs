//! Session middleware configuration.
//!
//! Sessions live in process memory in a bounded `moka` cache
//! (`tower-sessions-moka-store`); the cookie only carries a signed session
//! ID. Records are evicted once their expiry date passes or the store is
//! full. Restarting the server empties every cart and signs everyone out.

use secrecy::ExposeSecret;
use tower_sessions::cookie::{Key, KeyError, SameSite};
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_moka_store::MokaStore;

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "voltmart_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Most sessions held at once; the least recently used go first.
const MAX_SESSIONS: u64 = 100_000;

/// In-memory session store with expiry-based eviction.
#[must_use]
pub fn session_store() -> MokaStore {
    MokaStore::new(Some(MAX_SESSIONS))
}

/// Create the session layer.
///
/// # Errors
///
/// Returns an error if the session secret is too short to derive a signing
/// key (64 bytes minimum).
pub fn create_session_layer(
    config: &StorefrontConfig,
) -> Result<SessionManagerLayer<MokaStore, tower_sessions::service::SignedCookie>, KeyError> {
    let key = Key::try_from(config.session_secret.expose_secret().as_bytes())?;

    Ok(SessionManagerLayer::new(session_store())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_https())
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key))
}
