//! Session-backed cart storage.

use tower_sessions::Session;
use tower_sessions::session::Error as SessionError;
use tracing::warn;

use crate::models::{Cart, session_keys};

/// Loads and saves the visitor's cart in their session.
pub struct CartStore<'a> {
    session: &'a Session,
}

impl<'a> CartStore<'a> {
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Rehydrate the cart. A missing or unreadable cart is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn load(&self) -> Result<Cart, SessionError> {
        match self.session.get::<Cart>(session_keys::CART).await {
            Ok(cart) => Ok(cart.unwrap_or_default()),
            Err(SessionError::SerdeJson(e)) => {
                warn!(error = %e, "Discarding unreadable cart");
                Ok(Cart::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Persist the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn save(&self, cart: &Cart) -> Result<(), SessionError> {
        self.session.insert(session_keys::CART, cart).await
    }

    /// Load, modify and save the cart in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn modify<T>(&self, f: impl FnOnce(&mut Cart) -> T) -> Result<T, SessionError> {
        let mut cart = self.load().await?;
        let result = f(&mut cart);
        self.save(&cart).await?;
        Ok(result)
    }
}
