//! Authentication service.
//!
//! Customer and admin credentials are verified by the catalog API; this
//! service validates form input, calls the API and turns the result into the
//! identity stored in the session.

mod error;

pub use error::AuthError;

use tracing::warn;

use voltmart_core::Email;

use crate::api::ApiClient;
use crate::models::{CurrentAdmin, CurrentUser};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication service.
pub struct AuthService<'a> {
    api: &'a ApiClient,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    // =========================================================================
    // Customers
    // =========================================================================

    /// Sign in with a username or email and a password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingFields` for blank input,
    /// `AuthError::InvalidCredentials` or `AuthError::Rejected` if the API
    /// refuses the credentials, or a network/API error.
    pub async fn sign_in(&self, identifier: &str, password: &str) -> Result<CurrentUser, AuthError> {
        let identifier = identifier.trim();
        if identifier.is_empty() || password.is_empty() {
            return Err(AuthError::MissingFields);
        }

        let response = self.api.login(identifier, password).await?;

        Ok(CurrentUser {
            id: response.user.id,
            username: response.user.username,
            email: response.user.email,
            token: response.token,
        })
    }

    /// Register a customer account.
    ///
    /// # Errors
    ///
    /// Returns a validation error (`MissingFields`, `InvalidEmail`,
    /// `PasswordMismatch`, `WeakPassword`) before calling the API, or
    /// `AuthError::Rejected` carrying the API's message.
    pub async fn sign_up(
        &self,
        username: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<(), AuthError> {
        let username = username.trim();
        if username.is_empty() || email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::MissingFields);
        }
        let email = Email::parse(email)?;

        if password != confirm_password {
            return Err(AuthError::PasswordMismatch);
        }
        validate_password(password)?;

        self.api.register(username, email.as_str(), password).await?;
        Ok(())
    }

    /// End the customer's API session.
    ///
    /// Failures are logged and otherwise ignored; the local session is
    /// cleared regardless.
    pub async fn sign_out(&self, user: &CurrentUser) {
        if let Err(e) = self.api.logout(&user.token).await {
            warn!(error = %e, "API logout failed");
        }
    }

    // =========================================================================
    // Administrators
    // =========================================================================

    /// Sign in as an administrator.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` or `AuthError::Rejected` if the
    /// API refuses the credentials, or a network/API error.
    pub async fn admin_sign_in(
        &self,
        username: &str,
        password: &str,
    ) -> Result<CurrentAdmin, AuthError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingFields);
        }

        let response = self.api.admin_login(username, password).await?;

        Ok(CurrentAdmin {
            username: username.to_string(),
            token: response.token,
        })
    }
}

/// Check the sign-up password rule: at least 8 characters, one digit and one
/// uppercase letter.
///
/// # Errors
///
/// Returns `AuthError::WeakPassword` if any requirement is missing.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    let long_enough = password.chars().count() >= MIN_PASSWORD_LENGTH;
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());

    if long_enough && has_digit && has_upper {
        Ok(())
    } else {
        Err(AuthError::WeakPassword)
    }
}
