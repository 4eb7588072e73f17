//! Authentication error types.

use thiserror::Error;

use crate::api::ApiError;

/// Errors that can occur during sign-in, sign-up and admin login.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required form field was blank.
    #[error("missing required fields")]
    MissingFields,

    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] voltmart_core::EmailError),

    /// Password and confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// Password too weak.
    #[error("password validation failed")]
    WeakPassword,

    /// The API rejected the credentials (HTTP 401/403).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The API refused the request with a client error.
    #[error("rejected by API: {}", .0.as_deref().unwrap_or("(no details)"))]
    Rejected(Option<String>),

    /// The API could not be reached.
    #[error("network error: {0}")]
    Network(#[source] ApiError),

    /// Any other API failure.
    #[error("API error: {0}")]
    Api(#[source] ApiError),
}

const PASSWORD_RULE: &str =
    "Password must be at least 8 characters long, include a number, and an uppercase letter.";

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        match err {
            err if err.is_network() => Self::Network(err),
            ApiError::Unauthorized(_) => Self::InvalidCredentials,
            ApiError::Status { status, message } if (400..500).contains(&status) => {
                Self::Rejected(message)
            }
            ApiError::NotFound(message) => Self::Rejected(Some(message)),
            other => Self::Api(other),
        }
    }
}

impl AuthError {
    /// True for failures caused by the API or the network rather than input.
    #[must_use]
    pub const fn is_server_side(&self) -> bool {
        matches!(self, Self::Api(_) | Self::Network(_))
    }

    /// Message for the customer sign-in form.
    #[must_use]
    pub fn sign_in_message(&self) -> String {
        match self {
            Self::MissingFields => "Please fill in all fields.".to_string(),
            Self::Network(_) => "Network error. Please check your connection.".to_string(),
            Self::InvalidCredentials => "Invalid username/email or password.".to_string(),
            Self::Rejected(Some(message)) => message.clone(),
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }

    /// Message for the sign-up form.
    #[must_use]
    pub fn sign_up_message(&self) -> String {
        match self {
            Self::MissingFields => "Please fill in all fields.".to_string(),
            Self::InvalidEmail(_) => "Please enter a valid email address.".to_string(),
            Self::PasswordMismatch => "Passwords do not match!".to_string(),
            Self::WeakPassword => PASSWORD_RULE.to_string(),
            Self::Network(_) => "Network error! Please check your connection.".to_string(),
            Self::Rejected(Some(message)) => message.clone(),
            _ => "Signup failed! Please try again.".to_string(),
        }
    }

    /// Message for the admin login form.
    #[must_use]
    pub fn admin_login_message(&self) -> String {
        match self {
            Self::MissingFields => "Please fill in all fields.".to_string(),
            Self::InvalidCredentials => "Invalid username or password.".to_string(),
            Self::Rejected(Some(message)) => message.clone(),
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_api_error() {
        assert!(matches!(
            AuthError::from(ApiError::Unauthorized(None)),
            AuthError::InvalidCredentials
        ));
        assert!(matches!(
            AuthError::from(ApiError::Status {
                status: 400,
                message: Some("Invalid credentials".to_string()),
            }),
            AuthError::Rejected(Some(_))
        ));
        assert!(matches!(
            AuthError::from(ApiError::Status {
                status: 502,
                message: None,
            }),
            AuthError::Api(_)
        ));
    }

    #[test]
    fn test_sign_in_messages() {
        assert_eq!(
            AuthError::InvalidCredentials.sign_in_message(),
            "Invalid username/email or password."
        );
        assert_eq!(
            AuthError::Rejected(Some("Invalid credentials".to_string())).sign_in_message(),
            "Invalid credentials"
        );
        assert_eq!(
            AuthError::Rejected(None).sign_in_message(),
            "Something went wrong. Please try again."
        );
    }

    #[test]
    fn test_sign_up_messages() {
        assert_eq!(
            AuthError::PasswordMismatch.sign_up_message(),
            "Passwords do not match!"
        );
        assert_eq!(AuthError::WeakPassword.sign_up_message(), PASSWORD_RULE);
        assert_eq!(
            AuthError::Rejected(Some("Username exists".to_string())).sign_up_message(),
            "Username exists"
        );
        assert_eq!(
            AuthError::Rejected(None).sign_up_message(),
            "Signup failed! Please try again."
        );
    }

    #[test]
    fn test_admin_login_messages() {
        assert_eq!(
            AuthError::InvalidCredentials.admin_login_message(),
            "Invalid username or password."
        );
        assert_eq!(
            AuthError::Api(ApiError::RateLimited(5)).admin_login_message(),
            "Something went wrong. Please try again."
        );
    }
}
