//! Admin console route handlers.
//!
//! Everything except the login page requires an admin session
//! ([`RequireAdmin`](crate::middleware::RequireAdmin)). Mutations redirect
//! back to the dashboard with a flash message.

pub mod auth;
pub mod dashboard;
pub mod orders;
pub mod products;

use axum::response::{IntoResponse, Redirect, Response};
use tower_sessions::Session;

use crate::api::ApiError;
use crate::models::{CurrentAdmin, session_keys};
use crate::services::{Flash, flash};

/// Finish an admin mutation: flash the outcome and return to the dashboard.
///
/// A rejected admin token ends the admin session and sends the visitor to
/// the login page instead.
pub(crate) async fn finish(
    session: &Session,
    result: Result<(), ApiError>,
    success: &str,
    failure: &str,
) -> Response {
    match result {
        Ok(()) => {
            flash::set(session, Flash::success(success)).await;
            Redirect::to("/admin").into_response()
        }
        Err(ApiError::Unauthorized(_)) => expire_admin_session(session).await,
        Err(e) => {
            tracing::warn!(error = %e, "Admin action failed");
            let message = match &e {
                ApiError::Status { status, .. } if *status < 500 => e
                    .server_message()
                    .map_or_else(|| failure.to_string(), String::from),
                _ => failure.to_string(),
            };
            flash::set(session, Flash::error(message)).await;
            Redirect::to("/admin").into_response()
        }
    }
}

/// Drop the admin identity after the API rejected its token.
pub(crate) async fn expire_admin_session(session: &Session) -> Response {
    if let Err(e) = session
        .remove::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await
    {
        tracing::error!(error = %e, "Failed to clear admin session");
    }
    flash::set(
        session,
        Flash::error("Your admin session has expired. Please log in again."),
    )
    .await;
    Redirect::to("/admin/login").into_response()
}

/// Reject invalid form input without calling the API.
pub(crate) async fn reject(session: &Session, message: &str) -> Response {
    flash::set(session, Flash::error(message)).await;
    Redirect::to("/admin").into_response()
}
