//! Customer authentication route handlers.
//!
//! Sign-in, sign-up and logout. Credentials are checked by the catalog API;
//! the issued token is kept in the session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{Nav, OptionalUser, clear_identities, set_current_user};
use crate::services::{AuthService, Flash, flash};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Sign-in form data.
#[derive(Deserialize)]
pub struct SignInForm {
    /// Username or email.
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub password: String,
}

/// Sign-up form data.
#[derive(Deserialize)]
pub struct SignUpForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Sign-in page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/sign_in.html")]
pub struct SignInTemplate {
    pub nav: Nav,
    pub error: Option<String>,
    pub identifier: String,
}

/// Sign-up page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/sign_up.html")]
pub struct SignUpTemplate {
    pub nav: Nav,
    pub error: Option<String>,
    pub username: String,
    pub email: String,
}

// =============================================================================
// Sign-in Routes
// =============================================================================

/// Display the sign-in page.
pub async fn sign_in_page(nav: Nav) -> impl IntoResponse {
    SignInTemplate {
        nav,
        error: None,
        identifier: String::new(),
    }
}

/// Handle sign-in form submission.
#[instrument(skip_all)]
pub async fn sign_in(
    State(state): State<AppState>,
    session: Session,
    nav: Nav,
    Form(form): Form<SignInForm>,
) -> Response {
    let user = match AuthService::new(state.api())
        .sign_in(&form.identifier, &form.password)
        .await
    {
        Ok(user) => user,
        Err(e) => {
            if e.is_server_side() {
                tracing::error!(error = %e, "Sign-in failed");
            } else {
                tracing::info!(error = %e, "Sign-in rejected");
            }
            return SignInTemplate {
                nav,
                error: Some(e.sign_in_message()),
                identifier: form.identifier,
            }
            .into_response();
        }
    };

    if let Err(e) = set_current_user(&session, &user).await {
        tracing::error!(error = %e, "Failed to store user in session");
        return SignInTemplate {
            nav,
            error: Some("Something went wrong. Please try again.".to_string()),
            identifier: form.identifier,
        }
        .into_response();
    }

    set_sentry_user(&user.id, &user.username);
    tracing::info!(user_id = %user.id, "User signed in");

    Redirect::to("/").into_response()
}

// =============================================================================
// Sign-up Routes
// =============================================================================

/// Display the sign-up page.
pub async fn sign_up_page(nav: Nav) -> impl IntoResponse {
    SignUpTemplate {
        nav,
        error: None,
        username: String::new(),
        email: String::new(),
    }
}

/// Handle sign-up form submission.
///
/// On success the visitor is sent to the sign-in page; sign-up does not
/// sign them in.
#[instrument(skip_all)]
pub async fn sign_up(
    State(state): State<AppState>,
    session: Session,
    nav: Nav,
    Form(form): Form<SignUpForm>,
) -> Response {
    let result = AuthService::new(state.api())
        .sign_up(
            &form.username,
            &form.email,
            &form.password,
            &form.confirm_password,
        )
        .await;

    match result {
        Ok(()) => {
            tracing::info!(username = %form.username.trim(), "Account registered");
            flash::set(&session, Flash::success("Signup successful!")).await;
            Redirect::to("/signin").into_response()
        }
        Err(e) => {
            if e.is_server_side() {
                tracing::error!(error = %e, "Sign-up failed");
            }
            SignUpTemplate {
                nav,
                error: Some(e.sign_up_message()),
                username: form.username,
                email: form.email,
            }
            .into_response()
        }
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Sign out customer and admin alike.
///
/// The API logout is best-effort; the local session is always cleared.
#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
) -> Response {
    if let Some(user) = user {
        AuthService::new(state.api()).sign_out(&user).await;
    }

    if let Err(e) = clear_identities(&session).await {
        tracing::error!(error = %e, "Failed to clear session on logout");
    }
    clear_sentry_user();

    Redirect::to("/").into_response()
}
