//! Admin login route handlers.

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

use crate::filters;
use crate::middleware::{Nav, set_current_admin};
use crate::services::AuthService;
use crate::state::AppState;

/// Admin login form data.
#[derive(Deserialize)]
pub struct AdminLoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Admin login page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/login.html")]
pub struct AdminLoginTemplate {
    pub nav: Nav,
    pub error: Option<String>,
    pub username: String,
}

/// Display the admin login page, or go straight to the dashboard when an
/// admin is already signed in.
pub async fn login_page(nav: Nav) -> Response {
    if nav.is_admin {
        return Redirect::to("/admin").into_response();
    }

    AdminLoginTemplate {
        nav,
        error: None,
        username: String::new(),
    }
    .into_response()
}

/// Handle admin login form submission.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    nav: Nav,
    Form(form): Form<AdminLoginForm>,
) -> Response {
    let admin = match AuthService::new(state.api())
        .admin_sign_in(&form.username, &form.password)
        .await
    {
        Ok(admin) => admin,
        Err(e) => {
            if e.is_server_side() {
                tracing::error!(error = %e, "Admin login failed");
            } else {
                tracing::warn!(username = %form.username.trim(), "Admin login rejected");
            }
            return AdminLoginTemplate {
                nav,
                error: Some(e.admin_login_message()),
                username: form.username,
            }
            .into_response();
        }
    };

    if let Err(e) = set_current_admin(&session, &admin).await {
        tracing::error!(error = %e, "Failed to store admin in session");
        return AdminLoginTemplate {
            nav,
            error: Some("Something went wrong. Please try again.".to_string()),
            username: form.username,
        }
        .into_response();
    }

    tracing::info!(username = %admin.username, "Admin signed in");
    Redirect::to("/admin").into_response()
}
