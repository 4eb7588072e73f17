//! Customer sign-up, sign-in, logout and credential rate limiting.

#![allow(clippy::unwrap_used)]

mod common;

use common::{CUSTOMER_PASSWORD, CUSTOMER_TOKEN, TestApp, spawn_app};

async fn sign_up(
    app: &TestApp,
    username: &str,
    email: &str,
    password: &str,
    confirm: &str,
) -> reqwest::Response {
    app.post_form(
        "/signup",
        &[
            ("username", username),
            ("email", email),
            ("password", password),
            ("confirm_password", confirm),
        ],
    )
    .await
}

// =============================================================================
// Sign-up
// =============================================================================

#[tokio::test]
async fn test_sign_up_redirects_to_sign_in() {
    let app = spawn_app().await;
    let response = sign_up(&app, "asha", "asha@example.com", "Secret123", "Secret123").await;

    assert_eq!(response.status(), 200);
    assert!(response.url().path().ends_with("/signin"));
    let body = response.text().await.unwrap();
    assert!(body.contains("Signup successful!"));
    // Signing up does not sign in
    assert!(body.contains("Welcome, Guest"));
}

#[tokio::test]
async fn test_sign_up_validation() {
    let app = spawn_app().await;

    let body = sign_up(&app, "asha", "asha@example.com", "Secret123", "Secret124")
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("Passwords do not match!"));

    let body = sign_up(&app, "asha", "asha@example.com", "secret", "secret")
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("Password must be at least 8 characters long"));

    let body = sign_up(&app, "asha", "not-an-email", "Secret123", "Secret123")
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("Please enter a valid email address."));
    // Username is kept, password is not
    assert!(body.contains("value=\"asha\""));
    assert!(!body.contains("Secret123"));
}

#[tokio::test]
async fn test_sign_up_surfaces_api_rejection() {
    let app = spawn_app().await;
    let body = sign_up(&app, "taken", "taken@example.com", "Secret123", "Secret123")
        .await
        .text()
        .await
        .unwrap();

    assert!(body.contains("Username already exists"));
}

// =============================================================================
// Sign-in and logout
// =============================================================================

#[tokio::test]
async fn test_sign_in_and_logout() {
    let app = spawn_app().await;

    let response = app.sign_in("asha", CUSTOMER_PASSWORD).await;
    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("Welcome, asha"));
    assert!(body.contains("action=\"/logout\""));

    let body = app
        .post_form("/logout", &[])
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("Welcome, Guest"));
    assert_eq!(
        app.stub.lock().unwrap().logouts,
        vec![CUSTOMER_TOKEN.to_string()]
    );
}

#[tokio::test]
async fn test_sign_in_with_email() {
    let app = spawn_app().await;
    let body = app
        .sign_in("asha@example.com", CUSTOMER_PASSWORD)
        .await
        .text()
        .await
        .unwrap();

    assert!(body.contains("Welcome, asha"));
}

#[tokio::test]
async fn test_sign_in_rejected() {
    let app = spawn_app().await;

    let body = app.sign_in("asha", "wrong").await.text().await.unwrap();
    assert!(body.contains("Invalid username"));
    assert!(body.contains("value=\"asha\""));

    let body = app.sign_in("", "").await.text().await.unwrap();
    assert!(body.contains("Please fill in all fields."));
}

#[tokio::test]
async fn test_logout_keeps_cart() {
    let app = spawn_app().await;
    app.sign_in("asha", CUSTOMER_PASSWORD).await;
    app.add_to_cart("1", "2").await;

    app.post_form("/logout", &[]).await;

    assert!(app.page("/cart/count").await.contains(">2<"));
}

// =============================================================================
// Rate limiting
// =============================================================================

#[tokio::test]
async fn test_credential_posts_are_rate_limited() {
    let app = spawn_app().await;

    for _ in 0..5 {
        let response = app.sign_in("asha", "wrong").await;
        assert_eq!(response.status(), 200);
    }

    let response = app.sign_in("asha", "wrong").await;
    assert_eq!(response.status(), 429);

    // Pages stay reachable
    assert_eq!(app.get("/signin").await.status(), 200);
}
