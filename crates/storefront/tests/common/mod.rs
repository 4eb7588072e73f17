//! Shared harness for storefront integration tests.
//!
//! Each test spawns a stub of the Voltmart REST API and a storefront wired
//! to it, both on ephemeral ports, and talks to the storefront through a
//! cookie-keeping `reqwest` client.

#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use url::Url;

use voltmart_storefront::config::{ApiConfig, SentryConfig, StorefrontConfig};
use voltmart_storefront::state::AppState;

pub const CUSTOMER_PASSWORD: &str = "Secret123";
pub const CUSTOMER_TOKEN: &str = "customer-token";
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "Admin123";
pub const ADMIN_TOKEN: &str = "admin-token";

/// Mutable state of the stub API, inspectable from tests.
#[derive(Debug, Default)]
pub struct StubData {
    pub products: Vec<Value>,
    pub orders: Vec<Value>,
    /// Bodies received by `POST /api/orders/create/`.
    pub placed_orders: Vec<Value>,
    /// Tokens received by `POST /api/auth/logout/`.
    pub logouts: Vec<String>,
    /// Fail every catalog read with a 500.
    pub catalog_down: bool,
    /// Reject the admin token as if it had expired.
    pub admin_revoked: bool,
    next_product_id: i64,
}

pub type Stub = Arc<Mutex<StubData>>;

fn seed() -> StubData {
    StubData {
        products: vec![
            json!({"id": 1, "name": "Pixel 9", "price": "74999.00", "category": "phone",
                   "description": "Google phone", "image": "products/pixel.jpg"}),
            json!({"id": 2, "name": "ThinkPad X1", "price": "149999.00", "category": "laptop",
                   "description": "Business laptop", "image": "https://cdn.example.com/x1.jpg"}),
            json!({"id": 3, "name": "Galaxy Tab S9", "price": "69999.00", "category": "tablet",
                   "description": null, "image": null}),
            json!({"id": 4, "name": "Galaxy Buds", "price": "8999.00", "category": "accessory",
                   "description": "Earbuds", "image": ""}),
        ],
        orders: vec![
            json!({"id": 41, "customer_name": "Ravi", "customer_email": "ravi@example.com",
                   "customer_address": "12 MG Road, Pune", "total_price": "149998.00",
                   "status": "Pending", "payment_status": "Completed",
                   "created_at": "2025-03-09T14:05:00Z",
                   "items": [{"product_name": "Pixel 9", "quantity": 2, "price": "74999.00"}]}),
            json!({"id": 42, "customer_name": null, "customer_email": null,
                   "customer_address": null, "total_price": "8999.00",
                   "status": "Cancelled", "payment_status": "Pending",
                   "created_at": "2025-03-10T09:00:00Z", "items": []}),
        ],
        next_product_id: 5,
        ..StubData::default()
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Token "))
        .map(String::from)
}

fn is_admin(stub: &Stub, headers: &HeaderMap) -> bool {
    !stub.lock().unwrap().admin_revoked && bearer(headers).as_deref() == Some(ADMIN_TOKEN)
}

async fn list_products(State(stub): State<Stub>) -> Response {
    let data = stub.lock().unwrap();
    if data.catalog_down {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "database unavailable");
    }
    Json(Value::Array(data.products.clone())).into_response()
}

async fn get_product(State(stub): State<Stub>, Path(id): Path<i64>) -> Response {
    let data = stub.lock().unwrap();
    if data.catalog_down {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "database unavailable");
    }
    data.products
        .iter()
        .find(|p| p["id"] == id)
        .map_or_else(
            || error(StatusCode::NOT_FOUND, "Product not found"),
            |p| Json(p.clone()).into_response(),
        )
}

async fn products_by_category(State(stub): State<Stub>, Path(slug): Path<String>) -> Response {
    let data = stub.lock().unwrap();
    let matching: Vec<Value> = data
        .products
        .iter()
        .filter(|p| p["category"] == slug.as_str())
        .cloned()
        .collect();
    if matching.is_empty() {
        return error(StatusCode::NOT_FOUND, "No products found in this category");
    }
    Json(Value::Array(matching)).into_response()
}

async fn register(Json(body): Json<Value>) -> Response {
    if body["username"] == "taken" {
        return error(StatusCode::BAD_REQUEST, "Username already exists");
    }
    (
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered successfully",
            "user": {"id": 7, "username": body["username"], "email": body["email"], "role": "user"}
        })),
    )
        .into_response()
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] != CUSTOMER_PASSWORD {
        return error(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }
    let identifier = body["identifier"].as_str().unwrap_or_default();
    let username = identifier.split('@').next().unwrap_or(identifier);
    Json(json!({
        "token": CUSTOMER_TOKEN,
        "user": {"id": 7, "username": username, "email": "asha@example.com", "role": "user"}
    }))
    .into_response()
}

async fn logout(State(stub): State<Stub>, headers: HeaderMap) -> Response {
    if let Some(token) = bearer(&headers) {
        stub.lock().unwrap().logouts.push(token);
    }
    Json(json!({"message": "Logged out"})).into_response()
}

async fn create_order(State(stub): State<Stub>, Json(body): Json<Value>) -> Response {
    if body["customer_name"] == "Out Of Stock" {
        return error(StatusCode::BAD_REQUEST, "Pixel 9 is out of stock");
    }
    if body["customer_name"] == "Queued Buyer" {
        return Json(json!({"accepted": true})).into_response();
    }
    if body["customer_name"] == "No Receipt" {
        stub.lock().unwrap().placed_orders.push(body);
        return (StatusCode::CREATED, Json(json!({"message": "Order placed"}))).into_response();
    }
    let email = body["customer_email"].clone();
    stub.lock().unwrap().placed_orders.push(body);
    (
        StatusCode::CREATED,
        Json(json!({"order_id": 101, "message": "Order placed", "customer_email": email})),
    )
        .into_response()
}

async fn admin_login(Json(body): Json<Value>) -> Response {
    if body["username"] == ADMIN_USERNAME && body["password"] == ADMIN_PASSWORD {
        Json(json!({ "token": ADMIN_TOKEN })).into_response()
    } else {
        error(StatusCode::UNAUTHORIZED, "Invalid credentials")
    }
}

async fn admin_orders(State(stub): State<Stub>, headers: HeaderMap) -> Response {
    if !is_admin(&stub, &headers) {
        return error(StatusCode::UNAUTHORIZED, "Invalid token");
    }
    Json(json!({ "orders": stub.lock().unwrap().orders.clone() })).into_response()
}

async fn add_product(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    if !is_admin(&stub, &headers) {
        return error(StatusCode::UNAUTHORIZED, "Invalid token");
    }
    let mut data = stub.lock().unwrap();
    body["id"] = json!(data.next_product_id);
    data.next_product_id += 1;
    data.products.push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn update_product(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    if !is_admin(&stub, &headers) {
        return error(StatusCode::UNAUTHORIZED, "Invalid token");
    }
    let mut data = stub.lock().unwrap();
    let Some(product) = data.products.iter_mut().find(|p| p["id"] == id) else {
        return error(StatusCode::NOT_FOUND, "Product not found");
    };
    if let (Some(target), Some(fields)) = (product.as_object_mut(), body.as_object()) {
        for (key, value) in fields {
            target.insert(key.clone(), value.clone());
        }
    }
    Json(product.clone()).into_response()
}

async fn delete_product(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    if !is_admin(&stub, &headers) {
        return error(StatusCode::UNAUTHORIZED, "Invalid token");
    }
    let mut data = stub.lock().unwrap();
    let before = data.products.len();
    data.products.retain(|p| p["id"] != id);
    if data.products.len() == before {
        return error(StatusCode::NOT_FOUND, "Product not found");
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn update_order(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    if !is_admin(&stub, &headers) {
        return error(StatusCode::UNAUTHORIZED, "Invalid token");
    }
    let mut data = stub.lock().unwrap();
    let Some(order) = data.orders.iter_mut().find(|o| o["id"] == id) else {
        return error(StatusCode::NOT_FOUND, "Order not found");
    };
    order["status"] = body["status"].clone();
    Json(json!({"message": "Order status updated"})).into_response()
}

fn stub_router(stub: Stub) -> Router {
    Router::new()
        .route("/api/products/", get(list_products))
        .route("/api/products/{id}/", get(get_product))
        .route("/api/products/category/{slug}/", get(products_by_category))
        .route("/api/auth/register/", post(register))
        .route("/api/auth/login/", post(login))
        .route("/api/auth/logout/", post(logout))
        .route("/api/orders/create/", post(create_order))
        .route("/api/admin/login/", post(admin_login))
        .route("/api/admin/orders/", get(admin_orders))
        .route("/api/admin/products/add/", post(add_product))
        .route("/api/admin/products/update/{id}/", put(update_product))
        .route("/api/admin/products/delete/{id}/", delete(delete_product))
        .route("/api/admin/orders/update/{id}/", put(update_order))
        .with_state(stub)
}

/// A running storefront plus the stub API behind it.
pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
    pub stub: Stub,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .unwrap()
    }

    /// GET a page and return its body, asserting a 200.
    pub async fn page(&self, path: &str) -> String {
        let response = self.get(path).await;
        assert_eq!(response.status(), 200, "GET {path}");
        response.text().await.unwrap()
    }

    pub async fn add_to_cart(&self, product_id: &str, quantity: &str) -> reqwest::Response {
        self.post_form(
            "/cart/add",
            &[
                ("product_id", product_id),
                ("quantity", quantity),
                ("return_to", "/cart"),
            ],
        )
        .await
    }

    pub async fn sign_in(&self, identifier: &str, password: &str) -> reqwest::Response {
        self.post_form(
            "/signin",
            &[("identifier", identifier), ("password", password)],
        )
        .await
    }

    pub async fn admin_login(&self) -> reqwest::Response {
        self.post_form(
            "/admin/login",
            &[("username", ADMIN_USERNAME), ("password", ADMIN_PASSWORD)],
        )
        .await
    }
}

async fn serve_background(listener: TcpListener, router: Router) {
    tokio::spawn(async move {
        voltmart_storefront::serve(listener, router, std::future::pending())
            .await
            .unwrap();
    });
}

/// Spawn the stub API and a storefront pointed at it.
pub async fn spawn_app() -> TestApp {
    let stub: Stub = Arc::new(Mutex::new(seed()));

    let api_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let api_addr = api_listener.local_addr().unwrap();
    let api_router = stub_router(Arc::clone(&stub));
    tokio::spawn(async move {
        axum::serve(api_listener, api_router).await.unwrap();
    });

    let api_url = Url::parse(&format!("http://{api_addr}/")).unwrap();
    let mut api = ApiConfig::with_base_url(api_url);
    api.timeout = Duration::from_secs(5);

    let config = StorefrontConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        base_url: "http://127.0.0.1".to_string(),
        session_secret: SecretString::from(
            "kX9#mQ2$vL7@pR4!wT8&nZ3*bH6^jF1%cY5(dG0)sA2-eU7+iO4=qW9~tM3<xB8>".to_string(),
        ),
        api,
        sentry: SentryConfig::default(),
    };

    let state = AppState::new(config).unwrap();
    let router = voltmart_storefront::app::router(state).unwrap();

    let listener = TcpListener::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    serve_background(listener, router).await;

    let client = reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .unwrap();

    TestApp {
        base_url: format!("http://{addr}"),
        client,
        stub,
    }
}
