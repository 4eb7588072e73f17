//! REST client for the catalog/order API.
//!
//! Uses `reqwest` 0.13 for HTTP. Catalog reads are cached using `moka`.

use std::sync::Arc;

use moka::future::Cache;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use voltmart_core::{OrderId, OrderStatus, ProductId, SessionToken};

use crate::config::ApiConfig;

use super::cache::{CacheKey, CacheValue};
use super::types::{
    AdminLoginRequest, AdminLoginResponse, LoginRequest, LoginResponse, NewOrder, NewProduct,
    Order, OrderConfirmation, OrderList, OrderStatusUpdate, Product, ProductUpdate,
    RegisterRequest, RegisterResponse,
};
use super::{ApiError, extract_error_message};

/// Client for the catalog/order API.
///
/// Cloning is cheap; all clones share one connection pool and one cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("voltmart-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
                cache,
            }),
        })
    }

    /// Base URL of the API.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// Send a request and return the body of a successful response.
    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<String, ApiError> {
        self.execute_with_status(request).await.map(|(_, body)| body)
    }

    /// Like [`Self::execute`], keeping the exact success status.
    async fn execute_with_status(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<(StatusCode, String), ApiError> {
        let response = request.header(ACCEPT, "application/json").send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        let body = response.text().await?;

        if status.is_success() {
            return Ok((status, body));
        }

        let message = extract_error_message(&body);
        if status.is_server_error() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Catalog API returned server error"
            );
        } else {
            debug!(status = %status, message = ?message, "Catalog API rejected request");
        }

        Err(match status {
            StatusCode::NOT_FOUND => {
                ApiError::NotFound(message.unwrap_or_else(|| "resource".to_string()))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized(message),
            _ => ApiError::Status {
                status: status.as_u16(),
                message,
            },
        })
    }

    fn parse<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
        serde_json::from_str(body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse catalog API response"
            );
            ApiError::Parse(e)
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.inner.client.get(self.url(path)?);
        let body = self.execute(request).await?;
        Self::parse(&body)
    }

    async fn send_json<B: Serialize + Sync>(
        &self,
        method: reqwest::Method,
        path: &str,
        token: Option<&SessionToken>,
        body: &B,
    ) -> Result<String, ApiError> {
        let mut request = self.inner.client.request(method, self.url(path)?).json(body);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, token.authorization_header());
        }
        self.execute(request).await
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// List every product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Arc<Vec<Product>>, ApiError> {
        if let Some(CacheValue::Products(products)) =
            self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for product list");
            return Ok(products);
        }

        let products: Arc<Vec<Product>> = Arc::new(self.get_json("api/products/").await?);

        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(Arc::clone(&products)))
            .await;

        Ok(products)
    }

    /// Get a single product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the product does not exist, or another
    /// error if the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, ApiError> {
        let key = CacheKey::Product(id);
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product: Product = self.get_json(&format!("api/products/{id}/")).await?;

        self.inner
            .cache
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// List products in a category.
    ///
    /// The API answers 404 for a category with no products; that is returned
    /// as an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products_by_category(&self, slug: &str) -> Result<Arc<Vec<Product>>, ApiError> {
        let key = CacheKey::Category(slug.to_string());
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for category");
            return Ok(products);
        }

        let path = format!("api/products/category/{}/", urlencoding::encode(slug));
        let products: Vec<Product> = match self.get_json(&path).await {
            Ok(products) => products,
            Err(ApiError::NotFound(_)) => Vec::new(),
            Err(e) => return Err(e),
        };
        let products = Arc::new(products);

        self.inner
            .cache
            .insert(key, CacheValue::Products(Arc::clone(&products)))
            .await;

        Ok(products)
    }

    /// Drop every cached catalog read.
    pub fn invalidate_catalog(&self) {
        self.inner.cache.invalidate_all();
    }

    /// Check that the API answers without a server error.
    ///
    /// # Errors
    ///
    /// Returns an error if the API is unreachable or failing.
    pub async fn health_check(&self) -> Result<(), ApiError> {
        let request = self.inner.client.get(self.url("api/products/")?);
        self.execute(request).await.map(|_| ())
    }

    // =========================================================================
    // Customer accounts
    // =========================================================================

    /// Register a customer account.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` carrying the API's message when the account
    /// is rejected (duplicate username or email).
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<RegisterResponse, ApiError> {
        let body = RegisterRequest {
            username,
            email,
            password,
        };
        let response = self
            .send_json(reqwest::Method::POST, "api/auth/register/", None, &body)
            .await?;
        Self::parse(&response)
    }

    /// Sign in with a username or email.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the request fails.
    #[instrument(skip(self, password))]
    pub async fn login(&self, identifier: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest {
            identifier,
            password,
        };
        let response = self
            .send_json(reqwest::Method::POST, "api/auth/login/", None, &body)
            .await?;
        Self::parse(&response)
    }

    /// End the customer's API session.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn logout(&self, token: &SessionToken) -> Result<(), ApiError> {
        self.send_json(
            reqwest::Method::POST,
            "api/auth/logout/",
            Some(token),
            &serde_json::json!({}),
        )
        .await
        .map(|_| ())
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Place an order for the given cart lines.
    ///
    /// Only `201 Created` means the order exists. Its body is read leniently:
    /// a confirmation without an order id is still a placed order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is rejected, the API answers with any
    /// other status, or the request fails.
    #[instrument(skip(self, order), fields(lines = order.items.len()))]
    pub async fn create_order(&self, order: &NewOrder) -> Result<OrderConfirmation, ApiError> {
        let request = self
            .inner
            .client
            .post(self.url("api/orders/create/")?)
            .json(order);
        let (status, body) = self.execute_with_status(request).await?;

        if status != StatusCode::CREATED {
            warn!(status = %status, "Order endpoint did not create an order");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }

        Ok(serde_json::from_str(&body).unwrap_or_else(|e| {
            warn!(error = %e, "Order created but confirmation body was unreadable");
            OrderConfirmation::default()
        }))
    }

    // =========================================================================
    // Admin
    // =========================================================================

    /// Sign in as an administrator.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the request fails.
    #[instrument(skip(self, password))]
    pub async fn admin_login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AdminLoginResponse, ApiError> {
        let body = AdminLoginRequest { username, password };
        let response = self
            .send_json(reqwest::Method::POST, "api/admin/login/", None, &body)
            .await?;
        Self::parse(&response)
    }

    /// List all orders.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` if the admin token is rejected, or
    /// another error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn list_orders(&self, token: &SessionToken) -> Result<Vec<Order>, ApiError> {
        let request = self
            .inner
            .client
            .get(self.url("api/admin/orders/")?)
            .header(AUTHORIZATION, token.authorization_header());
        let body = self.execute(request).await?;
        let orders: OrderList = Self::parse(&body)?;
        Ok(orders.into())
    }

    /// Add a product to the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is rejected or the request fails.
    #[instrument(skip(self, token, product), fields(name = %product.name))]
    pub async fn add_product(
        &self,
        token: &SessionToken,
        product: &NewProduct,
    ) -> Result<(), ApiError> {
        self.send_json(
            reqwest::Method::POST,
            "api/admin/products/add/",
            Some(token),
            product,
        )
        .await?;
        self.invalidate_catalog();
        Ok(())
    }

    /// Apply a partial update to a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the update is rejected or the request fails.
    #[instrument(skip(self, token, update), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        token: &SessionToken,
        id: ProductId,
        update: &ProductUpdate,
    ) -> Result<(), ApiError> {
        self.send_json(
            reqwest::Method::PUT,
            &format!("api/admin/products/update/{id}/"),
            Some(token),
            update,
        )
        .await?;
        self.invalidate_catalog();
        Ok(())
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist or the request fails.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn delete_product(&self, token: &SessionToken, id: ProductId) -> Result<(), ApiError> {
        let request = self
            .inner
            .client
            .delete(self.url(&format!("api/admin/products/delete/{id}/"))?)
            .header(AUTHORIZATION, token.authorization_header());
        self.execute(request).await?;
        self.invalidate_catalog();
        Ok(())
    }

    /// Change the status of an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the status is rejected or the request fails.
    #[instrument(skip(self, token), fields(order_id = %id, status = %status))]
    pub async fn update_order_status(
        &self,
        token: &SessionToken,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<(), ApiError> {
        self.send_json(
            reqwest::Method::PUT,
            &format!("api/admin/orders/update/{id}/"),
            Some(token),
            &OrderStatusUpdate { status },
        )
        .await
        .map(|_| ())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        let config = ApiConfig::with_base_url(Url::parse("http://127.0.0.1:8000/").unwrap());
        ApiClient::new(&config).unwrap()
    }

    #[test]
    fn test_url_joins_relative_paths() {
        let client = client();
        assert_eq!(
            client.url("api/products/7/").unwrap().as_str(),
            "http://127.0.0.1:8000/api/products/7/"
        );
    }

    #[test]
    fn test_url_keeps_base_path_prefix() {
        let config =
            ApiConfig::with_base_url(Url::parse("https://shop.example.in/backend/").unwrap());
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(
            client.url("api/orders/create/").unwrap().as_str(),
            "https://shop.example.in/backend/api/orders/create/"
        );
    }

    #[tokio::test]
    async fn test_invalidate_catalog_clears_cache() {
        let client = client();
        client
            .inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(Arc::new(Vec::new())))
            .await;
        client.invalidate_catalog();
        assert!(client.inner.cache.get(&CacheKey::Products).await.is_none());
    }
}
