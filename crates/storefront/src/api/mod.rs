//! HTTP client for the shop backend.
//!
//! # Endpoints
//!
//! - `GET /api/products` - full catalog
//! - `GET /api/products/{id}` - single product (404 when unknown)
//! - `POST /api/orders` - create an order (bearer token required)
//! - `POST /api/auth/login` - exchange credentials for a user and token
//!
//! No retries and no timeouts: every call is a single request whose failure
//! the caller decides how to degrade.

mod types;

use std::sync::Arc;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use mobile_shop_core::{Product, ProductId};

pub use types::{LoginResponse, OrderItem, OrderReceipt, OrderRequest};

/// Errors that can occur when talking to the shop backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection refused, reset, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Client for the shop backend's JSON API.
#[derive(Clone)]
pub struct ShopApiClient {
    inner: Arc<ShopApiClientInner>,
}

struct ShopApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for ShopApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ShopApiClient {
    /// Create a client for the backend at `base_url`.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            inner: Arc::new(ShopApiClientInner {
                client: reqwest::Client::new(),
                base_url,
            }),
        }
    }

    /// The backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// Check the status and decode a JSON body.
    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Shop backend returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse shop backend response"
            );
            ApiError::Parse(e)
        })
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Fetch the whole catalog.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, non-success status, or an
    /// undecodable body.
    #[instrument(skip(self))]
    pub async fn get_products(&self) -> Result<Vec<Product>, ApiError> {
        let url = self.endpoint("api/products")?;
        let response = self.inner.client.get(url).send().await?;
        let products: Vec<Product> = Self::read_json(response).await?;
        debug!(count = products.len(), "Fetched products");
        Ok(products)
    }

    /// Fetch a single product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for unknown ids, otherwise as
    /// [`ShopApiClient::get_products`].
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, ApiError> {
        let url = self.endpoint(&format!("api/products/{id}"))?;
        let response = self.inner.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(format!("product {id}")));
        }
        Self::read_json(response).await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Submit an order on behalf of the token's owner.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, non-success status, or an
    /// undecodable body.
    #[instrument(skip(self, order, token), fields(items = order.items.len()))]
    pub async fn create_order(
        &self,
        order: &OrderRequest,
        token: &SecretString,
    ) -> Result<OrderReceipt, ApiError> {
        let url = self.endpoint("api/orders")?;
        let response = self
            .inner
            .client
            .post(url)
            .bearer_auth(token.expose_secret())
            .json(order)
            .send()
            .await?;
        let receipt: OrderReceipt = Self::read_json(response).await?;
        debug!(order_id = %receipt.order_id, "Order created");
        Ok(receipt)
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Log in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with 401 for bad credentials, otherwise as
    /// [`ShopApiClient::get_products`].
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<LoginResponse, ApiError> {
        let url = self.endpoint("api/auth/login")?;
        let body = serde_json::json!({
            "email": email,
            "password": password.expose_secret(),
        });
        let response = self.inner.client.post(url).json(&body).send().await?;
        Self::read_json(response).await
    }
}
