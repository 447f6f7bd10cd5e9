//! Integration tests for the Mobile Shop client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p mobile-shop-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog_loading` - Remote catalog, fallback, and rendering
//! - `checkout_flow` - Login, cart, and order submission end to end
//! - `persistence` - Cart and session surviving a restart on disk
//!
//! Every test talks to a [`MockBackend`]: an axum server on an ephemeral
//! local port that serves the shop's JSON API and records what it received.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use url::Url;

use mobile_shop_storefront::config::ShopConfig;

/// Password the mock login accepts for any email.
pub const PASSWORD: &str = "correct horse";

/// Token the mock login issues.
pub const TOKEN: &str = "mock-token-1";

/// How `GET /api/products` answers.
#[derive(Debug, Clone)]
pub enum ProductsResponse {
    /// 200 with this JSON body.
    Json(Value),
    /// This status with an error body.
    Status(u16),
    /// 200 with a body that is not JSON.
    Garbage,
}

/// Two phones that are not in the built-in catalog.
#[must_use]
pub fn remote_products() -> Value {
    json!([
        {
            "id": 101, "name": "Nothing Phone 2", "price": 599,
            "image": "/images/nothing-phone-2.png",
            "description": "Glyph interface and clean Android",
            "brand": "Nothing", "storage": "256GB", "color": "Dark Grey"
        },
        {
            "id": 102, "name": "Sony Xperia 1 V", "price": 1199.5,
            "image": "https://cdn.example.com/xperia.png",
            "description": "4K display for creators",
            "brand": "Sony", "storage": "256GB", "color": "Black"
        }
    ])
}

/// In-process stand-in for the shop backend.
#[derive(Clone)]
pub struct MockBackend {
    url: Url,
    state: Arc<MockState>,
}

struct MockState {
    products: Mutex<ProductsResponse>,
    orders: Mutex<Vec<Value>>,
    order_auth: Mutex<Vec<Option<String>>>,
    product_calls: AtomicUsize,
    order_calls: AtomicUsize,
    fail_orders: AtomicBool,
}

impl MockBackend {
    /// Start a backend serving [`remote_products`].
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn start() -> std::io::Result<Self> {
        let state = Arc::new(MockState {
            products: Mutex::new(ProductsResponse::Json(remote_products())),
            orders: Mutex::new(Vec::new()),
            order_auth: Mutex::new(Vec::new()),
            product_calls: AtomicUsize::new(0),
            order_calls: AtomicUsize::new(0),
            fail_orders: AtomicBool::new(false),
        });

        let router = Router::new()
            .route("/api/products", get(list_products))
            .route("/api/products/{id}", get(get_product))
            .route("/api/orders", post(create_order))
            .route("/api/auth/login", post(login))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        let url = Url::parse(&format!("http://{addr}/"))
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
        Ok(Self { url, state })
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Client configuration pointing at this backend with no redirect delay.
    #[must_use]
    pub fn config(&self) -> ShopConfig {
        let mut config = ShopConfig::new(self.url.clone());
        config.redirect_delay = std::time::Duration::ZERO;
        config
    }

    pub fn set_products(&self, response: ProductsResponse) {
        *lock(&self.state.products) = response;
    }

    pub fn fail_orders(&self, fail: bool) {
        self.state.fail_orders.store(fail, Ordering::SeqCst);
    }

    /// Bodies of every accepted or rejected order request, in arrival order.
    #[must_use]
    pub fn orders(&self) -> Vec<Value> {
        lock(&self.state.orders).clone()
    }

    /// `Authorization` header of every order request.
    #[must_use]
    pub fn order_auth(&self) -> Vec<Option<String>> {
        lock(&self.state.order_auth).clone()
    }

    #[must_use]
    pub fn product_calls(&self) -> usize {
        self.state.product_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn order_calls(&self) -> usize {
        self.state.order_calls.load(Ordering::SeqCst)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// Handlers
// =============================================================================

async fn list_products(State(state): State<Arc<MockState>>) -> Response {
    state.product_calls.fetch_add(1, Ordering::SeqCst);
    let response = lock(&state.products).clone();
    match response {
        ProductsResponse::Json(body) => Json(body).into_response(),
        ProductsResponse::Status(code) => (
            StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Json(json!({"error": "Failed to fetch products"})),
        )
            .into_response(),
        ProductsResponse::Garbage => "<html>maintenance</html>".into_response(),
    }
}

async fn get_product(State(state): State<Arc<MockState>>, Path(id): Path<i64>) -> Response {
    let products = match lock(&state.products).clone() {
        ProductsResponse::Json(Value::Array(products)) => products,
        _ => Vec::new(),
    };
    products
        .into_iter()
        .find(|p| p["id"] == id)
        .map_or_else(
            || (StatusCode::NOT_FOUND, Json(json!({"error": "Product not found"}))).into_response(),
            |p| Json(p).into_response(),
        )
}

async fn create_order(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let order_number = state.order_calls.fetch_add(1, Ordering::SeqCst) + 1;
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    lock(&state.order_auth).push(auth.clone());
    lock(&state.orders).push(body);

    let expected = format!("Bearer {TOKEN}");
    if auth.as_deref() != Some(expected.as_str()) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "Unauthorized"}))).into_response();
    }
    if state.fail_orders.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Failed to create order"})),
        )
            .into_response();
    }

    (
        StatusCode::CREATED,
        Json(json!({
            "message": "Order created successfully",
            "order_id": order_number,
            "order_number": format!("ORD-2024-{order_number:03}"),
        })),
    )
        .into_response()
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] != PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Invalid credentials"})),
        )
            .into_response();
    }
    Json(json!({
        "user": {
            "id": 1,
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": body["email"],
            "phone": "+44 20 7946 0000"
        },
        "token": TOKEN
    }))
    .into_response()
}
