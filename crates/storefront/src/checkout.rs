//! The order submitter.
//!
//! Turns the cart and the logged-in user into one `POST /api/orders`
//! request. At most one submission runs at a time per submitter; the state
//! moves `Idle -> Submitting -> Succeeded | Failed`, and `Failed` behaves
//! like `Idle` for the next attempt.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use thiserror::Error;
use tracing::{error, info, instrument};

use mobile_shop_core::{CartLine, Navigation, OrderId, Price};

use crate::api::{ApiError, OrderRequest, ShopApiClient};
use crate::cart::CartStore;
use crate::error::{AppError, add_breadcrumb};
use crate::notify::Notifier;
use crate::session::SessionStore;

const EMPTY_CART_MESSAGE: &str = "Your cart is empty!";
const LOGIN_REQUIRED_MESSAGE: &str = "Please login to complete your order!";
const SUBMISSION_FAILED_MESSAGE: &str = "Failed to process order. Please try again.";

/// Where the submitter is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutState {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// Why a checkout did not produce an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Checkout already in progress")]
    InProgress,

    #[error("Order submission failed: {0}")]
    Submission(#[from] ApiError),
}

impl CheckoutError {
    /// Blocking message for the user.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::EmptyCart => EMPTY_CART_MESSAGE,
            Self::NotLoggedIn => LOGIN_REQUIRED_MESSAGE,
            Self::InProgress => "Your order is already being processed.",
            Self::Submission(_) => SUBMISSION_FAILED_MESSAGE,
        }
    }

    /// Where to send the user, if anywhere.
    #[must_use]
    pub const fn navigation(&self) -> Option<Navigation> {
        match self {
            Self::NotLoggedIn => Some(Navigation::Login),
            _ => None,
        }
    }
}

/// A navigation to perform once `after` has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect {
    pub target: Navigation,
    pub after: Duration,
}

/// Summary of a placed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutReceipt {
    pub order_id: OrderId,
    pub order_number: Option<String>,
    /// Cart total at submission.
    pub total: Price,
    /// Total the backend charged, when it reported one.
    pub backend_total: Option<Price>,
    pub redirect: Redirect,
}

impl CheckoutReceipt {
    /// Confirmation text shown before the redirect.
    #[must_use]
    pub fn confirmation_message(&self) -> String {
        format!(
            "Thank you for your order!\n\nOrder ID: {}\nTotal: ${}\n\nYour order has been placed successfully.",
            self.order_id,
            self.total.to_fixed()
        )
    }
}

/// Submits the cart as an order.
///
/// Cheaply cloneable; clones share the in-progress guard.
#[derive(Clone)]
pub struct OrderSubmitter {
    inner: Arc<OrderSubmitterInner>,
}

struct OrderSubmitterInner {
    client: ShopApiClient,
    cart: CartStore,
    sessions: SessionStore,
    notifier: Notifier,
    redirect_delay: Duration,
    state: Mutex<CheckoutState>,
}

/// Leaves `Submitting` when dropped, so a cancelled submission does not
/// block the next one.
struct SubmissionGuard<'a> {
    state: &'a Mutex<CheckoutState>,
    outcome: CheckoutState,
}

impl SubmissionGuard<'_> {
    fn finish(mut self, outcome: CheckoutState) {
        self.outcome = outcome;
    }
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = self.outcome;
    }
}

impl OrderSubmitter {
    #[must_use]
    pub fn new(
        client: ShopApiClient,
        cart: CartStore,
        sessions: SessionStore,
        notifier: Notifier,
        redirect_delay: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(OrderSubmitterInner {
                client,
                cart,
                sessions,
                notifier,
                redirect_delay,
                state: Mutex::new(CheckoutState::Idle),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CheckoutState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> CheckoutState {
        *self.lock()
    }

    /// Refuse with a blocking message, leaving the state untouched.
    fn refuse(&self, err: CheckoutError) -> CheckoutError {
        self.inner.notifier.error(err.user_message());
        info!(reason = %err, "Checkout refused");
        err
    }

    /// Place an order for everything in the cart.
    ///
    /// On success the cart is cleared and the receipt carries a redirect to
    /// the order history. On failure the cart is left as it was.
    ///
    /// # Errors
    ///
    /// - `EmptyCart` / `NotLoggedIn` before any request is made
    /// - `InProgress` while another checkout on this submitter is running
    /// - `Submission` when the backend rejects or cannot be reached
    #[instrument(skip(self))]
    pub async fn checkout(&self) -> Result<CheckoutReceipt, CheckoutError> {
        let (guard, lines, session) = {
            let mut state = self.lock();
            if *state == CheckoutState::Submitting {
                return Err(self.refuse(CheckoutError::InProgress));
            }

            let lines = self.inner.cart.lines();
            if lines.is_empty() {
                return Err(self.refuse(CheckoutError::EmptyCart));
            }
            let Some(session) = self.inner.sessions.current() else {
                return Err(self.refuse(CheckoutError::NotLoggedIn));
            };

            *state = CheckoutState::Submitting;
            let guard = SubmissionGuard {
                state: &self.inner.state,
                outcome: CheckoutState::Idle,
            };
            (guard, lines, session)
        };

        let request = OrderRequest::new(&lines, &session.user);
        let cart_total: Price = lines.iter().map(CartLine::line_total).sum();
        add_breadcrumb("checkout", "Submitting order", None);

        match self.inner.client.create_order(&request, &session.token).await {
            Ok(receipt) => {
                // The order exists now; a failed clear must not invite a resubmit.
                if let Err(e) = self.inner.cart.clear() {
                    AppError::from(e).report();
                }
                guard.finish(CheckoutState::Succeeded);

                let receipt = CheckoutReceipt {
                    order_id: receipt.order_id,
                    order_number: receipt.order_number,
                    total: cart_total,
                    backend_total: receipt.total_amount,
                    redirect: Redirect {
                        target: Navigation::OrderHistory,
                        after: self.inner.redirect_delay,
                    },
                };
                info!(order_id = %receipt.order_id, total = %receipt.total, "Order placed");
                self.inner.notifier.success(receipt.confirmation_message());
                Ok(receipt)
            }
            Err(e) => {
                guard.finish(CheckoutState::Failed);
                error!(error = %e, "Error submitting order");
                self.inner.notifier.error(SUBMISSION_FAILED_MESSAGE);
                Err(CheckoutError::Submission(e))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{Value, json};
    use tokio::sync::Notify;

    use mobile_shop_core::{ProductId, User};

    use super::*;
    use crate::catalog::CatalogLoader;
    use crate::storage::{Persistence, keys};
    use crate::test_support::{spawn_backend, unreachable_url};

    #[derive(Clone, Default)]
    struct Backend {
        calls: Arc<AtomicUsize>,
        last_body: Arc<Mutex<Option<Value>>>,
        last_auth: Arc<Mutex<Option<String>>>,
        fail: bool,
        release: Option<Arc<Notify>>,
    }

    async fn create_order(
        State(backend): State<Backend>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        backend.calls.fetch_add(1, Ordering::SeqCst);
        *backend.last_body.lock().unwrap() = Some(body);
        *backend.last_auth.lock().unwrap() = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        if let Some(release) = &backend.release {
            release.notified().await;
        }
        if backend.fail {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to create order"})),
            );
        }
        (
            StatusCode::CREATED,
            Json(json!({
                "message": "Order created successfully",
                "order_id": 42,
                "order_number": "ORD-2024-042",
                "total_amount": 1098
            })),
        )
    }

    struct Fixture {
        persistence: Persistence,
        cart: CartStore,
        sessions: SessionStore,
        notifier: Notifier,
        submitter: OrderSubmitter,
    }

    fn fixture(client: ShopApiClient) -> Fixture {
        let persistence = Persistence::in_memory();
        let notifier = Notifier::default();
        let catalog = CatalogLoader::new(ShopApiClient::new(unreachable_url()));
        catalog.use_fallback();
        let cart = CartStore::open(persistence.clone(), catalog, notifier.clone());
        let sessions = SessionStore::new(persistence.clone());
        let submitter = OrderSubmitter::new(
            client,
            cart.clone(),
            sessions.clone(),
            notifier.clone(),
            Duration::from_millis(1000),
        );
        Fixture {
            persistence,
            cart,
            sessions,
            notifier,
            submitter,
        }
    }

    async fn fixture_with(backend: &Backend) -> Fixture {
        let router = Router::new()
            .route("/api/orders", post(create_order))
            .with_state(backend.clone());
        fixture(ShopApiClient::new(spawn_backend(router).await))
    }

    fn log_in(sessions: &SessionStore) {
        let user: User = serde_json::from_value(json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com"
        }))
        .unwrap();
        sessions.save(&user, "tok-123").unwrap();
    }

    #[tokio::test]
    async fn test_empty_cart_makes_no_request() {
        let backend = Backend::default();
        let f = fixture_with(&backend).await;
        log_in(&f.sessions);

        let err = f.submitter.checkout().await.unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
        assert_eq!(err.user_message(), "Your cart is empty!");
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
        assert_eq!(f.submitter.state(), CheckoutState::Idle);
        assert!(
            f.notifier
                .active()
                .iter()
                .any(|n| n.message == "Your cart is empty!")
        );
    }

    #[tokio::test]
    async fn test_missing_session_redirects_to_login() {
        let backend = Backend::default();
        let f = fixture_with(&backend).await;
        f.cart.add(ProductId::new(1), None).unwrap();

        let err = f.submitter.checkout().await.unwrap_err();
        assert!(matches!(err, CheckoutError::NotLoggedIn));
        assert_eq!(err.navigation(), Some(Navigation::Login));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
        assert_eq!(f.cart.item_count(), 1);
    }

    #[tokio::test]
    async fn test_successful_checkout_clears_cart() {
        let backend = Backend::default();
        let f = fixture_with(&backend).await;
        log_in(&f.sessions);
        f.cart.add(ProductId::new(1), None).unwrap();

        let receipt = f.submitter.checkout().await.unwrap();

        assert_eq!(receipt.order_id, OrderId::new(42));
        assert_eq!(receipt.total, Price::from_units(999));
        assert_eq!(receipt.backend_total, Some(Price::from_units(1098)));
        assert_eq!(
            receipt.redirect,
            Redirect {
                target: Navigation::OrderHistory,
                after: Duration::from_millis(1000),
            }
        );
        assert!(receipt.confirmation_message().contains("Order ID: 42"));
        assert!(receipt.confirmation_message().contains("Total: $999.00"));

        assert_eq!(
            backend.last_body.lock().unwrap().clone().unwrap(),
            json!({
                "items": [{"id": 1, "quantity": 1}],
                "customer_name": "Ada Lovelace",
                "customer_email": "ada@example.com"
            })
        );
        assert_eq!(
            backend.last_auth.lock().unwrap().as_deref(),
            Some("Bearer tok-123")
        );

        assert!(f.cart.is_empty());
        assert!(f.persistence.get_raw(keys::CART).unwrap().is_none());
        assert_eq!(f.submitter.state(), CheckoutState::Succeeded);
    }

    #[tokio::test]
    async fn test_failed_checkout_keeps_cart_and_allows_retry() {
        let failing = Backend {
            fail: true,
            ..Backend::default()
        };
        let f = fixture_with(&failing).await;
        log_in(&f.sessions);
        f.cart.add(ProductId::new(2), None).unwrap();
        f.cart.add(ProductId::new(2), None).unwrap();
        let persisted = f.persistence.get_raw(keys::CART).unwrap();

        let err = f.submitter.checkout().await.unwrap_err();
        assert!(matches!(err, CheckoutError::Submission(_)));
        assert_eq!(
            err.user_message(),
            "Failed to process order. Please try again."
        );
        assert_eq!(f.submitter.state(), CheckoutState::Failed);
        assert_eq!(f.cart.item_count(), 2);
        assert_eq!(f.persistence.get_raw(keys::CART).unwrap(), persisted);

        // Failed behaves like Idle: a second attempt reaches the backend.
        let _ = f.submitter.checkout().await;
        assert_eq!(failing.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unreachable_backend_fails() {
        let f = fixture(ShopApiClient::new(unreachable_url()));
        log_in(&f.sessions);
        f.cart.add(ProductId::new(3), None).unwrap();

        let err = f.submitter.checkout().await.unwrap_err();
        assert!(matches!(err, CheckoutError::Submission(ApiError::Http(_))));
        assert!(!f.cart.is_empty());
    }

    #[tokio::test]
    async fn test_reentrant_checkout_rejected() {
        let release = Arc::new(Notify::new());
        let backend = Backend {
            release: Some(release.clone()),
            ..Backend::default()
        };
        let f = fixture_with(&backend).await;
        log_in(&f.sessions);
        f.cart.add(ProductId::new(1), None).unwrap();

        let first = tokio::spawn({
            let submitter = f.submitter.clone();
            async move { submitter.checkout().await }
        });
        while f.submitter.state() != CheckoutState::Submitting {
            tokio::task::yield_now().await;
        }

        let err = f.submitter.checkout().await.unwrap_err();
        assert!(matches!(err, CheckoutError::InProgress));
        assert!(
            f.notifier
                .active()
                .iter()
                .any(|n| n.message == "Your order is already being processed.")
        );

        release.notify_one();
        first.await.unwrap().unwrap();
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
        assert_eq!(f.submitter.state(), CheckoutState::Succeeded);
    }

    #[tokio::test]
    async fn test_cancelled_checkout_returns_to_idle() {
        let backend = Backend {
            release: Some(Arc::new(Notify::new())),
            ..Backend::default()
        };
        let f = fixture_with(&backend).await;
        log_in(&f.sessions);
        f.cart.add(ProductId::new(1), None).unwrap();

        let pending = tokio::time::timeout(Duration::from_millis(50), f.submitter.checkout()).await;
        assert!(pending.is_err());
        assert_eq!(f.submitter.state(), CheckoutState::Idle);
        assert!(!f.cart.is_empty());
    }
}
