//! Unified error handling with Sentry integration.
//!
//! Each module owns a `thiserror` enum; `AppError` unifies them for callers
//! that drive a whole page load. Infrastructure failures are captured to
//! Sentry by [`AppError::report`]; user-facing text comes from
//! [`AppError::user_message`] and never includes internals.

use thiserror::Error;

use crate::api::ApiError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Persistence read or write failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Backend request failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Checkout was refused or failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Template rendering failed.
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),
}

impl AppError {
    /// Whether this error points at a fault worth tracking rather than a
    /// normal user-facing refusal.
    #[must_use]
    pub const fn is_infrastructure(&self) -> bool {
        match self {
            Self::Config(_) | Self::Storage(_) | Self::Render(_) => true,
            Self::Api(e) => !matches!(e, ApiError::NotFound(_)),
            Self::Checkout(e) => matches!(e, CheckoutError::Submission(_)),
        }
    }

    /// Text safe to show the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Checkout(e) => e.user_message().to_string(),
            Self::Api(ApiError::NotFound(_)) => "Product not found".to_string(),
            Self::Api(ApiError::Status { status: 401, .. }) => "Invalid credentials".to_string(),
            Self::Api(_) => "The shop is unavailable right now. Please try again.".to_string(),
            Self::Storage(_) => "Could not save your changes".to_string(),
            Self::Config(e) => e.to_string(),
            Self::Render(_) => "Internal error".to_string(),
        }
    }

    /// Capture infrastructure errors to Sentry and log them.
    pub fn report(&self) {
        if self.is_infrastructure() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        } else {
            tracing::info!(error = %self, "Request refused");
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from the logged-in user's email.
///
/// Call this after successful login to associate errors with users.
pub fn set_sentry_user(email: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            email: Some(email.to_string()).filter(|e| !e.is_empty()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "3")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
