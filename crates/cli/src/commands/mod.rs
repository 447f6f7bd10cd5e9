//! Subcommand implementations.
//!
//! Every command runs against an already loaded [`AppState`] and writes its
//! rendered output to stdout; logs go to stderr.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod session;

use mobile_shop_core::ProductId;
use mobile_shop_storefront::checkout::CheckoutError;
use mobile_shop_storefront::error::AppError;
use mobile_shop_storefront::state::AppState;
use thiserror::Error;

/// Errors that end a command unsuccessfully.
#[derive(Debug, Error)]
pub enum CliError {
    /// Failure inside the shop client.
    #[error(transparent)]
    App(#[from] AppError),

    /// The product id is not in the catalog.
    #[error("Product not found: {0}")]
    UnknownProduct(ProductId),
}

impl CliError {
    /// Text for the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::App(e) => e.user_message(),
            Self::UnknownProduct(id) => format!("No product with id {id}"),
        }
    }

    /// Whether the user was already shown a notification for this error.
    #[must_use]
    pub const fn is_notified(&self) -> bool {
        matches!(self, Self::App(AppError::Checkout(_)))
    }

    /// Send infrastructure failures to Sentry.
    pub fn report(&self) {
        if let Self::App(e) = self {
            e.report();
        }
    }
}

impl From<CheckoutError> for CliError {
    fn from(err: CheckoutError) -> Self {
        Self::App(AppError::Checkout(err))
    }
}

impl From<askama::Error> for CliError {
    fn from(err: askama::Error) -> Self {
        Self::App(AppError::Render(err))
    }
}

impl From<mobile_shop_storefront::storage::StorageError> for CliError {
    fn from(err: mobile_shop_storefront::storage::StorageError) -> Self {
        Self::App(AppError::Storage(err))
    }
}

impl From<mobile_shop_storefront::api::ApiError> for CliError {
    fn from(err: mobile_shop_storefront::api::ApiError) -> Self {
        Self::App(AppError::Api(err))
    }
}

/// Write rendered output.
#[allow(clippy::print_stdout)]
pub fn emit(text: &str) {
    let text = text.trim_end();
    if !text.is_empty() {
        println!("{text}");
    }
}

/// Print whatever notifications the command raised.
///
/// # Errors
///
/// Returns an error if rendering fails.
pub fn flush_notifications(state: &AppState) -> Result<(), CliError> {
    emit(&state.renderer().render_notifications()?);
    for notification in state.notifier().active() {
        state.notifier().dismiss(notification.id);
    }
    Ok(())
}
