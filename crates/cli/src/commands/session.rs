//! Login, logout, and status.

use secrecy::SecretString;

use mobile_shop_storefront::catalog::CatalogSource;
use mobile_shop_storefront::state::AppState;

use super::{CliError, emit};

/// Log in and remember the session.
///
/// # Errors
///
/// Returns an error if the credentials are rejected or the session cannot
/// be stored.
pub async fn login(state: &AppState, email: &str, password: &SecretString) -> Result<(), CliError> {
    state.login(email, password).await?;
    emit(&state.renderer().render_nav()?);
    Ok(())
}

/// Forget the session.
///
/// # Errors
///
/// Returns an error if the stored session cannot be removed.
pub fn logout(state: &AppState) -> Result<(), CliError> {
    let target = state.sessions().logout()?;
    state.notifier().info("You have been logged out");
    emit(&format!("-> {}", target.path()));
    Ok(())
}

/// Who is logged in, what is in the cart, and where the catalog came from.
///
/// # Errors
///
/// Returns an error if rendering fails.
pub fn status(state: &AppState) -> Result<(), CliError> {
    emit(&state.renderer().render_nav()?);

    let cart = state.renderer().render_cart()?;
    emit(cart.badge.as_deref().unwrap_or("Cart is empty"));

    let source = match state.catalog().source() {
        CatalogSource::Remote => format!("Catalog: {}", state.config().api_base_url),
        CatalogSource::Fallback => "Catalog: built-in (backend unavailable)".to_string(),
        CatalogSource::Unloaded => "Catalog: not loaded".to_string(),
    };
    emit(&source);
    Ok(())
}
