//! Catalog browsing commands.

use mobile_shop_core::{Price, ProductId};
use mobile_shop_storefront::api::ApiError;
use mobile_shop_storefront::catalog::{CatalogFilter, CatalogSource};
use mobile_shop_storefront::state::AppState;

use super::{CliError, emit};

/// List products, optionally narrowed by query, brand, and price range.
///
/// # Errors
///
/// Returns an error if rendering fails.
pub fn list(
    state: &AppState,
    query: Option<String>,
    brand: Option<String>,
    min_price: Option<Price>,
    max_price: Option<Price>,
) -> Result<(), CliError> {
    if state.catalog().source() == CatalogSource::Fallback {
        state
            .notifier()
            .info("Shop backend unavailable, showing the built-in catalog");
    }
    let filter = CatalogFilter {
        query,
        brand,
        min_price,
        max_price,
    };
    emit(&state.renderer().render_filtered(&filter)?);
    Ok(())
}

/// Show one product in detail.
///
/// # Errors
///
/// Returns `UnknownProduct` if neither the catalog nor the backend knows
/// the id, or the backend error if the lookup itself failed.
pub async fn show(state: &AppState, id: ProductId) -> Result<(), CliError> {
    let product = match state.catalog().fetch_detail(id).await {
        Ok(product) => product,
        Err(ApiError::NotFound(_)) => return Err(CliError::UnknownProduct(id)),
        Err(e) => return Err(e.into()),
    };
    emit(&state.renderer().render_product_detail(&product)?);
    Ok(())
}

/// List the distinct brands in the catalog.
pub fn brands(state: &AppState) {
    emit(&state.catalog().brands().join("\n"));
}
