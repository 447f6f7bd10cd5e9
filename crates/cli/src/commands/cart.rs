//! Cart commands.

use mobile_shop_core::ProductId;
use mobile_shop_storefront::cart::QuantityChange;
use mobile_shop_storefront::state::AppState;

use super::{CliError, emit};

/// Print the cart badge, lines, and total.
///
/// # Errors
///
/// Returns an error if rendering fails.
pub fn show(state: &AppState) -> Result<(), CliError> {
    let cart = state.renderer().render_cart()?;
    if let Some(badge) = cart.badge {
        emit(&badge);
    }
    emit(&cart.items);
    Ok(())
}

/// Add one unit of a product.
///
/// # Errors
///
/// Returns `UnknownProduct` if the id is not in the catalog, or an error if
/// the cart cannot be saved.
pub fn add(state: &AppState, id: ProductId) -> Result<(), CliError> {
    if state.cart().add(id, None)?.is_none() {
        return Err(CliError::UnknownProduct(id));
    }
    show(state)
}

/// Remove a product's line.
///
/// # Errors
///
/// Returns an error if the cart cannot be saved.
pub fn remove(state: &AppState, id: ProductId) -> Result<(), CliError> {
    if state.cart().remove(id)? {
        state.notifier().info(format!("Removed product {id} from cart"));
    } else {
        state.notifier().info(format!("Product {id} was not in the cart"));
    }
    show(state)
}

/// Change a line's quantity by `delta`.
///
/// # Errors
///
/// Returns an error if the cart cannot be saved.
pub fn update(state: &AppState, id: ProductId, delta: i64) -> Result<(), CliError> {
    match state.cart().update_quantity(id, delta)? {
        QuantityChange::Missing => {
            state.notifier().info(format!("Product {id} is not in the cart"));
        }
        QuantityChange::Removed => {
            state.notifier().info(format!("Removed product {id} from cart"));
        }
        QuantityChange::Updated(_) => {}
    }
    show(state)
}
