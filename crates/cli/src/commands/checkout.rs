//! Order placement.

use mobile_shop_storefront::state::AppState;

use super::{CliError, emit, flush_notifications};

/// Submit the cart as an order, then follow the redirect.
///
/// # Errors
///
/// Returns the checkout refusal or failure; the cart is untouched in that
/// case.
pub async fn run(state: &AppState) -> Result<(), CliError> {
    match state.submitter().checkout().await {
        Ok(receipt) => {
            flush_notifications(state)?;
            tokio::time::sleep(receipt.redirect.after).await;
            emit(&format!("-> {}", receipt.redirect.target.path()));
            Ok(())
        }
        Err(e) => {
            if let Some(target) = e.navigation() {
                flush_notifications(state)?;
                emit(&format!("-> {}", target.path()));
            }
            Err(e.into())
        }
    }
}
