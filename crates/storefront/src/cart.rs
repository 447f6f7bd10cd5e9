//! The cart store.
//!
//! An ordered list of [`CartLine`]s (insertion order), at most one per
//! product id, mirrored to the `cart` storage key after every mutation.
//! Every mutation also publishes a fresh snapshot on a `watch` channel so
//! whatever renders the cart can redisplay it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::{error, warn};

use mobile_shop_core::{CartLine, Price, Product, ProductId};

use crate::catalog::CatalogLoader;
use crate::error::add_breadcrumb;
use crate::notify::Notifier;
use crate::storage::{Persistence, StorageError, keys};

/// Result of [`CartStore::update_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// No line for that product; nothing happened.
    Missing,
    /// Quantity dropped to zero or below and the line was removed.
    Removed,
    /// Line kept with the new quantity.
    Updated(u32),
}

/// Shopping cart owned by one session.
///
/// Cheaply cloneable; clones share the same lines.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    lines: Mutex<Vec<CartLine>>,
    persistence: Persistence,
    catalog: CatalogLoader,
    notifier: Notifier,
    changes: watch::Sender<Vec<CartLine>>,
}

impl CartStore {
    /// Open the cart, restoring whatever was last persisted.
    ///
    /// An unreadable or malformed snapshot starts an empty cart.
    #[must_use]
    pub fn open(persistence: Persistence, catalog: CatalogLoader, notifier: Notifier) -> Self {
        let lines = match persistence.get_json::<Vec<CartLine>>(keys::CART) {
            Ok(Some(lines)) => sanitize(lines),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read persisted cart, starting empty");
                Vec::new()
            }
        };
        let (changes, _) = watch::channel(lines.clone());

        Self {
            inner: Arc::new(CartStoreInner {
                lines: Mutex::new(lines),
                persistence,
                catalog,
                notifier,
                changes,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<CartLine>> {
        self.inner.lines.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Persist `lines` and publish them to subscribers.
    ///
    /// Called with the lock held so the snapshot written is exactly the one
    /// in memory.
    fn commit(&self, lines: &[CartLine]) -> Result<(), StorageError> {
        let result = self.inner.persistence.set_json(keys::CART, lines);
        self.inner.changes.send_replace(lines.to_vec());
        if let Err(e) = &result {
            error!(error = %e, "Failed to persist cart");
        }
        result
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add one unit of a product.
    ///
    /// Details come from `product` when given, otherwise from the loaded
    /// catalog. An unknown product, or data for a different id, is logged
    /// and ignored (`Ok(None)`).
    ///
    /// # Errors
    ///
    /// Returns an error if the cart could not be persisted; the in-memory
    /// cart is updated regardless.
    pub fn add(
        &self,
        product_id: ProductId,
        product: Option<&Product>,
    ) -> Result<Option<CartLine>, StorageError> {
        let resolved = match product {
            Some(product) => Some(product.clone()),
            None => self.inner.catalog.find(product_id),
        };
        let Some(product) = resolved else {
            error!(%product_id, "Product not found");
            return Ok(None);
        };
        if product.id != product_id {
            error!(%product_id, data_id = %product.id, "Product data does not match id");
            return Ok(None);
        }

        let mut lines = self.lock();
        let line = if let Some(existing) = lines.iter_mut().find(|l| l.id == product_id) {
            existing.quantity = existing.quantity.saturating_add(1);
            existing.clone()
        } else {
            let line = CartLine::from(&product);
            lines.push(line.clone());
            line
        };
        let result = self.commit(&lines);
        drop(lines);

        add_breadcrumb(
            "cart",
            "Added to cart",
            Some(&[("product_id", &product_id.to_string())]),
        );
        self.inner
            .notifier
            .success(format!("{} added to cart!", product.name));

        result.map(|()| Some(line))
    }

    /// Remove a product's line. Returns whether a line was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart could not be persisted.
    pub fn remove(&self, product_id: ProductId) -> Result<bool, StorageError> {
        let mut lines = self.lock();
        let before = lines.len();
        lines.retain(|l| l.id != product_id);
        let removed = lines.len() != before;
        let result = self.commit(&lines);
        drop(lines);

        if removed {
            add_breadcrumb(
                "cart",
                "Removed from cart",
                Some(&[("product_id", &product_id.to_string())]),
            );
        }
        result.map(|()| removed)
    }

    /// Change a line's quantity by `delta`; a result of zero or less removes it.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart could not be persisted.
    pub fn update_quantity(
        &self,
        product_id: ProductId,
        delta: i64,
    ) -> Result<QuantityChange, StorageError> {
        let mut lines = self.lock();
        let Some(position) = lines.iter().position(|l| l.id == product_id) else {
            return Ok(QuantityChange::Missing);
        };

        let current = lines.get(position).map_or(0, |l| i64::from(l.quantity));
        let next = current.saturating_add(delta);
        let change = if next <= 0 {
            lines.remove(position);
            QuantityChange::Removed
        } else {
            let quantity = u32::try_from(next).unwrap_or(u32::MAX);
            if let Some(line) = lines.get_mut(position) {
                line.quantity = quantity;
            }
            QuantityChange::Updated(quantity)
        };

        self.commit(&lines).map(|()| change)
    }

    /// Empty the cart and drop its persisted snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot could not be removed.
    pub fn clear(&self) -> Result<(), StorageError> {
        let mut lines = self.lock();
        lines.clear();
        let result = self.inner.persistence.remove(keys::CART);
        self.inner.changes.send_replace(Vec::new());
        drop(lines);

        if let Err(e) = &result {
            error!(error = %e, "Failed to remove persisted cart");
        }
        result
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Snapshot of the lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        self.lock().clone()
    }

    /// Sum of `price * quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lock().iter().map(CartLine::line_total).sum()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lock()
            .iter()
            .fold(0_u32, |sum, l| sum.saturating_add(l.quantity))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.lock().iter().any(|l| l.id == product_id)
    }

    /// Receiver that changes after every mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<CartLine>> {
        self.inner.changes.subscribe()
    }
}

/// Restore the one-line-per-product, quantity-at-least-one shape of a
/// snapshot written by something other than this store.
fn sanitize(lines: Vec<CartLine>) -> Vec<CartLine> {
    let mut clean: Vec<CartLine> = Vec::with_capacity(lines.len());
    for line in lines.into_iter().filter(|l| l.quantity > 0) {
        if let Some(existing) = clean.iter_mut().find(|l| l.id == line.id) {
            existing.quantity = existing.quantity.saturating_add(line.quantity);
        } else {
            clean.push(line);
        }
    }
    clean
}
