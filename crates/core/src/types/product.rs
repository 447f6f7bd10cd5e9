//! Catalog products and cart lines.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A phone listed in the catalog.
///
/// Products are read-only from the client's perspective; identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Absolute URL or a path relative to the backend.
    pub image: String,
    pub description: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub storage: String,
    #[serde(default)]
    pub color: String,
}

impl Product {
    /// Case-insensitive substring match over name, brand, and description.
    ///
    /// `needle` must already be lowercased.
    #[must_use]
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.brand.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

/// One product's entry in the cart.
///
/// Serialized field-for-field into the persisted `cart` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// References [`Product::id`].
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image: String,
    /// Always at least 1 while the line exists.
    pub quantity: u32,
}

impl CartLine {
    /// `price * quantity` for this line.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price * self.quantity
    }
}

impl From<&Product> for CartLine {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            quantity: 1,
        }
    }
}
