//! Display data handed to templates.
//!
//! Everything is pre-formatted so templates only place strings.

use mobile_shop_core::{CartLine, Navigation, Product};

/// Product card display data.
#[derive(Debug, Clone)]
pub struct ProductCard {
    pub id: i64,
    pub name: String,
    pub brand: String,
    pub storage: String,
    pub color: String,
    /// `brand · storage · color`, skipping blanks.
    pub specs: String,
    pub description: String,
    pub price: String,
    pub image: String,
    pub detail_href: String,
    pub in_cart: bool,
}

impl ProductCard {
    pub(crate) fn new(product: &Product, in_cart: bool) -> Self {
        let specs = [&product.brand, &product.storage, &product.color]
            .into_iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" · ");

        Self {
            id: product.id.as_i64(),
            name: product.name.clone(),
            brand: product.brand.clone(),
            storage: product.storage.clone(),
            color: product.color.clone(),
            specs,
            description: product.description.clone(),
            price: product.price.to_string(),
            image: product.image.clone(),
            detail_href: Navigation::ProductDetail(product.id).path(),
            in_cart,
        }
    }
}

/// Cart line display data.
#[derive(Debug, Clone)]
pub struct CartLineView {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id.as_i64(),
            name: line.name.clone(),
            image: line.image.clone(),
            quantity: line.quantity,
            unit_price: line.price.to_string(),
            line_total: line.line_total().to_string(),
        }
    }
}
