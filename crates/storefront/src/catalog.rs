//! The catalog loader.
//!
//! Holds the single in-memory copy of the product list. [`CatalogLoader::load`]
//! fetches it from the backend once per page load and falls back to a fixed
//! built-in list when the backend cannot deliver one.

use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use tracing::{info, instrument, warn};
use url::Url;

use mobile_shop_core::{Price, Product, ProductId};

use crate::api::{ApiError, ShopApiClient};

/// Where the current product list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    /// Nothing loaded yet.
    Unloaded,
    /// Fetched from the backend.
    Remote,
    /// Built-in list used after a failed fetch.
    Fallback,
}

/// Product subset selection.
///
/// Every criterion that is set must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    /// Case-insensitive substring over name, brand, and description.
    pub query: Option<String>,
    /// Case-insensitive exact brand.
    pub brand: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<Price>,
    /// Inclusive upper price bound.
    pub max_price: Option<Price>,
}

impl CatalogFilter {
    /// A filter with only a free-text query.
    #[must_use]
    pub fn query(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }

    /// Products that pass every criterion, in catalog order.
    #[must_use]
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        let needle = self
            .query
            .as_deref()
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);
        let brand = self
            .brand
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(str::to_lowercase);

        products
            .iter()
            .filter(|p| needle.as_deref().is_none_or(|n| p.matches_lowercase(n)))
            .filter(|p| brand.as_deref().is_none_or(|b| p.brand.to_lowercase() == b))
            .filter(|p| self.min_price.is_none_or(|min| p.price >= min))
            .filter(|p| self.max_price.is_none_or(|max| p.price <= max))
            .cloned()
            .collect()
    }
}

/// Shared product catalog.
///
/// Cheaply cloneable; clones share the same list.
#[derive(Clone)]
pub struct CatalogLoader {
    inner: Arc<CatalogLoaderInner>,
}

struct CatalogLoaderInner {
    client: ShopApiClient,
    state: RwLock<CatalogState>,
}

struct CatalogState {
    products: Vec<Product>,
    source: CatalogSource,
}

impl CatalogLoader {
    /// Create an empty catalog backed by `client`.
    #[must_use]
    pub fn new(client: ShopApiClient) -> Self {
        Self {
            inner: Arc::new(CatalogLoaderInner {
                client,
                state: RwLock::new(CatalogState {
                    products: Vec::new(),
                    source: CatalogSource::Unloaded,
                }),
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, CatalogState> {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn replace(&self, products: Vec<Product>, source: CatalogSource) {
        let mut state = self
            .inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        state.products = products;
        state.source = source;
    }

    /// Fetch the product list, replacing the in-memory copy.
    ///
    /// Never fails: any error installs the built-in fallback list instead.
    #[instrument(skip(self))]
    pub async fn load(&self) -> CatalogSource {
        match self.inner.client.get_products().await {
            Ok(products) => {
                let base = self.inner.client.base_url();
                let products = products
                    .into_iter()
                    .map(|p| normalize_image(base, p))
                    .collect::<Vec<_>>();
                info!(count = products.len(), "Catalog loaded");
                self.replace(products, CatalogSource::Remote);
                CatalogSource::Remote
            }
            Err(e) => {
                warn!(error = %e, "Error loading products, using built-in catalog");
                self.use_fallback();
                CatalogSource::Fallback
            }
        }
    }

    /// Install the built-in product list.
    pub fn use_fallback(&self) {
        self.replace(fallback_products(), CatalogSource::Fallback);
    }

    /// Where the current list came from.
    #[must_use]
    pub fn source(&self) -> CatalogSource {
        self.read().source
    }

    /// The current product list.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.read().products.clone()
    }

    /// Look up a product in the current list.
    #[must_use]
    pub fn find(&self, id: ProductId) -> Option<Product> {
        self.read().products.iter().find(|p| p.id == id).cloned()
    }

    /// Products matching a free-text query; an empty query matches all.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<Product> {
        CatalogFilter::query(query).apply(&self.read().products)
    }

    /// Products passing `filter`.
    #[must_use]
    pub fn filter(&self, filter: &CatalogFilter) -> Vec<Product> {
        filter.apply(&self.read().products)
    }

    /// Distinct brands, sorted.
    #[must_use]
    pub fn brands(&self) -> Vec<String> {
        self.read()
            .products
            .iter()
            .filter(|p| !p.brand.is_empty())
            .map(|p| p.brand.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Product for the detail view: the loaded copy when present, otherwise
    /// asked from the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not loaded and the backend lookup
    /// fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn fetch_detail(&self, id: ProductId) -> Result<Product, ApiError> {
        if let Some(product) = self.find(id) {
            return Ok(product);
        }
        let product = self.inner.client.get_product(id).await?;
        Ok(normalize_image(self.inner.client.base_url(), product))
    }
}

/// Placeholder image for a product without one.
fn placeholder_image(label: &str) -> String {
    format!(
        "https://via.placeholder.com/300x300?text={}",
        label.trim().replace(' ', "+")
    )
}

/// Resolve relative image paths against the backend and fill in missing ones.
fn normalize_image(base: &Url, mut product: Product) -> Product {
    let image = product.image.trim();
    if image.is_empty() {
        product.image = placeholder_image(&product.name);
    } else if Url::parse(image).is_err() {
        if let Ok(resolved) = base.join(image) {
            product.image = resolved.to_string();
        }
    }
    product
}

/// The built-in catalog shown when the backend is unavailable.
#[must_use]
pub fn fallback_products() -> Vec<Product> {
    let phone = |id: i64,
                 name: &str,
                 price: i64,
                 label: &str,
                 description: &str,
                 brand: &str,
                 storage: &str,
                 color: &str| Product {
        id: ProductId::new(id),
        name: name.to_string(),
        price: Price::from_units(price),
        image: placeholder_image(label),
        description: description.to_string(),
        brand: brand.to_string(),
        storage: storage.to_string(),
        color: color.to_string(),
    };

    vec![
        phone(
            1,
            "iPhone 15 Pro",
            999,
            "iPhone 15 Pro",
            "Latest iPhone with advanced camera system",
            "Apple",
            "128GB",
            "Natural Titanium",
        ),
        phone(
            2,
            "Samsung Galaxy S24",
            899,
            "Galaxy S24",
            "Premium Android smartphone with AI features",
            "Samsung",
            "256GB",
            "Titanium Gray",
        ),
        phone(
            3,
            "Google Pixel 8",
            699,
            "Pixel 8",
            "Pure Android experience with excellent camera",
            "Google",
            "128GB",
            "Obsidian",
        ),
        phone(
            4,
            "OnePlus 12",
            799,
            "OnePlus 12",
            "Fast charging and smooth performance",
            "OnePlus",
            "256GB",
            "Silky Black",
        ),
        phone(
            5,
            "Xiaomi 14",
            599,
            "Xiaomi 14",
            "Great value flagship smartphone",
            "Xiaomi",
            "128GB",
            "Black",
        ),
        phone(
            6,
            "Huawei P60 Pro",
            899,
            "P60 Pro",
            "Premium camera and design",
            "Huawei",
            "256GB",
            "Rococo Pearl",
        ),
    ]
}
