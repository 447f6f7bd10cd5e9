//! Integration tests for catalog loading and rendering.
//!
//! These tests verify that the client uses the backend's catalog when it is
//! available and the built-in one whenever it is not.

#![allow(clippy::unwrap_used)]

use mobile_shop_core::ProductId;
use mobile_shop_integration_tests::{MockBackend, ProductsResponse};
use mobile_shop_storefront::catalog::CatalogSource;
use mobile_shop_storefront::render::Surface;
use mobile_shop_storefront::state::AppState;
use mobile_shop_storefront::storage::Persistence;

fn state_for(backend: &MockBackend, surface: Surface) -> AppState {
    AppState::new(backend.config(), Persistence::in_memory(), surface)
}

// =============================================================================
// Remote Catalog
// =============================================================================

#[tokio::test]
async fn test_remote_catalog_replaces_fallback() {
    let backend = MockBackend::start().await.unwrap();
    let state = state_for(&backend, Surface::Html);

    let page = state.load_page().await.unwrap();

    assert_eq!(page.source, CatalogSource::Remote);
    assert_eq!(backend.product_calls(), 1);
    assert!(page.catalog.contains("Nothing Phone 2"));
    assert!(!page.catalog.contains("iPhone 15 Pro"));
    assert!(page.catalog.contains("$1199.50"));
}

#[tokio::test]
async fn test_relative_images_resolved_against_backend() {
    let backend = MockBackend::start().await.unwrap();
    let state = state_for(&backend, Surface::Html);
    state.load_page().await.unwrap();

    let nothing = state.catalog().find(ProductId::new(101)).unwrap();
    assert_eq!(
        nothing.image,
        backend.url().join("/images/nothing-phone-2.png").unwrap().to_string()
    );

    let sony = state.catalog().find(ProductId::new(102)).unwrap();
    assert_eq!(sony.image, "https://cdn.example.com/xperia.png");
}

#[tokio::test]
async fn test_each_load_fetches_once() {
    let backend = MockBackend::start().await.unwrap();
    let state = state_for(&backend, Surface::Text);

    state.catalog().load().await;
    state.catalog().load().await;
    assert_eq!(backend.product_calls(), 2);
}

// =============================================================================
// Fallback
// =============================================================================

#[tokio::test]
async fn test_server_error_uses_builtin_catalog() {
    let backend = MockBackend::start().await.unwrap();
    backend.set_products(ProductsResponse::Status(500));
    let state = state_for(&backend, Surface::Text);

    let page = state.load_page().await.unwrap();

    assert_eq!(page.source, CatalogSource::Fallback);
    assert_eq!(state.catalog().products().len(), 6);
    assert!(page.catalog.contains("iPhone 15 Pro"));
    assert!(page.catalog.contains("Huawei P60 Pro"));
}

#[tokio::test]
async fn test_non_json_body_uses_builtin_catalog() {
    let backend = MockBackend::start().await.unwrap();
    backend.set_products(ProductsResponse::Garbage);
    let state = state_for(&backend, Surface::Text);

    assert_eq!(state.catalog().load().await, CatalogSource::Fallback);
}

#[tokio::test]
async fn test_recovers_when_backend_returns() {
    let backend = MockBackend::start().await.unwrap();
    backend.set_products(ProductsResponse::Status(503));
    let state = state_for(&backend, Surface::Text);
    assert_eq!(state.catalog().load().await, CatalogSource::Fallback);

    backend.set_products(ProductsResponse::Json(
        mobile_shop_integration_tests::remote_products(),
    ));
    assert_eq!(state.catalog().load().await, CatalogSource::Remote);
    assert_eq!(state.catalog().products().len(), 2);
}

// =============================================================================
// Search and Detail
// =============================================================================

#[tokio::test]
async fn test_search_on_remote_catalog() {
    let backend = MockBackend::start().await.unwrap();
    let state = state_for(&backend, Surface::Text);
    state.load_page().await.unwrap();

    let out = state.renderer().render_search("CREATORS").unwrap();
    assert!(out.contains("Sony Xperia 1 V"));
    assert!(!out.contains("Nothing Phone 2"));

    let none = state.renderer().render_search("iphone").unwrap();
    assert!(none.contains("No products found"));
}

#[tokio::test]
async fn test_detail_fetched_from_backend_when_not_loaded() {
    let backend = MockBackend::start().await.unwrap();
    let state = state_for(&backend, Surface::Text);

    // Catalog never loaded, so the detail comes from GET /api/products/{id}.
    let product = state
        .catalog()
        .fetch_detail(ProductId::new(102))
        .await
        .unwrap();
    assert_eq!(product.brand, "Sony");

    assert!(
        state
            .catalog()
            .fetch_detail(ProductId::new(999))
            .await
            .is_err()
    );
}
