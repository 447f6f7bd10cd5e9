//! Integration tests for on-disk persistence.
//!
//! A cart and session written by one [`AppState`] must be visible to the next
//! one opened over the same data directory, as after a page reload.

#![allow(clippy::unwrap_used)]

use std::path::PathBuf;

use mobile_shop_core::ProductId;
use mobile_shop_integration_tests::{MockBackend, PASSWORD};
use mobile_shop_storefront::render::Surface;
use mobile_shop_storefront::state::AppState;
use secrecy::SecretString;

fn data_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "mobile-shop-it-{name}-{}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[tokio::test]
async fn test_cart_and_session_survive_reload() {
    let backend = MockBackend::start().await.unwrap();
    let mut config = backend.config();
    config.data_dir = data_dir("reload");

    let first = AppState::open(config.clone(), Surface::Text);
    first.load_page().await.unwrap();
    first.cart().add(ProductId::new(101), None).unwrap();
    first.cart().add(ProductId::new(101), None).unwrap();
    first
        .login("ada@example.com", &SecretString::from(PASSWORD))
        .await
        .unwrap();

    let second = AppState::open(config.clone(), Surface::Text);
    let page = second.load_page().await.unwrap();
    assert_eq!(second.cart().item_count(), 2);
    assert_eq!(page.cart.badge.as_deref(), Some("Cart (2)"));
    assert!(page.nav.contains("Ada"));

    let user = second.sessions().current().unwrap().user;
    assert_eq!(user.extra["phone"], "+44 20 7946 0000");

    let _ = std::fs::remove_dir_all(&config.data_dir);
}

#[tokio::test]
async fn test_checkout_clears_cart_on_disk() {
    let backend = MockBackend::start().await.unwrap();
    let mut config = backend.config();
    config.data_dir = data_dir("checkout");

    let state = AppState::open(config.clone(), Surface::Text);
    state.load_page().await.unwrap();
    state.cart().add(ProductId::new(102), None).unwrap();
    state
        .login("ada@example.com", &SecretString::from(PASSWORD))
        .await
        .unwrap();
    state.submitter().checkout().await.unwrap();

    let reopened = AppState::open(config.clone(), Surface::Text);
    assert!(reopened.cart().is_empty());
    assert!(!config.data_dir.join("cart").exists());

    let _ = std::fs::remove_dir_all(&config.data_dir);
}
