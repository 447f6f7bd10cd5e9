//! Askama templates, one per view and surface.

use askama::Template;

use crate::filters;
use crate::notify::Notification;

use super::views::{CartLineView, ProductCard};

// =============================================================================
// Catalog
// =============================================================================

#[derive(Template)]
#[template(path = "html/catalog.html")]
pub struct CatalogHtmlTemplate<'a> {
    pub cards: &'a [ProductCard],
}

#[derive(Template)]
#[template(path = "text/catalog.txt")]
pub struct CatalogTextTemplate<'a> {
    pub cards: &'a [ProductCard],
}

#[derive(Template)]
#[template(path = "html/product_detail.html")]
pub struct ProductDetailHtmlTemplate<'a> {
    pub card: &'a ProductCard,
    pub in_cart_quantity: u32,
}

#[derive(Template)]
#[template(path = "text/product_detail.txt")]
pub struct ProductDetailTextTemplate<'a> {
    pub card: &'a ProductCard,
    pub in_cart_quantity: u32,
}

// =============================================================================
// Cart
// =============================================================================

#[derive(Template)]
#[template(path = "html/cart_items.html")]
pub struct CartItemsHtmlTemplate<'a> {
    pub lines: &'a [CartLineView],
    pub item_count: u32,
    pub total: &'a str,
}

#[derive(Template)]
#[template(path = "text/cart_items.txt")]
pub struct CartItemsTextTemplate<'a> {
    pub lines: &'a [CartLineView],
    pub item_count: u32,
    pub total: &'a str,
}

#[derive(Template)]
#[template(path = "html/cart_count.html")]
pub struct CartCountHtmlTemplate {
    pub count: u32,
}

#[derive(Template)]
#[template(path = "text/cart_count.txt")]
pub struct CartCountTextTemplate {
    pub count: u32,
}

// =============================================================================
// Chrome
// =============================================================================

#[derive(Template)]
#[template(path = "html/notifications.html")]
pub struct NotificationsHtmlTemplate<'a> {
    pub notifications: &'a [Notification],
}

#[derive(Template)]
#[template(path = "text/notifications.txt")]
pub struct NotificationsTextTemplate<'a> {
    pub notifications: &'a [Notification],
}

#[derive(Template)]
#[template(path = "html/nav.html")]
pub struct NavHtmlTemplate<'a> {
    pub display_name: Option<&'a str>,
    pub login_href: &'a str,
    pub orders_href: &'a str,
}

#[derive(Template)]
#[template(path = "text/nav.txt")]
pub struct NavTextTemplate<'a> {
    pub display_name: Option<&'a str>,
}
