//! Projects catalog, cart, and session state into output fragments.
//!
//! The renderer owns no state: every call reads the current catalog and
//! cart and renders them through askama, as HTML fragments for a web page
//! or plain text for a terminal.

mod templates;
mod views;

use askama::Template;

use mobile_shop_core::{Navigation, Product};

use crate::cart::CartStore;
use crate::catalog::{CatalogFilter, CatalogLoader};
use crate::notify::Notifier;
use crate::session::{NavState, SessionStore};

use templates::{
    CartCountHtmlTemplate, CartCountTextTemplate, CartItemsHtmlTemplate, CartItemsTextTemplate,
    CatalogHtmlTemplate, CatalogTextTemplate, NavHtmlTemplate, NavTextTemplate,
    NotificationsHtmlTemplate, NotificationsTextTemplate, ProductDetailHtmlTemplate,
    ProductDetailTextTemplate,
};
pub use views::{CartLineView, ProductCard};

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Surface {
    #[default]
    Html,
    Text,
}

/// The three parts of a cart redisplay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCart {
    /// Item-count badge; `None` while the cart is empty.
    pub badge: Option<String>,
    /// Line items with their controls, followed by the total.
    pub items: String,
    /// Cart total with two decimals, without currency sign.
    pub total: String,
}

/// Renders shop state for one surface.
#[derive(Clone)]
pub struct Renderer {
    catalog: CatalogLoader,
    cart: CartStore,
    notifier: Notifier,
    sessions: SessionStore,
    surface: Surface,
}

impl Renderer {
    #[must_use]
    pub const fn new(
        catalog: CatalogLoader,
        cart: CartStore,
        notifier: Notifier,
        sessions: SessionStore,
        surface: Surface,
    ) -> Self {
        Self {
            catalog,
            cart,
            notifier,
            sessions,
            surface,
        }
    }

    #[must_use]
    pub const fn surface(&self) -> Surface {
        self.surface
    }

    /// Same state, different output format.
    #[must_use]
    pub fn with_surface(&self, surface: Surface) -> Self {
        Self {
            surface,
            ..self.clone()
        }
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// One card per product, or the "no products" message.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    pub fn render_catalog(&self, products: &[Product]) -> askama::Result<String> {
        let cards: Vec<ProductCard> = products
            .iter()
            .map(|p| ProductCard::new(p, self.cart.contains(p.id)))
            .collect();
        match self.surface {
            Surface::Html => CatalogHtmlTemplate { cards: &cards }.render(),
            Surface::Text => CatalogTextTemplate { cards: &cards }.render(),
        }
    }

    /// The whole loaded catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    pub fn render_current_catalog(&self) -> askama::Result<String> {
        self.render_catalog(&self.catalog.products())
    }

    /// Products matching a free-text query; an empty query renders everything.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    pub fn render_search(&self, query: &str) -> askama::Result<String> {
        self.render_catalog(&self.catalog.search(query))
    }

    /// Products passing `filter`.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    pub fn render_filtered(&self, filter: &CatalogFilter) -> askama::Result<String> {
        self.render_catalog(&self.catalog.filter(filter))
    }

    /// Detail view of a single product.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    pub fn render_product_detail(&self, product: &Product) -> askama::Result<String> {
        let in_cart_quantity = self
            .cart
            .lines()
            .iter()
            .find(|l| l.id == product.id)
            .map_or(0, |l| l.quantity);
        let card = ProductCard::new(product, in_cart_quantity > 0);
        match self.surface {
            Surface::Html => ProductDetailHtmlTemplate {
                card: &card,
                in_cart_quantity,
            }
            .render(),
            Surface::Text => ProductDetailTextTemplate {
                card: &card,
                in_cart_quantity,
            }
            .render(),
        }
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Badge, line items, and total for the current cart.
    ///
    /// # Errors
    ///
    /// Returns an error if a template fails to render.
    pub fn render_cart(&self) -> askama::Result<RenderedCart> {
        let snapshot = self.cart.lines();
        let lines: Vec<CartLineView> = snapshot.iter().map(CartLineView::from).collect();
        let item_count = snapshot
            .iter()
            .fold(0_u32, |sum, l| sum.saturating_add(l.quantity));
        let total = self.cart.total().to_fixed();

        let badge = if item_count == 0 {
            None
        } else {
            Some(match self.surface {
                Surface::Html => CartCountHtmlTemplate { count: item_count }.render()?,
                Surface::Text => CartCountTextTemplate { count: item_count }.render()?,
            })
        };
        let items = match self.surface {
            Surface::Html => CartItemsHtmlTemplate {
                lines: &lines,
                item_count,
                total: &total,
            }
            .render()?,
            Surface::Text => CartItemsTextTemplate {
                lines: &lines,
                item_count,
                total: &total,
            }
            .render()?,
        };

        Ok(RenderedCart { badge, items, total })
    }

    // =========================================================================
    // Chrome
    // =========================================================================

    /// Active toast notifications, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    pub fn render_notifications(&self) -> askama::Result<String> {
        let notifications = self.notifier.active();
        match self.surface {
            Surface::Html => NotificationsHtmlTemplate {
                notifications: &notifications,
            }
            .render(),
            Surface::Text => NotificationsTextTemplate {
                notifications: &notifications,
            }
            .render(),
        }
    }

    /// Navigation entries: the user's name and account links, or a login link.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    pub fn render_nav(&self) -> askama::Result<String> {
        let nav = self.sessions.nav_state();
        let display_name = match &nav {
            NavState::LoggedIn { display_name } => Some(display_name.as_str()),
            NavState::LoggedOut => None,
        };
        match self.surface {
            Surface::Html => NavHtmlTemplate {
                display_name,
                login_href: &Navigation::Login.path(),
                orders_href: &Navigation::OrderHistory.path(),
            }
            .render(),
            Surface::Text => NavTextTemplate { display_name }.render(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use mobile_shop_core::{ProductId, User};

    use super::*;
    use crate::api::ShopApiClient;
    use crate::storage::Persistence;
    use crate::test_support::unreachable_url;

    fn renderer(surface: Surface) -> Renderer {
        let persistence = Persistence::in_memory();
        let notifier = Notifier::default();
        let catalog = CatalogLoader::new(ShopApiClient::new(unreachable_url()));
        catalog.use_fallback();
        let cart = CartStore::open(persistence.clone(), catalog.clone(), notifier.clone());
        Renderer::new(
            catalog,
            cart,
            notifier,
            SessionStore::new(persistence),
            surface,
        )
    }

    #[test]
    fn test_catalog_cards_link_and_carry_ids() {
        let r = renderer(Surface::Html);
        let html = r.render_current_catalog().unwrap();

        assert_eq!(html.matches("class=\"card product-card").count(), 6);
        assert!(html.contains("href=\"product-detail.html?id=3\""));
        assert!(html.contains("data-product-id=\"6\""));
        assert!(html.contains("$999.00"));
    }

    #[test]
    fn test_empty_catalog_message() {
        for surface in [Surface::Html, Surface::Text] {
            let out = renderer(surface).render_catalog(&[]).unwrap();
            assert!(out.contains("No products found"));
            assert!(out.contains("Try adjusting your search terms"));
        }
    }

    #[test]
    fn test_html_escapes_product_text() {
        let r = renderer(Surface::Html);
        let mut product = r.catalog.find(ProductId::new(1)).unwrap();
        product.name = "<b>Phone</b>".to_string();
        let html = r.render_catalog(&[product]).unwrap();
        assert!(!html.contains("<b>Phone</b>"));
        assert!(html.contains("&lt;b&gt;Phone&lt;/b&gt;"));
    }

    #[test]
    fn test_search_renders_matches_only() {
        let r = renderer(Surface::Text);
        let out = r.render_search("galaxy").unwrap();
        assert!(out.contains("Samsung Galaxy S24"));
        assert!(!out.contains("iPhone"));

        let all = r.render_search("").unwrap();
        assert!(all.contains("iPhone 15 Pro"));
        assert!(all.contains("Huawei P60 Pro"));
    }

    #[test]
    fn test_filtered_by_brand() {
        let r = renderer(Surface::Text);
        let out = r
            .render_filtered(&CatalogFilter {
                brand: Some("GOOGLE".to_string()),
                ..CatalogFilter::default()
            })
            .unwrap();
        assert!(out.contains("Google Pixel 8"));
        assert!(!out.contains("OnePlus"));
    }

    #[test]
    fn test_empty_cart() {
        for surface in [Surface::Html, Surface::Text] {
            let cart = renderer(surface).render_cart().unwrap();
            assert!(cart.badge.is_none());
            assert_eq!(cart.total, "0.00");
            assert!(cart.items.contains("Your cart is empty"));
            assert!(cart.items.contains("0.00"));
        }
    }

    #[test]
    fn test_cart_badge_lines_and_total() {
        let r = renderer(Surface::Html);
        r.cart.add(ProductId::new(1), None).unwrap();
        r.cart.add(ProductId::new(1), None).unwrap();
        r.cart.add(ProductId::new(5), None).unwrap();

        let cart = r.render_cart().unwrap();
        assert!(cart.badge.unwrap().contains(">3<"));
        assert_eq!(cart.total, "2597.00");
        assert!(cart.items.contains("data-action=\"decrement\" data-product-id=\"1\""));
        assert!(cart.items.contains("data-action=\"remove\" data-product-id=\"5\""));
        assert!(cart.items.contains("2597.00"));

        let text = r.with_surface(Surface::Text).render_cart().unwrap();
        assert_eq!(text.badge.as_deref(), Some("Cart (3)"));
        assert!(text.items.contains("3 items"));
        assert!(text.items.contains("iPhone 15 Pro x2 @ $999.00 = $1998.00"));
    }

    #[test]
    fn test_product_detail_shows_specs_and_cart_quantity() {
        let r = renderer(Surface::Text);
        let product = r.catalog.find(ProductId::new(2)).unwrap();
        let before = r.render_product_detail(&product).unwrap();
        assert!(before.contains("Storage: 256GB"));
        assert!(before.contains("Color:   Titanium Gray"));
        assert!(!before.contains("in your cart"));

        r.cart.add(ProductId::new(2), None).unwrap();
        let after = r.render_product_detail(&product).unwrap();
        assert!(after.contains("1 item in your cart"));
    }

    #[test]
    fn test_notifications_rendered_in_order() {
        let r = renderer(Surface::Text);
        r.notifier.success("first");
        r.notifier.error("second");

        let out = r.render_notifications().unwrap();
        let first = out.find("[ok] first").unwrap();
        let second = out.find("[error] second").unwrap();
        assert!(first < second);

        let html = r.with_surface(Surface::Html).render_notifications().unwrap();
        assert!(html.contains("alert-danger"));
    }

    #[test]
    fn test_nav_reflects_session() {
        let r = renderer(Surface::Html);
        let html = r.render_nav().unwrap();
        assert!(html.contains("href=\"login.html\""));
        assert!(!html.contains("Logout"));

        let user: User = serde_json::from_value(json!({"firstName": "Grace"})).unwrap();
        r.sessions.save(&user, "tok").unwrap();
        let html = r.render_nav().unwrap();
        assert!(html.contains("Welcome, Grace!"));
        assert!(html.contains("href=\"orders.html\""));
    }
}
