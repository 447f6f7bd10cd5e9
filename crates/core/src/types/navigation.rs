//! Navigation targets the shop can direct the user to.
//!
//! The views behind these targets (login, product detail, order history) are
//! owned by other parts of the site; the client only names them.

use super::id::ProductId;

/// A page the client asks the embedder to navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Navigation {
    Home,
    Login,
    ProductDetail(ProductId),
    OrderHistory,
}

impl Navigation {
    /// Relative location of the target page.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "index.html".to_string(),
            Self::Login => "login.html".to_string(),
            Self::ProductDetail(id) => format!("product-detail.html?id={id}"),
            Self::OrderHistory => "orders.html".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(Navigation::Login.path(), "login.html");
        assert_eq!(
            Navigation::ProductDetail(ProductId::new(4)).path(),
            "product-detail.html?id=4"
        );
        assert_eq!(Navigation::OrderHistory.path(), "orders.html");
    }
}
