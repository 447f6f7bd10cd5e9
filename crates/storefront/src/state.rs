//! Shop state for one session.

use std::sync::Arc;

use secrecy::SecretString;
use tracing::instrument;

use crate::api::ShopApiClient;
use crate::cart::CartStore;
use crate::catalog::{CatalogLoader, CatalogSource};
use crate::checkout::OrderSubmitter;
use crate::config::ShopConfig;
use crate::error::{AppError, add_breadcrumb};
use crate::notify::Notifier;
use crate::render::{RenderedCart, Renderer, Surface};
use crate::session::{Session, SessionStore};
use crate::storage::{FileStore, Persistence};

/// Everything a freshly loaded page shows.
#[derive(Debug, Clone)]
pub struct Page {
    pub source: CatalogSource,
    pub catalog: String,
    pub cart: RenderedCart,
    pub nav: String,
}

/// Shop state shared by everything acting on one session.
///
/// This struct is cheaply cloneable via `Arc` and wires the stores together:
/// the cart reads the catalog, the renderer reads both, and the submitter
/// drives the cart and session.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ShopConfig,
    client: ShopApiClient,
    catalog: CatalogLoader,
    cart: CartStore,
    notifier: Notifier,
    sessions: SessionStore,
    submitter: OrderSubmitter,
    renderer: Renderer,
}

impl AppState {
    /// Create shop state over the given persistence.
    ///
    /// # Arguments
    ///
    /// * `config` - Shop configuration
    /// * `persistence` - Where the cart and session live
    /// * `surface` - Output format for rendering
    #[must_use]
    pub fn new(config: ShopConfig, persistence: Persistence, surface: Surface) -> Self {
        let client = ShopApiClient::new(config.api_base_url.clone());
        let notifier = Notifier::new(config.notification_ttl);
        let catalog = CatalogLoader::new(client.clone());
        let cart = CartStore::open(persistence.clone(), catalog.clone(), notifier.clone());
        let sessions = SessionStore::new(persistence);
        let submitter = OrderSubmitter::new(
            client.clone(),
            cart.clone(),
            sessions.clone(),
            notifier.clone(),
            config.redirect_delay,
        );
        let renderer = Renderer::new(
            catalog.clone(),
            cart.clone(),
            notifier.clone(),
            sessions.clone(),
            surface,
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                client,
                catalog,
                cart,
                notifier,
                sessions,
                submitter,
                renderer,
            }),
        }
    }

    /// Create shop state persisted under `config.data_dir`.
    #[must_use]
    pub fn open(config: ShopConfig, surface: Surface) -> Self {
        let persistence = Persistence::new(FileStore::new(config.data_dir.clone()));
        Self::new(config, persistence, surface)
    }

    #[must_use]
    pub fn config(&self) -> &ShopConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn client(&self) -> &ShopApiClient {
        &self.inner.client
    }

    #[must_use]
    pub fn catalog(&self) -> &CatalogLoader {
        &self.inner.catalog
    }

    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    #[must_use]
    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }

    #[must_use]
    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }

    #[must_use]
    pub fn submitter(&self) -> &OrderSubmitter {
        &self.inner.submitter
    }

    #[must_use]
    pub fn renderer(&self) -> &Renderer {
        &self.inner.renderer
    }

    /// Load the catalog and render the initial page.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails. Catalog failures never surface
    /// here; they switch to the built-in catalog.
    #[instrument(skip(self))]
    pub async fn load_page(&self) -> Result<Page, AppError> {
        let source = self.inner.catalog.load().await;
        let renderer = &self.inner.renderer;
        Ok(Page {
            source,
            catalog: renderer.render_current_catalog()?,
            cart: renderer.render_cart()?,
            nav: renderer.render_nav()?,
        })
    }

    /// Log in against the backend and persist the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the credentials or the
    /// session cannot be stored.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<Session, AppError> {
        let response = self.inner.client.login(email, password).await?;
        let session = self.inner.sessions.save(&response.user, &response.token)?;
        add_breadcrumb("auth", "Logged in", None);
        self.inner
            .notifier
            .success(format!("Welcome back, {}!", session.user.display_name()));
        Ok(session)
    }
}
