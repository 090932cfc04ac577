//! Composition root owning every manager.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

use threadline_core::{CartSnapshot, Product};

use crate::api::{ApiClient, HttpTransport, Transport};
use crate::cart::CartManager;
use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::error::StorefrontError;
use crate::events::{EventOutcome, UiEvent};
use crate::notify::{Notice, NotificationCenter};
use crate::render::{Observed, Render, spawn_renderer};
use crate::session::{SessionManager, SessionState};
use crate::views::{CartBadge, CartView, ProductCard, SessionView};

/// The storefront client: session, cart, catalog and notices over one
/// transport.
///
/// Cheap to clone; clones share all state.
pub struct Storefront<T = HttpTransport> {
    inner: Arc<StorefrontInner<T>>,
}

struct StorefrontInner<T> {
    config: StorefrontConfig,
    api: ApiClient<T>,
    notices: NotificationCenter,
    session: SessionManager<T>,
    cart: CartManager<T>,
    catalog: Catalog<T>,
    featured: watch::Sender<Vec<Product>>,
    new_arrivals: watch::Sender<Vec<Product>>,
}

impl<T> Clone for Storefront<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Storefront<HttpTransport> {
    /// Build a client that talks HTTP to `config.api_base`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn connect(config: StorefrontConfig) -> Result<Self, StorefrontError> {
        let transport = HttpTransport::new(config.api_base.clone())?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> Storefront<T> {
    /// Build a client over any transport.
    #[must_use]
    pub fn with_transport(config: StorefrontConfig, transport: T) -> Self {
        let api = ApiClient::new(transport);
        let notices = NotificationCenter::new(config.notification_ttl);
        let session = SessionManager::new(api.clone(), notices.clone());
        let cart = CartManager::new(api.clone(), notices.clone(), config.checkout_url.clone());
        let catalog = Catalog::new(api.clone(), config.catalog);
        let (featured, _) = watch::channel(Vec::new());
        let (new_arrivals, _) = watch::channel(Vec::new());

        Self {
            inner: Arc::new(StorefrontInner {
                config,
                api,
                notices,
                session,
                cart,
                catalog,
                featured,
                new_arrivals,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Direct access to the remote access layer.
    #[must_use]
    pub fn api(&self) -> &ApiClient<T> {
        &self.inner.api
    }

    #[must_use]
    pub fn session(&self) -> &SessionManager<T> {
        &self.inner.session
    }

    #[must_use]
    pub fn cart(&self) -> &CartManager<T> {
        &self.inner.cart
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog<T> {
        &self.inner.catalog
    }

    #[must_use]
    pub fn notices(&self) -> &NotificationCenter {
        &self.inner.notices
    }

    /// Bootstrap the session and load the cart and home page listings
    /// concurrently. Failures are logged, never published as notices.
    #[instrument(skip(self))]
    pub async fn start(&self) -> SessionState {
        let (session, _, ()) = tokio::join!(
            self.inner.session.bootstrap(),
            self.inner.cart.load_cart(),
            self.load_listings(),
        );
        info!(authenticated = session.is_authenticated(), "Storefront started");
        session
    }

    async fn load_listings(&self) {
        let (featured, new_arrivals) = tokio::join!(
            self.inner.catalog.featured(),
            self.inner.catalog.new_arrivals(),
        );

        match featured {
            Ok(products) => {
                self.inner.featured.send_replace(products);
            }
            Err(e) => warn!(error = %e, "Failed to load featured products"),
        }
        match new_arrivals {
            Ok(products) => {
                self.inner.new_arrivals.send_replace(products);
            }
            Err(e) => warn!(error = %e, "Failed to load new arrivals"),
        }
    }

    /// Route a UI event to the manager that owns it.
    #[instrument(skip_all, fields(event = event.name()))]
    pub async fn dispatch(&self, event: UiEvent) -> EventOutcome {
        let cart = &self.inner.cart;
        let session = &self.inner.session;

        match event {
            UiEvent::AddToCart(item) => cart.add_to_cart(item).await.into(),
            UiEvent::Increment(id) => cart.increment(id).await.into(),
            UiEvent::Decrement(id) => cart.decrement(id).await.into(),
            UiEvent::RemoveItem(id) => cart.remove_item(id).await.into(),
            UiEvent::ClearCart => cart.clear_cart().await.into(),
            UiEvent::Login(credentials) => match session.login(credentials).await {
                Ok(identity) => EventOutcome::LoggedIn(identity),
                Err(e) => EventOutcome::Failed(e),
            },
            UiEvent::Register(registration) => session.register(registration).await.into(),
            UiEvent::Logout => session.logout().await.into(),
            UiEvent::Checkout => self.checkout(),
            UiEvent::Search {
                keyword,
                category_id,
            } => match self.inner.catalog.search(&keyword, category_id).await {
                Ok(products) => EventOutcome::Products(products),
                Err(e) => {
                    warn!(error = %e, "Search failed");
                    EventOutcome::Failed(e)
                }
            },
            UiEvent::Refresh => {
                let (loaded, ()) = tokio::join!(cart.load_cart(), self.load_listings());
                loaded.map(|_| ()).into()
            }
        }
    }

    /// Run the local checkout guard against the current session.
    #[must_use]
    pub fn checkout(&self) -> EventOutcome {
        match self.inner.cart.checkout(&self.inner.session.current()) {
            Ok(handoff) => EventOutcome::CheckoutReady(handoff),
            Err(refusal) => EventOutcome::CheckoutRefused(refusal),
        }
    }

    // -------------------------------------------------------------------------
    // Views
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn cart_view(&self) -> CartView {
        CartView::from_snapshot(&self.inner.cart.current())
    }

    #[must_use]
    pub fn cart_badge(&self) -> CartBadge {
        CartBadge::from_snapshot(&self.inner.cart.current())
    }

    #[must_use]
    pub fn session_view(&self) -> SessionView {
        SessionView::from_state(&self.inner.session.current())
    }

    #[must_use]
    pub fn featured_cards(&self) -> Vec<ProductCard> {
        self.inner.featured.borrow().iter().map(ProductCard::from_product).collect()
    }

    #[must_use]
    pub fn new_arrival_cards(&self) -> Vec<ProductCard> {
        self.inner
            .new_arrivals
            .borrow()
            .iter()
            .map(ProductCard::from_product)
            .collect()
    }

    // -------------------------------------------------------------------------
    // Observation
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn subscribe_cart(&self) -> watch::Receiver<CartSnapshot> {
        self.inner.cart.subscribe()
    }

    #[must_use]
    pub fn subscribe_session(&self) -> watch::Receiver<SessionState> {
        self.inner.session.subscribe()
    }

    #[must_use]
    pub fn subscribe_notices(&self) -> watch::Receiver<Vec<Notice>> {
        self.inner.notices.subscribe()
    }

    /// Re-render `renderer` on every state change for as long as the
    /// storefront lives.
    pub fn spawn_renderer<R: Render>(&self, renderer: R) -> JoinHandle<R> {
        spawn_renderer(
            renderer,
            Observed {
                cart: self.subscribe_cart(),
                session: self.subscribe_session(),
                notices: self.subscribe_notices(),
            },
        )
    }
}
