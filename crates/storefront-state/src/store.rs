//! # Storefront State Container
//!
//! [`Storefront`] is the single application-state object handed to the UI.
//! It owns the session, the catalog, the cart snapshot and the search query,
//! and is the only place any of them change.
//!
//! ## State Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Storefront (Arc handle)                         │
//! │                                                                         │
//! │  ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────────────┐ │
//! │  │  SessionState    │ │  Catalog         │ │  Arc<CartItems>          │ │
//! │  │  user            │ │  Arc<Vec<Product>│ │  swapped on every        │ │
//! │  │  is_seller       │ │                  │ │  mutation, never edited  │ │
//! │  │  auth_resolved   │ │                  │ │  in place                │ │
//! │  └──────────────────┘ └──────────────────┘ └────────────┬─────────────┘ │
//! │                                                         │ StoreEvent    │
//! │                                                         ▼               │
//! │                                          subscribers (SyncController,  │
//! │                                          UI re-render hooks, ...)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Capability Boundary
//! Readers get clones or `Arc` snapshots (`user()`, `cart()`, `products()`).
//! Writers go through named operations (`add_to_cart`, `set_user`, ...).
//! There is no way to obtain a mutable reference to the inner state.
//!
//! ## Locking
//! State sits behind a `std::sync::RwLock` that is held only for the swap
//! itself and never across an `.await`. Events are emitted while the write
//! lock is held, so subscribers observe changes in the order they happened.

use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use storefront_core::{CartItems, Money, Product, SearchQuery, User};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::catalog::{load_catalog, Catalog};
use crate::client::{HttpClient, StorefrontApi};
use crate::config::StorefrontConfig;
use crate::error::StoreResult;
use crate::notify::{Notifier, TracingNotifier};
use crate::session::{resolve_seller, resolve_session, SessionState};
use crate::sync::{SyncController, SyncHandle};

// =============================================================================
// Events
// =============================================================================

/// Change notifications delivered to subscribers.
#[derive(Debug, Clone)]
pub enum StoreEvent {
    /// The cart snapshot was replaced.
    ///
    /// `signed_in` is whether a user was present at the moment of the change,
    /// not when the event is handled.
    CartChanged {
        cart: Arc<CartItems>,
        signed_in: bool,
    },

    /// The user was replaced or cleared without the cart changing. Carries
    /// the cart as it stood at that moment.
    UserChanged {
        cart: Arc<CartItems>,
        signed_in: bool,
    },
}

// =============================================================================
// Inner State
// =============================================================================

#[derive(Debug)]
struct StoreState {
    session: SessionState,
    catalog: Catalog,
    cart: Arc<CartItems>,
    search_query: SearchQuery,
}

impl Default for StoreState {
    fn default() -> Self {
        StoreState {
            session: SessionState::default(),
            catalog: Catalog::default(),
            cart: Arc::new(CartItems::new()),
            search_query: SearchQuery::Object(Default::default()),
        }
    }
}

struct Inner {
    config: StorefrontConfig,
    api: Arc<dyn StorefrontApi>,
    notifier: Arc<dyn Notifier>,
    state: RwLock<StoreState>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<StoreEvent>>>,
}

// =============================================================================
// Storefront
// =============================================================================

/// Cloneable handle to the storefront state.
#[derive(Clone)]
pub struct Storefront {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Storefront {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront")
            .field("base_url", &self.inner.config.base_url())
            .field("state", &*self.read())
            .finish()
    }
}

impl Storefront {
    /// Creates a store with an explicit backend and notifier.
    pub fn new(
        config: StorefrontConfig,
        api: Arc<dyn StorefrontApi>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Storefront {
            inner: Arc::new(Inner {
                config,
                api,
                notifier,
                state: RwLock::new(StoreState::default()),
                subscribers: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Creates a store talking HTTP to the configured backend, with
    /// notifications going to the log.
    pub fn connect(config: StorefrontConfig) -> StoreResult<Self> {
        let api = HttpClient::new(&config.api)?;
        info!(base_url = %api.base_url(), "Storefront client created");
        Ok(Self::new(config, Arc::new(api), Arc::new(TracingNotifier)))
    }

    /// Spawns the cart sync controller, then runs [`bootstrap`].
    ///
    /// The controller subscribes before any fetch starts, so the cart seeded
    /// from the session is pushed like any other change.
    ///
    /// [`bootstrap`]: Storefront::bootstrap
    pub async fn start(&self) -> SyncHandle {
        let handle = SyncController::spawn(self);
        self.bootstrap().await;
        handle
    }

    /// Issues the session, seller and catalog fetches concurrently.
    ///
    /// Never fails: each fetch recovers on its own.
    pub async fn bootstrap(&self) {
        tokio::join!(self.fetch_session(), self.fetch_seller(), self.fetch_catalog());
        debug!("Bootstrap complete");
    }

    // =========================================================================
    // Collaborators
    // =========================================================================

    pub fn api(&self) -> Arc<dyn StorefrontApi> {
        Arc::clone(&self.inner.api)
    }

    pub fn notifier(&self) -> Arc<dyn Notifier> {
        Arc::clone(&self.inner.notifier)
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Currency symbol for display.
    pub fn currency(&self) -> &str {
        self.inner.config.currency()
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Registers a new subscriber. Every later change is delivered exactly
    /// once, in order. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<StoreEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    fn emit(&self, event: StoreEvent) {
        let mut subscribers = self
            .inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.inner.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Checks the session; seeds the cart from the user on success.
    ///
    /// Any failure signs the user out. `auth_resolved` is set either way.
    pub async fn fetch_session(&self) {
        let user = resolve_session(self.inner.api.as_ref()).await;

        let mut state = self.write();
        let was_signed_in = state.session.is_signed_in();
        state.session.auth_resolved = true;

        match user {
            Some(user) => {
                let cart = Arc::new(user.cart_items.clone());
                state.session.user = Some(user);
                state.cart = Arc::clone(&cart);
                self.emit(StoreEvent::CartChanged {
                    cart,
                    signed_in: true,
                });
            }
            None => {
                state.session.user = None;
                if was_signed_in {
                    self.emit(StoreEvent::UserChanged {
                        cart: Arc::clone(&state.cart),
                        signed_in: false,
                    });
                }
            }
        }
    }

    /// Checks seller status; any failure means not a seller.
    pub async fn fetch_seller(&self) {
        let is_seller = resolve_seller(self.inner.api.as_ref()).await;
        self.write().session.is_seller = is_seller;
    }

    pub fn user(&self) -> Option<User> {
        self.read().session.user.clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.read().session.is_signed_in()
    }

    pub fn is_seller(&self) -> bool {
        self.read().session.is_seller
    }

    /// False until the first session check has completed.
    pub fn is_auth_resolved(&self) -> bool {
        self.read().session.auth_resolved
    }

    /// Replaces the user (sign-in) or clears it (sign-out).
    ///
    /// The cart is left as is.
    pub fn set_user(&self, user: Option<User>) {
        let mut state = self.write();
        let signed_in = user.is_some();
        state.session.user = user;
        info!(signed_in, "User replaced");
        self.emit(StoreEvent::UserChanged {
            cart: Arc::clone(&state.cart),
            signed_in,
        });
    }

    pub fn set_seller(&self, is_seller: bool) {
        self.write().session.is_seller = is_seller;
    }

    pub fn show_user_login(&self) -> bool {
        self.read().session.show_user_login
    }

    pub fn set_show_user_login(&self, show: bool) {
        self.write().session.show_user_login = show;
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Loads the catalog from the configured source.
    ///
    /// Failures become error notifications; the previous list is kept.
    pub async fn fetch_catalog(&self) {
        match load_catalog(self.inner.api.as_ref(), &self.inner.config.catalog).await {
            Ok(products) => self.write().catalog = Catalog::new(products),
            Err(e) => {
                warn!(error = %e, "Catalog fetch failed");
                self.inner.notifier.error(&e.to_string());
            }
        }
    }

    /// Installs a product list directly, bypassing the configured source.
    pub fn set_products(&self, products: Vec<Product>) {
        debug!(count = products.len(), "Catalog replaced");
        self.write().catalog = Catalog::new(products);
    }

    pub fn products(&self) -> Arc<Vec<Product>> {
        self.read().catalog.products()
    }

    pub fn find_product(&self, product_id: &str) -> Option<Product> {
        self.read().catalog.find(product_id).cloned()
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Current cart snapshot. Compare snapshots with `Arc::ptr_eq` to detect
    /// changes.
    pub fn cart(&self) -> Arc<CartItems> {
        Arc::clone(&self.read().cart)
    }

    fn replace_cart(&self, f: impl FnOnce(&CartItems) -> CartItems) -> Arc<CartItems> {
        let mut state = self.write();
        let next = Arc::new(f(&state.cart));
        state.cart = Arc::clone(&next);
        debug!(lines = next.len(), count = next.count_total(), "Cart replaced");
        self.emit(StoreEvent::CartChanged {
            cart: Arc::clone(&next),
            signed_in: state.session.is_signed_in(),
        });
        next
    }

    /// Adds one unit of a product.
    pub fn add_to_cart(&self, product_id: &str) -> Arc<CartItems> {
        let cart = self.replace_cart(|cart| cart.add_item(product_id));
        self.inner.notifier.success("Added to Cart");
        cart
    }

    /// Sets a product's quantity verbatim (zero is kept as a zero line).
    pub fn update_cart_item(&self, product_id: &str, quantity: i64) -> Arc<CartItems> {
        let cart = self.replace_cart(|cart| cart.set_quantity(product_id, quantity));
        self.inner.notifier.success("Cart Updated");
        cart
    }

    /// Removes one unit of a product.
    pub fn remove_from_cart(&self, product_id: &str) -> Arc<CartItems> {
        let cart = self.replace_cart(|cart| cart.remove_one(product_id));
        self.inner.notifier.success("Remove from Cart");
        cart
    }

    /// Replaces the whole cart without a notification.
    pub fn set_cart_items(&self, cart_items: CartItems) -> Arc<CartItems> {
        self.replace_cart(|_| cart_items)
    }

    /// Total number of units in the cart.
    pub fn cart_count(&self) -> i64 {
        self.read().cart.count_total()
    }

    /// Cart total at offer prices, floor-truncated to cents.
    ///
    /// Fails when a positive cart line has no product in the catalog.
    pub fn cart_amount(&self) -> StoreResult<Money> {
        let state = self.read();
        let products = state.catalog.products();
        Ok(state.cart.amount_total(&products)?)
    }

    /// [`cart_amount`](Storefront::cart_amount) formatted with the
    /// configured currency symbol.
    pub fn formatted_cart_amount(&self) -> StoreResult<String> {
        Ok(self.cart_amount()?.format_with(self.currency()))
    }

    // =========================================================================
    // Search
    // =========================================================================

    pub fn search_query(&self) -> SearchQuery {
        self.read().search_query.clone()
    }

    pub fn set_search_query(&self, query: SearchQuery) {
        self.write().search_query = query;
    }
}
