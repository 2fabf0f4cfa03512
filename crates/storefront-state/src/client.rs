//! # Remote Client
//!
//! HTTP access to the storefront backend.
//!
//! The rest of the crate only sees the [`StorefrontApi`] trait, so the store
//! and the sync controller can run against an in-memory backend in tests.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       HttpClient Request Flow                           │
//! │                                                                         │
//! │  Storefront ──► StorefrontApi::check_session()                         │
//! │                        │                                                │
//! │                        ▼                                                │
//! │               base_url + "/api/user/is-auth"                           │
//! │                        │                                                │
//! │                        ▼                                                │
//! │               reqwest (cookie store, timeout)                          │
//! │                        │                                                │
//! │          ┌─────────────┴──────────────┐                                 │
//! │          ▼                            ▼                                 │
//! │   2xx + JSON envelope          network / status / decode error         │
//! │   (success may be false)       → StoreError::Transport / Decode        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The client does not interpret `success`; callers decide what a rejection
//! means for their piece of state.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use storefront_core::CartItems;
use tracing::{debug, instrument};
use url::Url;

use crate::config::ApiSettings;
use crate::error::StoreResult;
use crate::protocol::{
    Ack, AuthResponse, CartUpdateRequest, ProductListResponse, CART_UPDATE_PATH,
    PRODUCT_LIST_PATH, SELLER_PATH, SESSION_PATH,
};

// =============================================================================
// API Trait
// =============================================================================

/// The four backend calls the state layer depends on.
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    /// `GET /api/user/is-auth`
    async fn check_session(&self) -> StoreResult<AuthResponse>;

    /// `GET /api/seller/is-auth`
    async fn check_seller(&self) -> StoreResult<Ack>;

    /// `GET /api/product/list`
    async fn list_products(&self) -> StoreResult<ProductListResponse>;

    /// `POST /api/cart/update` with the full cart.
    async fn update_cart(&self, cart_items: &CartItems) -> StoreResult<Ack>;
}

// =============================================================================
// HTTP Client
// =============================================================================

/// reqwest-backed implementation of [`StorefrontApi`].
///
/// Cookies set by the backend (the session token) are kept in the client's
/// cookie store and sent back on every request. Cloning is cheap and shares
/// the cookie store.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpClient {
    /// Creates a client for the given backend settings.
    pub fn new(settings: &ApiSettings) -> StoreResult<Self> {
        let base_url = normalize_base(&settings.base_url)?;

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(HttpClient { client, base_url })
    }

    /// Returns the normalized base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> StoreResult<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> StoreResult<T> {
        let url = self.endpoint(path)?;
        debug!(%url, "GET");
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.json::<T>().await?)
    }
}

/// Ensures the base ends with `/` so endpoint paths are appended to it
/// instead of replacing its last segment.
fn normalize_base(base_url: &str) -> StoreResult<Url> {
    let mut base = base_url.trim().to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    Ok(Url::parse(&base)?)
}

#[async_trait]
impl StorefrontApi for HttpClient {
    #[instrument(skip(self))]
    async fn check_session(&self) -> StoreResult<AuthResponse> {
        self.get_json(SESSION_PATH).await
    }

    #[instrument(skip(self))]
    async fn check_seller(&self) -> StoreResult<Ack> {
        self.get_json(SELLER_PATH).await
    }

    #[instrument(skip(self))]
    async fn list_products(&self) -> StoreResult<ProductListResponse> {
        self.get_json(PRODUCT_LIST_PATH).await
    }

    #[instrument(skip(self, cart_items), fields(lines = cart_items.len()))]
    async fn update_cart(&self, cart_items: &CartItems) -> StoreResult<Ack> {
        let url = self.endpoint(CART_UPDATE_PATH)?;
        let body = CartUpdateRequest {
            cart_items: cart_items.clone(),
        };
        debug!(%url, "POST");
        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<Ack>().await?)
    }
}
