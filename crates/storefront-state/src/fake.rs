//! In-memory backend for unit tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use storefront_core::{CartItems, Product, User};

use crate::client::StorefrontApi;
use crate::error::{StoreError, StoreResult};
use crate::protocol::{Ack, AuthResponse, ProductListResponse};

/// Canned replies per endpoint; `Err(msg)` simulates a transport failure.
pub struct FakeApi {
    session: Mutex<Result<AuthResponse, String>>,
    seller: Mutex<Result<Ack, String>>,
    products: Mutex<Result<ProductListResponse, String>>,
    cart_reply: Mutex<Result<Ack, String>>,
    pushes: Mutex<Vec<CartItems>>,
    product_calls: AtomicUsize,
}

impl FakeApi {
    /// Signed out, not a seller, empty catalog, cart updates accepted.
    pub fn new() -> Self {
        FakeApi {
            session: Mutex::new(Ok(AuthResponse::default())),
            seller: Mutex::new(Ok(Ack::default())),
            products: Mutex::new(Ok(ProductListResponse {
                success: true,
                products: Vec::new(),
                message: None,
            })),
            cart_reply: Mutex::new(Ok(Ack::ok())),
            pushes: Mutex::new(Vec::new()),
            product_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_user(self, user: User) -> Self {
        *self.session.lock().unwrap() = Ok(AuthResponse {
            success: true,
            user: Some(user),
            message: None,
        });
        self
    }

    pub fn with_session_error(self, message: &str) -> Self {
        *self.session.lock().unwrap() = Err(message.to_string());
        self
    }

    pub fn with_seller(self, is_seller: bool) -> Self {
        *self.seller.lock().unwrap() = Ok(Ack {
            success: is_seller,
            message: None,
        });
        self
    }

    pub fn with_seller_error(self, message: &str) -> Self {
        *self.seller.lock().unwrap() = Err(message.to_string());
        self
    }

    pub fn with_products(self, products: Vec<Product>) -> Self {
        *self.products.lock().unwrap() = Ok(ProductListResponse {
            success: true,
            products,
            message: None,
        });
        self
    }

    pub fn with_products_rejected(self, message: &str) -> Self {
        *self.products.lock().unwrap() = Ok(ProductListResponse {
            success: false,
            products: Vec::new(),
            message: Some(message.to_string()),
        });
        self
    }

    pub fn with_products_error(self, message: &str) -> Self {
        *self.products.lock().unwrap() = Err(message.to_string());
        self
    }

    pub fn set_cart_reply(&self, reply: Result<Ack, String>) {
        *self.cart_reply.lock().unwrap() = reply;
    }

    pub fn pushes(&self) -> Vec<CartItems> {
        self.pushes.lock().unwrap().clone()
    }

    pub fn product_calls(&self) -> usize {
        self.product_calls.load(Ordering::SeqCst)
    }

    /// Waits until at least `n` cart pushes arrived, then gives stragglers
    /// a moment to show up so callers can assert exact counts.
    pub async fn wait_for_pushes(&self, n: usize) -> Vec<CartItems> {
        for _ in 0..400 {
            if self.pushes.lock().unwrap().len() >= n {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
        self.pushes()
    }
}

fn reply<T: Clone>(slot: &Mutex<Result<T, String>>) -> StoreResult<T> {
    slot.lock()
        .unwrap()
        .clone()
        .map_err(StoreError::Transport)
}

#[async_trait]
impl StorefrontApi for FakeApi {
    async fn check_session(&self) -> StoreResult<AuthResponse> {
        reply(&self.session)
    }

    async fn check_seller(&self) -> StoreResult<Ack> {
        reply(&self.seller)
    }

    async fn list_products(&self) -> StoreResult<ProductListResponse> {
        self.product_calls.fetch_add(1, Ordering::SeqCst);
        reply(&self.products)
    }

    async fn update_cart(&self, cart_items: &CartItems) -> StoreResult<Ack> {
        self.pushes.lock().unwrap().push(cart_items.clone());
        reply(&self.cart_reply)
    }
}
