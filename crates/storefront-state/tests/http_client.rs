//! HTTP client tests against a throwaway axum backend on a random port.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use storefront_state::{
    ApiSettings, CartItems, ChannelNotifier, HttpClient, Notification, StoreError, StorefrontApi,
    Storefront, StorefrontConfig,
};

// =============================================================================
// Test Backend
// =============================================================================

struct Backend {
    cart_reply: Value,
    products_status: StatusCode,
    pushes: Mutex<Vec<Value>>,
    seller_cookies: Mutex<Vec<Option<String>>>,
}

impl Backend {
    fn new() -> Self {
        Backend {
            cart_reply: json!({ "success": true, "message": "Cart Updated" }),
            products_status: StatusCode::OK,
            pushes: Mutex::new(Vec::new()),
            seller_cookies: Mutex::new(Vec::new()),
        }
    }

    fn pushes(&self) -> Vec<Value> {
        self.pushes.lock().unwrap().clone()
    }

    async fn wait_for_pushes(&self, n: usize) -> Vec<Value> {
        for _ in 0..400 {
            if self.pushes.lock().unwrap().len() >= n {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        self.pushes()
    }
}

type Shared = Arc<Backend>;

async fn session(_: State<Shared>) -> impl IntoResponse {
    (
        [(header::SET_COOKIE, "token=abc123; Path=/; HttpOnly")],
        Json(json!({
            "success": true,
            "user": {
                "_id": "u1",
                "name": "Ada",
                "email": "ada@example.com",
                "cartItems": { "gd46g23h": 2 }
            }
        })),
    )
}

async fn seller(State(backend): State<Shared>, headers: HeaderMap) -> Json<Value> {
    let cookie = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let authorized = cookie.as_deref().is_some_and(|c| c.contains("token=abc123"));
    backend.seller_cookies.lock().unwrap().push(cookie);
    Json(json!({ "success": authorized }))
}

async fn products(State(backend): State<Shared>) -> impl IntoResponse {
    let body = Json(json!({
        "success": true,
        "products": [{
            "_id": "gd46g23h",
            "name": "Potato 500g",
            "category": "Vegetables",
            "price": 25,
            "offerPrice": 19.996,
            "image": ["potato.png"],
            "description": ["Fresh"],
            "inStock": true,
            "createdAt": "2025-03-25T07:17:46.018Z"
        }]
    }));
    (backend.products_status, body)
}

async fn cart_update(State(backend): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    backend.pushes.lock().unwrap().push(body);
    Json(backend.cart_reply.clone())
}

async fn spawn_backend(backend: Shared) -> String {
    let app = Router::new()
        .route("/api/user/is-auth", get(session))
        .route("/api/seller/is-auth", get(seller))
        .route("/api/product/list", get(products))
        .route("/api/cart/update", post(cart_update))
        .with_state(backend);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn client(base_url: &str) -> HttpClient {
    HttpClient::new(&ApiSettings {
        base_url: base_url.to_string(),
        timeout_secs: 5,
    })
    .unwrap()
}

// =============================================================================
// Client
// =============================================================================

#[tokio::test]
async fn test_session_cookie_is_replayed() {
    let backend = Arc::new(Backend::new());
    let base = spawn_backend(backend.clone()).await;
    let api = client(&base);

    // Before the session check there is no cookie.
    assert!(!api.check_seller().await.unwrap().success);

    let user = api.check_session().await.unwrap().into_user().unwrap();
    assert_eq!(user.id, "u1");
    assert_eq!(user.cart_items.quantity("gd46g23h"), Some(2));

    assert!(api.check_seller().await.unwrap().success);

    let cookies = backend.seller_cookies.lock().unwrap().clone();
    assert_eq!(cookies.len(), 2);
    assert!(cookies[0].is_none());
    assert!(cookies[1].as_deref().unwrap().contains("token=abc123"));
}

#[tokio::test]
async fn test_product_list_keeps_unknown_fields() {
    let backend = Arc::new(Backend::new());
    let base = spawn_backend(backend).await;

    let products = client(&base)
        .list_products()
        .await
        .unwrap()
        .into_products()
        .unwrap();

    assert_eq!(products.len(), 1);
    assert_eq!(products[0].offer_price, 19.996);
    assert!(products[0].extra.contains_key("createdAt"));
}

#[tokio::test]
async fn test_cart_update_body() {
    let backend = Arc::new(Backend::new());
    let base = spawn_backend(backend.clone()).await;

    let ack = client(&base)
        .update_cart(&CartItems::from([("p1", 2), ("p2", 0)]))
        .await
        .unwrap();

    assert!(ack.success);
    assert_eq!(
        backend.pushes(),
        vec![json!({ "cartItems": { "p1": 2, "p2": 0 } })]
    );
}

#[tokio::test]
async fn test_server_error_is_transport_failure() {
    let mut backend = Backend::new();
    backend.products_status = StatusCode::INTERNAL_SERVER_ERROR;
    let base = spawn_backend(Arc::new(backend)).await;

    let err = client(&base).list_products().await.unwrap_err();
    assert!(err.is_transport(), "unexpected error: {:?}", err);
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_failure() {
    // Bind then drop to get a port nobody listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{}", addr))
        .check_session()
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Transport(_)));
}

// =============================================================================
// Store + Sync End to End
// =============================================================================

fn store_for(base: &str) -> (Storefront, tokio::sync::mpsc::UnboundedReceiver<Notification>) {
    let mut config = StorefrontConfig::default();
    config.api.base_url = base.to_string();
    let (notifier, rx) = ChannelNotifier::new();
    let store = Storefront::new(config, Arc::new(client(base)), Arc::new(notifier));
    (store, rx)
}

#[tokio::test]
async fn test_start_then_add_pushes_full_cart() {
    let backend = Arc::new(Backend::new());
    let base = spawn_backend(backend.clone()).await;
    let (store, _rx) = store_for(&base);

    let sync = store.start().await;

    assert!(store.is_signed_in());
    assert!(store.is_auth_resolved());
    assert_eq!(store.formatted_cart_amount().unwrap(), "$39.99");

    // Seeded cart is pushed once.
    let pushes = backend.wait_for_pushes(1).await;
    assert_eq!(pushes, vec![json!({ "cartItems": { "gd46g23h": 2 } })]);

    store.add_to_cart("gd46g23h");

    let pushes = backend.wait_for_pushes(2).await;
    assert_eq!(pushes.len(), 2);
    assert_eq!(pushes[1], json!({ "cartItems": { "gd46g23h": 3 } }));
    assert_eq!(store.cart_count(), 3);

    sync.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_rejected_push_surfaces_server_message() {
    let mut backend = Backend::new();
    backend.cart_reply = json!({ "success": false, "message": "Cart is locked" });
    let backend = Arc::new(backend);
    let base = spawn_backend(backend.clone()).await;
    let (store, mut rx) = store_for(&base);

    let sync = store.start().await;

    let notification = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .unwrap();
    assert_eq!(notification, Some(Notification::error("Cart is locked")));
    // Local state is not rolled back.
    assert_eq!(store.cart().quantity("gd46g23h"), Some(2));

    sync.shutdown().await.unwrap();
}
