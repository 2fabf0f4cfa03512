//! # Domain Types
//!
//! Wire types shared by the catalog, the session and the cart.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      User       │   │   SearchQuery   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  _id            │   │  _id            │   │  opaque JSON    │       │
//! │  │  price          │   │  name, email    │   │  (UI filter)    │       │
//! │  │  offerPrice     │   │  cartItems ─────┼──►│                 │       │
//! │  │  image[], ...   │   │                 │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Field names follow the backend JSON (`_id`, `offerPrice`, ...).        │
//! │  Unknown fields are kept in `extra` so nothing is lost on re-send.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::cart::CartItems;

/// Transient, user-entered filter criteria. Never persisted.
pub type SearchQuery = Value;

// =============================================================================
// Product
// =============================================================================

/// A product as returned by `GET /api/product/list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Backend identifier; the key used in `CartItems`.
    #[serde(rename = "_id")]
    pub id: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub category: String,

    /// List price.
    #[serde(default)]
    pub price: f64,

    /// Discounted unit price. This is the price cart totals use.
    pub offer_price: f64,

    /// Image URLs.
    #[serde(default)]
    pub image: Vec<String>,

    /// Description bullet points.
    #[serde(default)]
    pub description: Vec<String>,

    #[serde(default = "default_in_stock")]
    pub in_stock: bool,

    /// Any other fields the backend sends (timestamps, seller data, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_in_stock() -> bool {
    true
}

impl Product {
    /// Creates an in-stock product with empty display metadata.
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64, offer_price: f64) -> Self {
        Product {
            id: id.into(),
            name: name.into(),
            category: String::new(),
            price,
            offer_price,
            image: Vec::new(),
            description: Vec::new(),
            in_stock: true,
            extra: Map::new(),
        }
    }
}

// =============================================================================
// User
// =============================================================================

/// The authenticated user as returned by `GET /api/user/is-auth`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub email: String,

    /// Server-side copy of the cart. Absent or `null` means empty.
    #[serde(default, deserialize_with = "deserialize_cart")]
    pub cart_items: CartItems,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        User {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            cart_items: CartItems::new(),
            extra: Map::new(),
        }
    }

    /// Builder-style setter for the embedded cart.
    pub fn with_cart(mut self, cart_items: CartItems) -> Self {
        self.cart_items = cart_items;
        self
    }
}

/// Accepts a missing, `null` or object `cartItems` field.
fn deserialize_cart<'de, D>(deserializer: D) -> Result<CartItems, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<CartItems>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_from_backend_json() {
        let product: Product = serde_json::from_value(json!({
            "_id": "66a1",
            "name": "Organic Bananas",
            "category": "Fruits",
            "price": 60,
            "offerPrice": 48.5,
            "image": ["a.png"],
            "description": ["Rich in potassium"],
            "inStock": false,
            "createdAt": "2025-01-02T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(product.id, "66a1");
        assert_eq!(product.offer_price, 48.5);
        assert_eq!(product.price, 60.0);
        assert!(!product.in_stock);
        assert_eq!(product.extra["createdAt"], json!("2025-01-02T00:00:00Z"));
    }

    #[test]
    fn test_product_round_trips_unknown_fields() {
        let mut product = Product::new("p1", "Milk", 2.0, 1.5);
        product.extra.insert("seller".into(), json!("s-9"));

        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["_id"], json!("p1"));
        assert_eq!(value["offerPrice"], json!(1.5));
        assert_eq!(value["seller"], json!("s-9"));
    }

    #[test]
    fn test_user_without_cart_defaults_to_empty() {
        let user: User = serde_json::from_value(json!({
            "_id": "u1",
            "name": "Ada",
            "email": "ada@example.com"
        }))
        .unwrap();
        assert!(user.cart_items.is_empty());

        let user: User = serde_json::from_value(json!({
            "_id": "u1",
            "cartItems": null
        }))
        .unwrap();
        assert!(user.cart_items.is_empty());
    }

    #[test]
    fn test_user_with_cart() {
        let user: User = serde_json::from_value(json!({
            "_id": "u1",
            "cartItems": { "p1": 2, "p2": 1 }
        }))
        .unwrap();
        assert_eq!(user.cart_items.quantity("p1"), Some(2));
        assert_eq!(user.cart_items.count_total(), 3);
    }
}
