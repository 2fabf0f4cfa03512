//! # Backend Protocol
//!
//! Endpoint paths and the JSON envelopes exchanged with the storefront
//! backend.
//!
//! ## Endpoints
//! ```text
//! ┌──────────────────┬────────┬────────────────────┬─────────────────────────────┐
//! │ Operation        │ Method │ Path               │ Response                    │
//! ├──────────────────┼────────┼────────────────────┼─────────────────────────────┤
//! │ session check    │ GET    │ /api/user/is-auth  │ {success, user?}            │
//! │ seller check     │ GET    │ /api/seller/is-auth│ {success}                   │
//! │ product list     │ GET    │ /api/product/list  │ {success, products, message}│
//! │ cart sync        │ POST   │ /api/cart/update   │ {success, message?}         │
//! └──────────────────┴────────┴────────────────────┴─────────────────────────────┘
//! ```
//!
//! Every response carries a `success` flag. `success: false` is an
//! application-level rejection, distinct from a transport failure.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use storefront_core::{CartItems, Product, User};
use tracing::warn;

use crate::error::{StoreError, StoreResult};

pub const SESSION_PATH: &str = "/api/user/is-auth";
pub const SELLER_PATH: &str = "/api/seller/is-auth";
pub const PRODUCT_LIST_PATH: &str = "/api/product/list";
pub const CART_UPDATE_PATH: &str = "/api/cart/update";

// =============================================================================
// Responses
// =============================================================================

/// Response of the session check.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AuthResponse {
    /// Returns the user when the backend confirmed the session.
    ///
    /// `success: true` without a user body is treated as a rejection.
    pub fn into_user(self) -> StoreResult<User> {
        match (self.success, self.user) {
            (true, Some(user)) => Ok(user),
            _ => Err(StoreError::rejected(self.message)),
        }
    }
}

/// Response of the seller check and of the cart update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ack {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Ack {
    pub fn ok() -> Self {
        Ack {
            success: true,
            message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Ack {
            success: false,
            message: Some(message.into()),
        }
    }

    pub fn into_result(self) -> StoreResult<()> {
        if self.success {
            Ok(())
        } else {
            Err(StoreError::rejected(self.message))
        }
    }
}

/// Response of the product list.
///
/// Entries that do not decode as a [`Product`] are dropped with a warning
/// instead of failing the whole list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductListResponse {
    pub success: bool,
    #[serde(default, deserialize_with = "deserialize_products")]
    pub products: Vec<Product>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ProductListResponse {
    pub fn into_products(self) -> StoreResult<Vec<Product>> {
        if self.success {
            Ok(self.products)
        } else {
            Err(StoreError::rejected(self.message))
        }
    }
}

/// Decodes each entry on its own, skipping the malformed ones.
pub(crate) fn decode_products(raw: Vec<Value>) -> Vec<Product> {
    raw.into_iter()
        .filter_map(|entry| {
            let id = entry.get("_id").and_then(Value::as_str).map(str::to_string);
            match serde_json::from_value::<Product>(entry) {
                Ok(product) => Some(product),
                Err(e) => {
                    warn!(product_id = ?id, error = %e, "Skipping malformed product");
                    None
                }
            }
        })
        .collect()
}

fn deserialize_products<'de, D>(deserializer: D) -> Result<Vec<Product>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?;
    Ok(decode_products(raw.unwrap_or_default()))
}

// =============================================================================
// Requests
// =============================================================================

/// Body of `POST /api/cart/update`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartUpdateRequest {
    pub cart_items: CartItems,
}
