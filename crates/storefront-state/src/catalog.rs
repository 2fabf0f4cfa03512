//! # Catalog Cache
//!
//! Holds the full product list. It is fetched once at startup (and again on
//! demand) and never paginated.
//!
//! ## Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CatalogSource::Live     GET /api/product/list                         │
//! │                          success:false → error notification (message)  │
//! │                          transport     → error notification (error)    │
//! │                                                                         │
//! │  CatalogSource::Fixture  JSON array from `fixture_path`, or the        │
//! │                          bundled fixtures/products.json                │
//! │                          no network traffic                            │
//! │                                                                         │
//! │  On any failure the previous product list stays in place.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use storefront_core::Product;
use tracing::{debug, info};

use crate::client::StorefrontApi;
use crate::config::{CatalogSettings, CatalogSource};
use crate::error::{StoreError, StoreResult};
use crate::protocol::decode_products;

/// Product list shipped with the crate for fixture mode.
const BUNDLED_FIXTURE: &str = include_str!("../fixtures/products.json");

/// Immutable product collection.
///
/// Replaced wholesale on every successful fetch; readers hold the `Arc`
/// they were handed.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Arc<Vec<Product>>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Catalog {
            products: Arc::new(products),
        }
    }

    pub fn products(&self) -> Arc<Vec<Product>> {
        Arc::clone(&self.products)
    }

    pub fn find(&self, product_id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Loads the product list from the configured source.
pub async fn load_catalog(
    api: &dyn StorefrontApi,
    settings: &CatalogSettings,
) -> StoreResult<Vec<Product>> {
    match settings.source {
        CatalogSource::Live => {
            let products = api.list_products().await?.into_products()?;
            info!(count = products.len(), "Catalog fetched");
            Ok(products)
        }
        CatalogSource::Fixture => {
            let products = load_fixture(settings.fixture_path.as_deref()).await?;
            info!(count = products.len(), "Catalog loaded from fixture");
            Ok(products)
        }
    }
}

/// Reads a fixture product list from `path`, or the bundled one.
///
/// Malformed entries are skipped the same way as in a live response.
pub async fn load_fixture(path: Option<&Path>) -> StoreResult<Vec<Product>> {
    let contents = match path {
        Some(path) => {
            debug!(?path, "Reading product fixture");
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| StoreError::FixtureLoadFailed(format!("{}: {}", path.display(), e)))?
        }
        None => BUNDLED_FIXTURE.to_string(),
    };

    let raw: Vec<Value> = serde_json::from_str(&contents)
        .map_err(|e| StoreError::FixtureLoadFailed(e.to_string()))?;
    Ok(decode_products(raw))
}
