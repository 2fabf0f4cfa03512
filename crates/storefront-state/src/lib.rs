//! # storefront-state: State Layer for the Storefront Client
//!
//! This crate holds everything the storefront UI reads and writes: the
//! session, the seller flag, the product catalog, the cart and the search
//! query. It also keeps the server-side cart in step with the local one.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Storefront State Architecture                      │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                    Storefront (store.rs)                         │  │
//! │  │                                                                  │  │
//! │  │  Single state container handed to the UI                        │  │
//! │  │  Cart snapshots are immutable and swapped on every change       │  │
//! │  └───────┬──────────────────────┬──────────────────────┬────────────┘  │
//! │          │                      │                      │ StoreEvent    │
//! │          ▼                      ▼                      ▼               │
//! │  ┌────────────────┐   ┌────────────────┐   ┌────────────────────────┐  │
//! │  │ session.rs     │   │ catalog.rs     │   │ SyncController         │  │
//! │  │                │   │                │   │ (sync.rs)              │  │
//! │  │ is-auth checks │   │ live or        │   │ POST full cart on      │  │
//! │  │ auth_resolved  │   │ fixture source │   │ each change while      │  │
//! │  │                │   │                │   │ signed in              │  │
//! │  └───────┬────────┘   └───────┬────────┘   └───────────┬────────────┘  │
//! │          └────────────────────┼────────────────────────┘               │
//! │                               ▼                                        │
//! │                  ┌────────────────────────────┐                        │
//! │                  │ StorefrontApi (client.rs)  │                        │
//! │                  │ reqwest + cookie session   │                        │
//! │                  └────────────────────────────┘                        │
//! │                                                                         │
//! │  USER FEEDBACK:                                                        │
//! │  • Notifier::success - cart actions ("Added to Cart", ...)             │
//! │  • Notifier::error   - catalog failures, rejected or failed pushes     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`store`] - `Storefront` state container and change events
//! - [`sync`] - `SyncController` pushing the cart to the backend
//! - [`session`] - Session and seller resolution
//! - [`catalog`] - Product list cache, live or fixture
//! - [`client`] - `StorefrontApi` trait and its reqwest implementation
//! - [`protocol`] - Endpoint paths and JSON envelopes
//! - [`notify`] - Success/error notifications for the UI
//! - [`config`] - Backend URL, currency, catalog source
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront_state::{Storefront, StorefrontConfig};
//!
//! let config = StorefrontConfig::load_or_default(None);
//! let store = Storefront::connect(config)?;
//!
//! // Spawns cart sync, then fetches session, seller flag and catalog.
//! let sync = store.start().await;
//!
//! store.add_to_cart("gd46g23h");
//! println!("{} items, {}", store.cart_count(), store.formatted_cart_amount()?);
//!
//! sync.shutdown().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod notify;
pub mod protocol;
pub mod session;
pub mod store;
pub mod sync;

#[cfg(test)]
mod fake;

// =============================================================================
// Re-exports
// =============================================================================

pub use catalog::{load_catalog, load_fixture, Catalog};
pub use client::{HttpClient, StorefrontApi};
pub use config::{ApiSettings, CatalogSettings, CatalogSource, DisplaySettings, StorefrontConfig};
pub use error::{StoreError, StoreResult};
pub use notify::{ChannelNotifier, Notification, NotificationLevel, Notifier, TracingNotifier};
pub use session::SessionState;
pub use store::{StoreEvent, Storefront};
pub use sync::{SyncController, SyncHandle, SyncStatus};

pub use storefront_core::{CartItems, Money, Product, SearchQuery, User};
