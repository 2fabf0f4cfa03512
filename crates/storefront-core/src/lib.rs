//! # storefront-core: Pure Domain Logic for the Storefront State Layer
//!
//! This crate holds the parts of the storefront client that can be reasoned
//! about without a network: the cart snapshot and its math, the money type
//! used for totals, and the wire shapes of users and products.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Storefront Client Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                        UI Layer                                 │   │
//! │  │    Product grid ──► Cart page ──► Seller dashboard              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Storefront handle                      │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 storefront-state (I/O layer)                    │   │
//! │  │   session • catalog • sync controller • HTTP client • config   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ storefront-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                  │   │
//! │  │   │   types   │  │   money   │  │   cart    │                  │   │
//! │  │   │  Product  │  │   Money   │  │ CartItems │                  │   │
//! │  │   │   User    │  │  floor    │  │ add/remove│                  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • IMMUTABLE SNAPSHOTS                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Wire types (`Product`, `User`, `SearchQuery`)
//! - [`money`] - Money type in integer cents with floor truncation
//! - [`cart`] - `CartItems` snapshot and the cart operations
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::{CartItems, Money, Product};
//!
//! let catalog = vec![Product::new("p1", "Apple", 24.0, 19.996)];
//!
//! let cart = CartItems::new().add_item("p1");
//! assert_eq!(cart.count_total(), 1);
//!
//! // 19.996 is truncated, not rounded
//! assert_eq!(cart.amount_total(&catalog).unwrap(), Money::from_cents(1999));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::CartItems;
pub use error::{CoreError, CoreResult};
pub use money::Money;
pub use types::{Product, SearchQuery, User};
