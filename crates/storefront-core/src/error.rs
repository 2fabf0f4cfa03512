//! # Error Types
//!
//! Domain-specific error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storefront-core errors (this file)                                    │
//! │  └── CoreError        - Cart math against the catalog                  │
//! │                                                                         │
//! │  storefront-state errors (separate crate)                              │
//! │  └── StoreError       - Transport, rejection, config failures          │
//! │                                                                         │
//! │  Flow: CoreError → StoreError → Notification / caller                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A cart line references a product that is not in the catalog.
    ///
    /// ## When This Occurs
    /// - The product was delisted after it was added to the cart
    /// - The cart was seeded from a user record before the catalog loaded
    #[error("Product not found: {0}")]
    ProductNotFound(String),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::ProductNotFound("p-404".to_string());
        assert_eq!(err.to_string(), "Product not found: p-404");
    }
}
