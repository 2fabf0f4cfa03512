//! # Money Module
//!
//! Provides the `Money` type used for cart totals.
//!
//! ## Where Floats End
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Product prices arrive from the API as JSON numbers (f64):              │
//! │                                                                         │
//! │    { "offerPrice": 19.996 }                                             │
//! │                                                                         │
//! │  Line sums are accumulated in f64, then converted ONCE:                 │
//! │                                                                         │
//! │    floor(19.996 × 100) = 1999 cents  →  19.99                           │
//! │                                                                         │
//! │  Truncation, not rounding: 19.996 never becomes 20.00.                  │
//! │  From that point on every value is integer cents.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::money::Money;
//!
//! let total = Money::floor_from_major(19.996);
//! assert_eq!(total.cents(), 1999);
//! assert_eq!(total.format_with("$"), "$19.99");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// Signed so that a cart holding negative quantities still produces a
/// representable total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a major-unit amount to cents by floor truncation.
    ///
    /// Computes `floor(amount × 100)`. This is the only place a float is
    /// turned into money, and it deliberately never rounds up.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// assert_eq!(Money::floor_from_major(19.996).cents(), 1999);
    /// assert_eq!(Money::floor_from_major(-0.001).cents(), -1);
    /// ```
    pub fn floor_from_major(amount: f64) -> Self {
        Money((amount * 100.0).floor() as i64)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Formats the amount prefixed with a currency symbol.
    ///
    /// The symbol comes from configuration (e.g. `"$"`, `"€"`), so `Display`
    /// itself stays symbol-free.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(-550).format_with("€"), "-€5.50");
    /// ```
    pub fn format_with(&self, currency: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            currency,
            self.major().abs(),
            self.cents_part()
        )
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with(""))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_floor_truncates_instead_of_rounding() {
        assert_eq!(Money::floor_from_major(19.996).cents(), 1999);
        assert_eq!(Money::floor_from_major(19.999).cents(), 1999);
        assert_eq!(Money::floor_from_major(20.0).cents(), 2000);
        assert_eq!(Money::floor_from_major(0.0).cents(), 0);
    }

    #[test]
    fn test_floor_of_negative_goes_down() {
        assert_eq!(Money::floor_from_major(-1.001).cents(), -101);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-5.50");
        assert_eq!(Money::from_cents(1999).format_with("$"), "$19.99");
    }
}
