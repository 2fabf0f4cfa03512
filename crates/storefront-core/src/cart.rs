//! # Cart Snapshot
//!
//! `CartItems` maps a product id to the desired quantity. It is an immutable
//! snapshot: every operation takes `&self` and returns a brand-new value, so a
//! consumer holding a previous snapshot never sees it change underneath it.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Snapshot Operations                             │
//! │                                                                         │
//! │  UI Action              Operation                 New Snapshot          │
//! │  ─────────              ─────────                 ────────────          │
//! │                                                                         │
//! │  "Add to cart" ────────► add_item(id) ──────────► {id: qty + 1}        │
//! │                                                                         │
//! │  Quantity picker ──────► set_quantity(id, n) ───► {id: n} (0 kept!)    │
//! │                                                                         │
//! │  "−" button ───────────► remove_one(id) ────────► {id: qty - 1}        │
//! │                                                   (key dropped at 0)    │
//! │                                                                         │
//! │  Cart badge ───────────► count_total() ─────────► (read only)          │
//! │                                                                         │
//! │  Checkout summary ─────► amount_total(catalog) ─► (read only)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Zero Quantities
//! `remove_one` deletes a key when it reaches zero, while `set_quantity(id, 0)`
//! stores the zero verbatim. Both paths are kept as-is because the totals
//! already cope with either shape: `count_total` adds a zero and
//! `amount_total` skips lines with a non-positive quantity.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Product;

/// Product id → quantity.
///
/// Serializes as a plain JSON object (`{"p1": 2}`), which is the shape the
/// backend stores on the user and accepts on `POST /api/cart/update`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartItems(BTreeMap<String, i64>);

impl CartItems {
    /// Creates an empty cart.
    pub fn new() -> Self {
        CartItems(BTreeMap::new())
    }

    // =========================================================================
    // Mutations (each returns a new snapshot)
    // =========================================================================

    /// Adds one unit of a product.
    ///
    /// An absent key, or a key currently holding zero, starts at 1.
    pub fn add_item(&self, product_id: &str) -> CartItems {
        let mut next = self.clone();
        match next.0.get_mut(product_id) {
            Some(qty) if *qty != 0 => *qty += 1,
            _ => {
                next.0.insert(product_id.to_string(), 1);
            }
        }
        next
    }

    /// Sets the quantity of a product verbatim.
    ///
    /// Zero and negative values are stored as given; use [`remove_one`] for
    /// the path that drops keys.
    ///
    /// [`remove_one`]: CartItems::remove_one
    pub fn set_quantity(&self, product_id: &str, quantity: i64) -> CartItems {
        let mut next = self.clone();
        next.0.insert(product_id.to_string(), quantity);
        next
    }

    /// Removes one unit of a product, dropping the key when it hits zero.
    ///
    /// Absent keys and keys already at zero are left untouched.
    pub fn remove_one(&self, product_id: &str) -> CartItems {
        let mut next = self.clone();
        if let Some(qty) = next.0.get_mut(product_id) {
            if *qty != 0 {
                *qty -= 1;
                if *qty == 0 {
                    next.0.remove(product_id);
                }
            }
        }
        next
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Sum of all quantities.
    pub fn count_total(&self) -> i64 {
        self.0.values().sum()
    }

    /// Total price of the cart at offer prices, floor-truncated to cents.
    ///
    /// Lines with a non-positive quantity are skipped without a catalog
    /// lookup. A positive line whose product is not in `catalog` fails with
    /// [`CoreError::ProductNotFound`] instead of being priced at zero.
    pub fn amount_total(&self, catalog: &[Product]) -> CoreResult<Money> {
        let mut total = 0.0_f64;
        for (product_id, &qty) in &self.0 {
            if qty <= 0 {
                continue;
            }
            let product = catalog
                .iter()
                .find(|p| p.id == *product_id)
                .ok_or_else(|| CoreError::ProductNotFound(product_id.clone()))?;
            total += product.offer_price * qty as f64;
        }
        Ok(Money::floor_from_major(total))
    }

    /// Quantity stored for a product, if the key is present.
    pub fn quantity(&self, product_id: &str) -> Option<i64> {
        self.0.get(product_id).copied()
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.0.contains_key(product_id)
    }

    /// Number of distinct keys (including zero-quantity ones).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates `(product_id, quantity)` in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.0.iter().map(|(id, qty)| (id.as_str(), *qty))
    }
}

impl FromIterator<(String, i64)> for CartItems {
    fn from_iter<I: IntoIterator<Item = (String, i64)>>(iter: I) -> Self {
        CartItems(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[(&str, i64); N]> for CartItems {
    fn from(entries: [(&str, i64); N]) -> Self {
        entries
            .into_iter()
            .map(|(id, qty)| (id.to_string(), qty))
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashMap;

    fn catalog() -> Vec<Product> {
        vec![
            Product::new("p1", "Apple", 24.0, 19.996),
            Product::new("p2", "Bread", 5.0, 3.5),
        ]
    }

    #[test]
    fn test_add_item_starts_at_one_and_increments() {
        let cart = CartItems::new().add_item("p1");
        assert_eq!(cart.quantity("p1"), Some(1));

        let cart = cart.add_item("p1");
        assert_eq!(cart.quantity("p1"), Some(2));
    }

    #[test]
    fn test_mutations_do_not_touch_previous_snapshot() {
        let before = CartItems::from([("p1", 1)]);
        let after = before.add_item("p1").add_item("p2").remove_one("p1");

        assert_eq!(before, CartItems::from([("p1", 1)]));
        assert_eq!(after, CartItems::from([("p1", 1), ("p2", 1)]));
    }

    #[test]
    fn test_add_then_remove_restores_cart() {
        let start = CartItems::from([("p2", 3)]);
        let round_trip = start.add_item("p1").remove_one("p1");
        assert_eq!(round_trip, start);
    }

    #[test]
    fn test_remove_one_on_absent_key_is_noop() {
        let start = CartItems::from([("p1", 2)]);
        assert_eq!(start.remove_one("missing"), start);
    }

    #[test]
    fn test_remove_one_drops_key_at_zero() {
        let cart = CartItems::from([("p1", 1)]).remove_one("p1");
        assert!(!cart.contains("p1"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_zero_keeps_key() {
        let cart = CartItems::from([("p1", 4)]).set_quantity("p1", 0);
        assert_eq!(cart.quantity("p1"), Some(0));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.count_total(), 0);
    }

    #[test]
    fn test_zero_quantity_key_is_left_alone_by_remove_and_reset_by_add() {
        let zeroed = CartItems::from([("p1", 0)]);
        assert_eq!(zeroed.remove_one("p1"), zeroed);
        assert_eq!(zeroed.add_item("p1").quantity("p1"), Some(1));
    }

    #[test]
    fn test_count_matches_reference_over_random_sequences() {
        let mut rng = StdRng::seed_from_u64(7);
        let ids = ["a", "b", "c", "d"];

        for _ in 0..50 {
            let mut cart = CartItems::new();
            let mut reference: HashMap<&str, i64> = HashMap::new();

            for _ in 0..200 {
                let id = ids[rng.gen_range(0..ids.len())];
                if rng.gen_bool(0.6) {
                    cart = cart.add_item(id);
                    *reference.entry(id).or_insert(0) += 1;
                } else {
                    cart = cart.remove_one(id);
                    if let Some(qty) = reference.get_mut(id) {
                        *qty -= 1;
                        if *qty == 0 {
                            reference.remove(id);
                        }
                    }
                }
                assert_eq!(cart.count_total(), reference.values().sum::<i64>());
                assert_eq!(cart.len(), reference.len());
            }
        }
    }

    #[test]
    fn test_amount_total_is_floor_truncated() {
        let cart = CartItems::new().add_item("p1");
        assert_eq!(cart, CartItems::from([("p1", 1)]));
        assert_eq!(cart.amount_total(&catalog()).unwrap(), Money::from_cents(1999));
    }

    #[test]
    fn test_amount_total_sums_lines() {
        // 2 × 19.996 + 3 × 3.5 = 50.492 → 50.49
        let cart = CartItems::from([("p1", 2), ("p2", 3)]);
        assert_eq!(cart.amount_total(&catalog()).unwrap().cents(), 5049);
    }

    #[test]
    fn test_amount_total_is_deterministic() {
        let cart = CartItems::from([("p1", 5), ("p2", 7)]);
        let first = cart.amount_total(&catalog()).unwrap();
        assert_eq!(cart.amount_total(&catalog()).unwrap(), first);
    }

    #[test]
    fn test_amount_total_skips_non_positive_lines() {
        // The unknown product is never looked up because its quantity is 0.
        let cart = CartItems::from([("p2", 2), ("gone", 0)]);
        assert_eq!(cart.amount_total(&catalog()).unwrap().cents(), 700);
    }

    #[test]
    fn test_amount_total_unknown_product_is_an_error() {
        let cart = CartItems::from([("gone", 1)]);
        assert_eq!(
            cart.amount_total(&catalog()),
            Err(CoreError::ProductNotFound("gone".to_string()))
        );
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let cart = CartItems::from([("p1", 2)]);
        assert_eq!(serde_json::to_string(&cart).unwrap(), r#"{"p1":2}"#);
    }
}
