//! Cart domain types and mutation logic.
//!
//! Every mutation recomputes the cart total from scratch as the sum of the
//! current item subtotals; the stored total is never trusted or patched
//! incrementally. Unit prices are passed in by the caller, freshly read from
//! the product catalog, so an item's subtotal reflects the price at its last
//! touch rather than a live join.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cartwheel_core::{CartId, Price, ProductId, UserId};

/// Errors from cart mutations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// The product is not in the cart.
    #[error("product not found in cart")]
    ItemNotFound,

    /// Adding the quantity would overflow the line's counter.
    #[error("quantity too large")]
    QuantityOverflow,
}

/// One line in a cart: a product reference, a quantity, and the subtotal
/// computed at the time of the last mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub subtotal: Price,
}

/// A user's pending selection of products awaiting checkout.
#[derive(Debug, Clone)]
pub struct Cart {
    /// Unique cart ID.
    pub id: CartId,
    /// Owning user (one cart per user).
    pub user_id: UserId,
    /// Cart lines, at most one per product.
    pub items: Vec<CartItem>,
    /// Sum of item subtotals; recomputed after every mutation.
    pub total_price: Price,
    /// When the cart was created.
    pub created_at: DateTime<Utc>,
}

impl Cart {
    /// Whether the cart has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the cart contains a line for `product_id`.
    #[must_use]
    pub fn has_item(&self, product_id: ProductId) -> bool {
        self.items.iter().any(|i| i.product_id == product_id)
    }

    /// Add `quantity` units of a product at the given unit price.
    ///
    /// If the product is already in the cart its quantity is incremented and
    /// the line subtotal recomputed at `unit_price`; otherwise a new line is
    /// appended. The cart total is recomputed either way.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::QuantityOverflow`] if the merged quantity would
    /// not fit; the cart is left unchanged.
    pub fn add_item(
        &mut self,
        product_id: ProductId,
        quantity: u32,
        unit_price: Price,
    ) -> Result<(), CartError> {
        match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(item) => {
                item.quantity = item
                    .quantity
                    .checked_add(quantity)
                    .ok_or(CartError::QuantityOverflow)?;
                item.subtotal = unit_price.times(item.quantity);
            }
            None => {
                self.items.push(CartItem {
                    product_id,
                    quantity,
                    subtotal: unit_price.times(quantity),
                });
            }
        }
        self.recompute_total();
        Ok(())
    }

    /// Set the quantity of an existing line at the given unit price.
    ///
    /// A quantity of zero or less removes the line entirely.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if the product is not in the cart.
    pub fn set_quantity(
        &mut self,
        product_id: ProductId,
        quantity: i32,
        unit_price: Price,
    ) -> Result<(), CartError> {
        let idx = self
            .items
            .iter()
            .position(|i| i.product_id == product_id)
            .ok_or(CartError::ItemNotFound)?;

        match u32::try_from(quantity) {
            Ok(q) if q > 0 => {
                if let Some(item) = self.items.get_mut(idx) {
                    item.quantity = q;
                    item.subtotal = unit_price.times(q);
                }
            }
            _ => {
                self.items.remove(idx);
            }
        }
        self.recompute_total();
        Ok(())
    }

    /// Remove a line from the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if the product is not in the cart.
    pub fn remove_item(&mut self, product_id: ProductId) -> Result<(), CartError> {
        let idx = self
            .items
            .iter()
            .position(|i| i.product_id == product_id)
            .ok_or(CartError::ItemNotFound)?;
        self.items.remove(idx);
        self.recompute_total();
        Ok(())
    }

    /// Empty the cart and reset the total to zero.
    pub fn clear(&mut self) {
        self.items.clear();
        self.recompute_total();
    }

    fn recompute_total(&mut self) {
        self.total_price = self.items.iter().map(|i| i.subtotal).sum();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn price(cents: i64) -> Price {
        Price::new(Decimal::new(cents, 2)).unwrap()
    }

    fn empty_cart() -> Cart {
        Cart {
            id: CartId::new(1),
            user_id: UserId::new(1),
            items: Vec::new(),
            total_price: Price::ZERO,
            created_at: Utc::now(),
        }
    }

    fn total_of_subtotals(cart: &Cart) -> Price {
        cart.items.iter().map(|i| i.subtotal).sum()
    }

    #[test]
    fn test_add_new_item() {
        let mut cart = empty_cart();
        cart.add_item(ProductId::new(10), 2, price(1000)).unwrap();

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 2);
        assert_eq!(cart.items[0].subtotal, price(2000));
        assert_eq!(cart.total_price, price(2000));
    }

    #[test]
    fn test_add_same_product_merges_quantities() {
        let mut cart = empty_cart();
        cart.add_item(ProductId::new(10), 2, price(1000)).unwrap();
        cart.add_item(ProductId::new(10), 3, price(1000)).unwrap();

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 5);
        assert_eq!(cart.items[0].subtotal, price(5000));
        assert_eq!(cart.total_price, price(5000));
    }

    #[test]
    fn test_add_reprices_merged_line_at_current_price() {
        let mut cart = empty_cart();
        cart.add_item(ProductId::new(10), 2, price(1000)).unwrap();
        // Price went up before the second add; the whole line reflects it.
        cart.add_item(ProductId::new(10), 1, price(1200)).unwrap();

        assert_eq!(cart.items[0].quantity, 3);
        assert_eq!(cart.items[0].subtotal, price(3600));
    }

    #[test]
    fn test_price_change_does_not_rewrite_untouched_items() {
        let mut cart = empty_cart();
        cart.add_item(ProductId::new(10), 2, price(1000)).unwrap();
        cart.add_item(ProductId::new(20), 1, price(500)).unwrap();

        // Product 20's price changes; only its line is touched.
        cart.set_quantity(ProductId::new(20), 2, price(600)).unwrap();

        assert_eq!(cart.items[0].subtotal, price(2000));
        assert_eq!(cart.items[1].subtotal, price(1200));
        assert_eq!(cart.total_price, price(3200));
    }

    #[test]
    fn test_add_overflowing_quantity_rejected() {
        let mut cart = empty_cart();
        cart.add_item(ProductId::new(10), u32::MAX, price(100)).unwrap();

        assert_eq!(
            cart.add_item(ProductId::new(10), 1, price(100)),
            Err(CartError::QuantityOverflow)
        );

        // The failed add leaves the line and total untouched.
        assert_eq!(cart.items[0].quantity, u32::MAX);
        assert_eq!(cart.total_price, total_of_subtotals(&cart));
    }

    #[test]
    fn test_set_quantity_zero_removes_item() {
        let mut cart = empty_cart();
        cart.add_item(ProductId::new(10), 5, price(1000)).unwrap();
        cart.set_quantity(ProductId::new(10), 0, price(1000)).unwrap();

        assert!(cart.is_empty());
        assert_eq!(cart.total_price, Price::ZERO);
    }

    #[test]
    fn test_set_quantity_negative_removes_item() {
        let mut cart = empty_cart();
        cart.add_item(ProductId::new(10), 5, price(1000)).unwrap();
        cart.add_item(ProductId::new(20), 1, price(250)).unwrap();
        cart.set_quantity(ProductId::new(10), -3, price(1000)).unwrap();

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.total_price, price(250));
    }

    #[test]
    fn test_set_quantity_missing_item() {
        let mut cart = empty_cart();
        assert_eq!(
            cart.set_quantity(ProductId::new(10), 1, price(1000)),
            Err(CartError::ItemNotFound)
        );
    }

    #[test]
    fn test_remove_item() {
        let mut cart = empty_cart();
        cart.add_item(ProductId::new(10), 2, price(1000)).unwrap();
        cart.add_item(ProductId::new(20), 1, price(500)).unwrap();

        cart.remove_item(ProductId::new(10)).unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.total_price, price(500));

        assert_eq!(
            cart.remove_item(ProductId::new(10)),
            Err(CartError::ItemNotFound)
        );
    }

    #[test]
    fn test_clear() {
        let mut cart = empty_cart();
        cart.add_item(ProductId::new(10), 2, price(1000)).unwrap();
        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.total_price, Price::ZERO);
    }

    #[test]
    fn test_total_always_equals_sum_of_subtotals() {
        let mut cart = empty_cart();
        cart.add_item(ProductId::new(1), 2, price(999)).unwrap();
        assert_eq!(cart.total_price, total_of_subtotals(&cart));

        cart.add_item(ProductId::new(2), 7, price(125)).unwrap();
        assert_eq!(cart.total_price, total_of_subtotals(&cart));

        cart.set_quantity(ProductId::new(1), 1, price(1099)).unwrap();
        assert_eq!(cart.total_price, total_of_subtotals(&cart));

        cart.remove_item(ProductId::new(2)).unwrap();
        assert_eq!(cart.total_price, total_of_subtotals(&cart));

        cart.clear();
        assert_eq!(cart.total_price, Price::ZERO);
    }

    #[test]
    fn test_add_merge_then_zero_walkthrough() {
        // Add P(price=10) qty 2 -> total 20; add P qty 3 -> qty 5, subtotal 50,
        // total 50; set quantity 0 -> item removed, total 0.
        let mut cart = empty_cart();
        let p = ProductId::new(1);

        cart.add_item(p, 2, price(1000)).unwrap();
        assert_eq!(cart.total_price, price(2000));

        cart.add_item(p, 3, price(1000)).unwrap();
        assert_eq!(cart.items[0].quantity, 5);
        assert_eq!(cart.items[0].subtotal, price(5000));
        assert_eq!(cart.total_price, price(5000));

        cart.set_quantity(p, 0, price(1000)).unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.total_price, Price::ZERO);
    }
}
