//! Order domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cartwheel_core::{OrderId, OrderStatus, Price, ProductId, UserId};

use super::cart::{Cart, CartItem};

/// One line of an order: a snapshot of a cart line at checkout time.
///
/// References the product by ID only; later price changes never rewrite it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub subtotal: Price,
}

impl From<CartItem> for OrderItem {
    fn from(item: CartItem) -> Self {
        Self {
            product_id: item.product_id,
            quantity: item.quantity,
            subtotal: item.subtotal,
        }
    }
}

/// An immutable record of a completed checkout.
///
/// Only [`Order::status`] may change after creation.
#[derive(Debug, Clone)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// User who placed the order.
    pub user_id: UserId,
    /// Snapshot of the cart items at checkout.
    pub items: Vec<OrderItem>,
    /// Snapshot of the cart total at checkout.
    pub total_price: Price,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// When the order was placed.
    pub ordered_on: DateTime<Utc>,
}

/// Snapshot a cart's lines into order lines.
#[must_use]
pub fn snapshot_items(cart: &Cart) -> Vec<OrderItem> {
    cart.items.iter().cloned().map(OrderItem::from).collect()
}

/// Snapshot a cart for checkout.
///
/// Returns `None` when the cart has no items; a checkout must be rejected
/// rather than producing an empty order.
#[must_use]
pub fn checkout_snapshot(cart: &Cart) -> Option<(Vec<OrderItem>, Price)> {
    if cart.is_empty() {
        return None;
    }
    Some((snapshot_items(cart), cart.total_price))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cartwheel_core::CartId;
    use rust_decimal::Decimal;

    fn cart() -> Cart {
        Cart {
            id: CartId::new(1),
            user_id: UserId::new(1),
            items: Vec::new(),
            total_price: Price::ZERO,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_snapshot_matches_cart() {
        let price = Price::new(Decimal::new(1000, 2)).unwrap();
        let mut cart = cart();
        cart.add_item(ProductId::new(1), 2, price).unwrap();
        cart.add_item(ProductId::new(2), 1, price).unwrap();

        let items = snapshot_items(&cart);
        assert_eq!(items.len(), 2);
        let snapshot_total: Price = items.iter().map(|i| i.subtotal).sum();
        assert_eq!(snapshot_total, cart.total_price);
    }

    #[test]
    fn test_empty_cart_yields_no_checkout_snapshot() {
        assert!(checkout_snapshot(&cart()).is_none());
    }

    #[test]
    fn test_checkout_snapshot_then_clear() {
        let price = Price::new(Decimal::new(750, 2)).unwrap();
        let mut cart = cart();
        cart.add_item(ProductId::new(1), 3, price).unwrap();
        cart.add_item(ProductId::new(2), 1, price).unwrap();

        let before = cart.items.clone();
        let (items, total) = checkout_snapshot(&cart).unwrap();

        // The snapshot mirrors the pre-checkout cart exactly.
        assert_eq!(items.len(), before.len());
        for (order_item, cart_item) in items.iter().zip(&before) {
            assert_eq!(order_item.product_id, cart_item.product_id);
            assert_eq!(order_item.quantity, cart_item.quantity);
            assert_eq!(order_item.subtotal, cart_item.subtotal);
        }
        assert_eq!(total, cart.total_price);

        // Clearing after the snapshot leaves the cart empty with total 0,
        // and the snapshot is unaffected.
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_price, Price::ZERO);
        assert_eq!(items.len(), 2);
        assert_eq!(total, price.times(4));
    }
}
