//! Cart models.
//!
//! A cart line denormalizes the product's name, price and image as a
//! snapshot taken at add-time; it is not re-fetched when the catalog
//! changes. `subtotal` is derived from `product_price * quantity` but
//! stored redundantly because the server sends it on the wire - every
//! local mutator is responsible for keeping it consistent.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CartId, CartItemId, ProductId};
use super::product::Product;

/// Upper bound on a single line's quantity, matching the server's
/// validation.
pub const MAX_ITEM_QUANTITY: u32 = 999;

/// One line of the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Server-assigned id, or a non-positive placeholder for optimistic
    /// entries the server has not confirmed yet.
    pub id: CartItemId,
    /// The product this line refers to. At most one line per product.
    pub product_id: ProductId,
    /// Product name snapshot.
    pub product_name: String,
    /// Unit price snapshot.
    pub product_price: Decimal,
    /// Product image snapshot.
    pub product_image: Option<String>,
    /// Number of units, always >= 1.
    pub quantity: u32,
    /// Stored line subtotal; must equal [`Self::expected_subtotal`].
    pub subtotal: Decimal,
}

impl CartItem {
    /// Build an optimistic line for `quantity` units of `product`, with a
    /// zero id to be replaced by a placeholder on insertion.
    #[must_use]
    pub fn optimistic(product: &Product, quantity: u32) -> Self {
        Self {
            id: CartItemId::new(0),
            product_id: product.id,
            product_name: product.name.clone(),
            product_price: product.price,
            product_image: product.image.clone(),
            quantity,
            subtotal: product.price * Decimal::from(quantity),
        }
    }

    /// The subtotal this line should carry: `product_price * quantity`.
    #[must_use]
    pub fn expected_subtotal(&self) -> Decimal {
        self.product_price * Decimal::from(self.quantity)
    }
}

/// The cart as the server reports it: an ordered item list plus a total.
///
/// Also the shape persisted locally for optimistic continuity across
/// restarts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    /// Server-side cart id.
    pub id: CartId,
    /// Lines in insertion/display order.
    pub items: Vec<CartItem>,
    /// Cart total; equals the sum of line subtotals.
    pub total: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::id::ProductId;

    fn lamp() -> Product {
        Product {
            id: ProductId::new(5),
            name: "Desk lamp".to_string(),
            price: Decimal::from(1000),
            image: Some("lamp.jpg".to_string()),
            category: "Lighting".to_string(),
        }
    }

    #[test]
    fn test_optimistic_item_snapshots_product_fields() {
        let item = CartItem::optimistic(&lamp(), 3);

        assert_eq!(item.id, CartItemId::new(0));
        assert_eq!(item.product_id, ProductId::new(5));
        assert_eq!(item.product_name, "Desk lamp");
        assert_eq!(item.product_price, Decimal::from(1000));
        assert_eq!(item.quantity, 3);
        assert_eq!(item.subtotal, Decimal::from(3000));
        assert_eq!(item.subtotal, item.expected_subtotal());
    }

    #[test]
    fn test_cart_snapshot_decodes_from_wire_shape() {
        let json = r#"{
            "id": 12,
            "items": [{
                "id": 7,
                "product_id": 5,
                "product_name": "Desk lamp",
                "product_price": "1000",
                "product_image": null,
                "quantity": 2,
                "subtotal": "2000"
            }],
            "total": "2000"
        }"#;

        let cart: CartSnapshot = serde_json::from_str(json).expect("decode cart");
        assert_eq!(cart.id, CartId::new(12));
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.total, Decimal::from(2000));

        let item = cart.items.first().expect("one item");
        assert!(item.id.is_confirmed());
        assert_eq!(item.subtotal, item.expected_subtotal());
    }
}
