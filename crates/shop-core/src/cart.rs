//! Cart Summary
//!
//! Joins the server-side cart (product ids and quantities) with catalog
//! products so views can show names, line totals and the subtotal.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::model::{Cart, CartItem, CheckoutRequest, Product};

/// One cart row with its resolved product
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// Cart resolved against the catalog
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CartSummary {
    pub lines: Vec<CartLine>,
}

impl CartSummary {
    /// Resolve cart items against `products`.
    ///
    /// Items whose product is no longer in the catalog are skipped.
    pub fn resolve(cart: &Cart, products: &[Product]) -> Self {
        let by_id: HashMap<&str, &Product> = products.iter().map(|p| (p.id.as_str(), p)).collect();

        let lines = cart
            .items
            .iter()
            .filter_map(|item| match by_id.get(item.product_id.as_str()) {
                Some(product) => Some(CartLine {
                    product: (*product).clone(),
                    quantity: item.quantity,
                }),
                None => {
                    tracing::debug!(product_id = %item.product_id, "Cart item not in catalog");
                    None
                }
            })
            .collect();

        Self { lines }
    }

    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Total number of units across all lines
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Items to submit for checkout
    pub fn items(&self) -> Vec<CartItem> {
        self.lines
            .iter()
            .map(|l| CartItem::new(l.product.id.clone(), l.quantity))
            .collect()
    }

    /// Build a checkout request returning to `origin_url`
    pub fn checkout_request(&self, origin_url: impl Into<String>) -> CheckoutRequest {
        CheckoutRequest {
            items: self.items(),
            origin_url: origin_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product(id: &str, price: Decimal) -> Product {
        Product {
            id: id.into(),
            name: format!("Product {id}"),
            description: String::new(),
            price,
            category: "Shoes".into(),
            image_url: String::new(),
            stock: 10,
            created_at: None,
        }
    }

    fn cart(items: Vec<CartItem>) -> Cart {
        Cart {
            items,
            ..Default::default()
        }
    }

    #[test]
    fn test_subtotal_and_count() {
        let products = vec![product("a", dec!(19.99)), product("b", dec!(5.50))];
        let summary = CartSummary::resolve(
            &cart(vec![CartItem::new("a", 2), CartItem::new("b", 3)]),
            &products,
        );

        assert_eq!(summary.lines.len(), 2);
        assert_eq!(summary.lines[0].line_total(), dec!(39.98));
        assert_eq!(summary.subtotal(), dec!(56.48));
        assert_eq!(summary.item_count(), 5);
    }

    #[test]
    fn test_unknown_products_are_skipped() {
        let products = vec![product("a", dec!(10))];
        let summary = CartSummary::resolve(
            &cart(vec![CartItem::new("gone", 1), CartItem::new("a", 1)]),
            &products,
        );

        assert_eq!(summary.lines.len(), 1);
        assert_eq!(summary.subtotal(), dec!(10));
    }

    #[test]
    fn test_checkout_request_trims_origin() {
        let products = vec![product("a", dec!(10))];
        let summary = CartSummary::resolve(&cart(vec![CartItem::new("a", 4)]), &products);

        let request = summary.checkout_request("https://shop.example.com/");
        assert_eq!(request.origin_url, "https://shop.example.com");
        assert_eq!(request.items, vec![CartItem::new("a", 4)]);
    }

    #[test]
    fn test_empty_summary() {
        let summary = CartSummary::resolve(&Cart::default(), &[]);
        assert!(summary.is_empty());
        assert_eq!(summary.subtotal(), Decimal::ZERO);
    }
}
