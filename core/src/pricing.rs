//! Authoritative cart pricing.
//!
//! The total a customer is charged is computed here, from the server-side
//! cart and catalog, and nowhere else. Whatever total the client claims is
//! never consulted.
//!
//! Cart rows whose product can no longer be resolved are excluded from the
//! sum rather than failing the whole computation; each exclusion is logged
//! and reported back to the caller so the checkout response can carry an
//! explicit warning instead of silently shrinking the order.

use crate::promo::PromoCode;
use crate::types::{CartItem, CartItemId, Money, Product, ProductId};

/// One priceable cart row, resolved against the catalog.
#[derive(Clone, Debug, PartialEq)]
pub struct PricedLine {
    /// The cart row this line came from.
    pub cart_item_id: CartItemId,
    /// Resolved product.
    pub product_id: ProductId,
    /// Product name at pricing time.
    pub name: String,
    /// Unit price at pricing time.
    pub unit_price: Money,
    /// Quantity ordered.
    pub quantity: u32,
    /// `unit_price × quantity`.
    pub line_total: Money,
}

/// The result of pricing a cart: resolved lines, skipped rows, subtotal.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CartQuote {
    /// Lines that participate in the total.
    pub lines: Vec<PricedLine>,
    /// Cart rows excluded because their product could not be resolved.
    pub skipped: Vec<CartItemId>,
    /// Sum of line totals before any discount.
    pub subtotal: Money,
}

impl CartQuote {
    /// Whether nothing in the cart could be priced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Prices a cart against the catalog lookups already performed.
///
/// Entries paired with `None` (dangling product reference, or a row that
/// never had one) are skipped and recorded in [`CartQuote::skipped`].
#[must_use]
pub fn quote_cart(entries: Vec<(CartItem, Option<Product>)>) -> CartQuote {
    let mut quote = CartQuote::default();
    for (item, product) in entries {
        match product {
            Some(product) => {
                let line_total = product.price.times(item.quantity);
                quote.subtotal += line_total;
                quote.lines.push(PricedLine {
                    cart_item_id: item.id,
                    product_id: product.id,
                    name: product.name,
                    unit_price: product.price,
                    quantity: item.quantity,
                    line_total,
                });
            },
            None => {
                tracing::warn!(
                    cart_item_id = %item.id,
                    product_id = ?item.product_id,
                    "cart row references a product that no longer exists, excluding from pricing"
                );
                quote.skipped.push(item.id);
            },
        }
    }
    quote
}

/// Applies an optional promo discount to a subtotal.
#[must_use]
pub fn total_with_promo(subtotal: Money, promo: Option<&PromoCode>) -> Money {
    match promo {
        Some(promo) => subtotal.apply_discount(promo.discount_percent),
        None => subtotal,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use crate::promo::PromoRegistry;
    use crate::types::UserId;

    fn product(id: &str, price: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("product {id}"),
            description: None,
            price: price.parse().unwrap(),
            weight: None,
            image_url: None,
            category_id: None,
            in_stock: true,
            is_popular: false,
        }
    }

    fn cart_item(id: &str, product_id: Option<&str>, quantity: u32) -> CartItem {
        CartItem {
            id: CartItemId::new(id),
            user_id: UserId::new("user-1"),
            product_id: product_id.map(ProductId::new),
            quantity,
        }
    }

    #[test]
    fn sums_line_totals() {
        let quote = quote_cart(vec![
            (cart_item("ci-1", Some("p-1"), 2), Some(product("p-1", "100.00"))),
            (cart_item("ci-2", Some("p-2"), 1), Some(product("p-2", "50.00"))),
        ]);
        assert_eq!(quote.subtotal, Money::from_cents(25000));
        assert_eq!(quote.lines.len(), 2);
        assert!(quote.skipped.is_empty());
        assert_eq!(quote.lines[0].line_total, Money::from_cents(20000));
    }

    #[test]
    fn skips_dangling_rows_without_failing() {
        let quote = quote_cart(vec![
            (cart_item("ci-1", Some("p-1"), 2), Some(product("p-1", "89.00"))),
            (cart_item("ci-2", Some("p-gone"), 3), None),
            (cart_item("ci-3", None, 1), None),
        ]);
        assert_eq!(quote.subtotal, Money::from_cents(17800));
        assert_eq!(
            quote.skipped,
            vec![CartItemId::new("ci-2"), CartItemId::new("ci-3")]
        );
    }

    #[test]
    fn empty_cart_quotes_to_zero() {
        let quote = quote_cart(vec![]);
        assert!(quote.is_empty());
        assert_eq!(quote.subtotal, Money::ZERO);
    }

    #[test]
    fn promo_discount_applies_multiplicatively() {
        let registry = PromoRegistry::with_default_codes();
        let promo = registry.resolve("ПЕРВЫЙ");
        assert_eq!(
            total_with_promo(Money::from_cents(25000), promo),
            Money::from_cents(20000)
        );
    }

    #[test]
    fn no_promo_keeps_subtotal() {
        assert_eq!(
            total_with_promo(Money::from_cents(25000), None),
            Money::from_cents(25000)
        );
    }
}
