//! Cart pricing and simulated payment.
//!
//! Pricing is a pure function of the cart and the product rows it refers
//! to. Payment always succeeds; only the last four card digits are kept.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hbr_pharmacy_core::{Price, ProductId};

use crate::models::{Cart, Product};

/// Flat shipping fee in centavos (R$ 7,90).
pub const SHIPPING_FEE_CENTS: u32 = 790;

/// Flat shipping fee charged on every order.
#[must_use]
pub fn shipping_fee() -> Price {
    Price::from_cents(SHIPPING_FEE_CENTS)
}

/// One cart entry joined with its product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
    /// Unit price times quantity.
    pub line_total: Price,
}

/// Priced view of a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary {
    pub lines: Vec<CartLine>,
    /// Sum of line totals.
    pub subtotal: Price,
    pub shipping: Price,
    /// Subtotal plus shipping.
    pub grand_total: Price,
}

impl CartSummary {
    /// Units across all priced lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0, |acc, line| acc.saturating_add(line.quantity))
    }
}

/// Price a cart against the given product rows.
///
/// Entries whose product is not in `products` are skipped; they stay in the
/// cart but contribute nothing.
#[must_use]
pub fn summarize(cart: &Cart, products: &[Product]) -> CartSummary {
    let by_id: HashMap<ProductId, &Product> = products.iter().map(|p| (p.id, p)).collect();

    let lines: Vec<CartLine> = cart
        .iter()
        .filter_map(|(id, quantity)| {
            let product = by_id.get(&id)?;
            Some(CartLine {
                product: (*product).clone(),
                quantity,
                line_total: product.price * quantity,
            })
        })
        .collect();

    let subtotal: Price = lines.iter().map(|line| line.line_total).sum();
    let shipping = shipping_fee();

    CartSummary {
        lines,
        subtotal,
        shipping,
        grand_total: subtotal + shipping,
    }
}

/// Card fields from the checkout form. Nothing is validated.
#[derive(Clone, Default, Deserialize)]
pub struct PaymentDetails {
    #[serde(default)]
    pub card_name: String,
    #[serde(default)]
    pub card_number: String,
    #[serde(default)]
    pub expiration: String,
    #[serde(default)]
    pub cvv: String,
}

impl PaymentDetails {
    /// Last four digits of the card number, if it has at least four.
    #[must_use]
    pub fn card_last4(&self) -> Option<String> {
        let digits: Vec<char> = self
            .card_number
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        if digits.len() < 4 {
            return None;
        }
        Some(digits[digits.len() - 4..].iter().collect())
    }
}

impl fmt::Debug for PaymentDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentDetails")
            .field("card_name", &self.card_name)
            .field("card_last4", &self.card_last4())
            .field("expiration", &"[REDACTED]")
            .field("cvv", &"[REDACTED]")
            .finish()
    }
}

/// Receipt kept in the session for the success page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmedOrder {
    pub item_count: u32,
    pub subtotal: Price,
    pub shipping: Price,
    pub grand_total: Price,
    pub card_last4: Option<String>,
    pub confirmed_at: DateTime<Utc>,
}

/// Accept the simulated payment and empty the cart.
#[must_use]
pub fn confirm(cart: &mut Cart, summary: &CartSummary, payment: &PaymentDetails) -> ConfirmedOrder {
    cart.clear();

    ConfirmedOrder {
        item_count: summary.item_count(),
        subtotal: summary.subtotal,
        shipping: summary.shipping,
        grand_total: summary.grand_total,
        card_last4: payment.card_last4(),
        confirmed_at: Utc::now(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use crate::models::CartAction;

    use super::*;

    fn product(id: i32, name: &str, cents: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            price: Price::from_cents(cents),
            image: format!("remedio{id}.webp"),
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product(1, "Paracetamol 750mg", 1250),
            product(2, "Vitamina C", 3590),
            product(3, "Dipirona Mono", 820),
        ]
    }

    #[test]
    fn test_two_paracetamol() {
        let a = ProductId::new(1);
        let mut cart = Cart::new();
        cart.add(a);
        cart.add(a);

        let summary = summarize(&cart, &catalog());
        assert_eq!(summary.subtotal, Price::from_cents(2500));
        assert_eq!(summary.shipping, Price::from_cents(790));
        assert_eq!(summary.grand_total, Price::from_cents(3290));
        assert_eq!(summary.grand_total.display(), "R$ 32,90");

        cart.apply(a, CartAction::Remove);
        cart.apply(a, CartAction::Remove);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_readd_after_removing_to_zero() {
        let a = ProductId::new(1);
        let mut cart = Cart::new();
        cart.add(a);
        cart.apply(a, CartAction::Remove);
        assert!(cart.is_empty());

        // The cart-page "+" link does nothing once the entry is gone.
        assert!(!cart.apply(a, CartAction::Add));
        assert!(cart.is_empty());

        cart.add(a);
        cart.add(a);
        let summary = summarize(&cart, &catalog());
        assert_eq!(summary.subtotal.display(), "R$ 25,00");
        assert_eq!(summary.grand_total.display(), "R$ 32,90");
    }

    #[test]
    fn test_empty_cart_costs_shipping_only() {
        let summary = summarize(&Cart::new(), &catalog());
        assert!(summary.lines.is_empty());
        assert_eq!(summary.subtotal, Price::ZERO);
        assert_eq!(summary.grand_total, shipping_fee());
    }

    #[test]
    fn test_subtotal_is_linear_in_quantities() {
        let mut single = Cart::new();
        let mut double = Cart::new();
        for (id, times) in [(1, 1), (2, 3), (3, 2)] {
            for _ in 0..times {
                single.add(ProductId::new(id));
                double.add(ProductId::new(id));
                double.add(ProductId::new(id));
            }
        }

        let s1 = summarize(&single, &catalog());
        let s2 = summarize(&double, &catalog());
        assert_eq!(s2.subtotal, s1.subtotal + s1.subtotal);
        assert_eq!(s2.shipping, s1.shipping);
    }

    #[test]
    fn test_missing_products_are_skipped_not_removed() {
        let mut cart = Cart::new();
        cart.add(ProductId::new(1));
        cart.add(ProductId::new(99));

        let summary = summarize(&cart, &catalog());
        assert_eq!(summary.lines.len(), 1);
        assert_eq!(summary.item_count(), 1);
        assert_eq!(summary.subtotal, Price::from_cents(1250));
        assert_eq!(cart.quantity(ProductId::new(99)), 1);
    }

    #[test]
    fn test_line_totals() {
        let mut cart = Cart::new();
        for _ in 0..3 {
            cart.add(ProductId::new(3));
        }
        let summary = summarize(&cart, &catalog());
        assert_eq!(summary.lines[0].line_total, Price::from_cents(2460));
        assert_eq!(summary.lines[0].product.name, "Dipirona Mono");
    }

    #[test]
    fn test_confirm_clears_cart_and_keeps_last4_only() {
        let mut cart = Cart::new();
        cart.add(ProductId::new(2));
        let summary = summarize(&cart, &catalog());
        let payment = PaymentDetails {
            card_name: "MARIA SOUZA".to_string(),
            card_number: "4111 1111 1111 1234".to_string(),
            expiration: "12/30".to_string(),
            cvv: "123".to_string(),
        };

        let order = confirm(&mut cart, &summary, &payment);
        assert!(cart.is_empty());
        assert_eq!(order.item_count, 1);
        assert_eq!(order.grand_total, Price::from_cents(3590 + 790));
        assert_eq!(order.card_last4.as_deref(), Some("1234"));

        let stored = serde_json::to_string(&order).unwrap();
        assert!(!stored.contains("4111 1111"));
    }

    #[test]
    fn test_card_last4_needs_four_digits() {
        let short = PaymentDetails {
            card_number: "12a".to_string(),
            ..PaymentDetails::default()
        };
        assert_eq!(short.card_last4(), None);
    }

    #[test]
    fn test_payment_debug_hides_card_data() {
        let payment = PaymentDetails {
            card_name: "MARIA".to_string(),
            card_number: "5555444433332222".to_string(),
            expiration: "01/29".to_string(),
            cvv: "987".to_string(),
        };
        let output = format!("{payment:?}");
        assert!(!output.contains("5555444433332222"));
        assert!(!output.contains("987"));
        assert!(output.contains("2222"));
    }

    proptest! {
        #[test]
        fn prop_subtotal_is_linear(
            quantities in prop::collection::btree_map(1..=5i32, 1u32..40, 0..5)
        ) {
            // Ids 4 and 5 are not in the catalog and must price as zero.
            let mut single = Cart::new();
            let mut double = Cart::new();
            for (&id, &quantity) in &quantities {
                for _ in 0..quantity {
                    single.add(ProductId::new(id));
                    double.add(ProductId::new(id));
                    double.add(ProductId::new(id));
                }
            }

            let s1 = summarize(&single, &catalog());
            let s2 = summarize(&double, &catalog());

            prop_assert_eq!(s2.subtotal, s1.subtotal * 2);
            prop_assert_eq!(s2.shipping, s1.shipping);
            prop_assert_eq!(s1.shipping, shipping_fee());
            prop_assert_eq!(s1.grand_total, s1.subtotal + s1.shipping);
            prop_assert_eq!(s2.item_count(), s1.item_count() * 2);
        }
    }
}
