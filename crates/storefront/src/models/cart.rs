//! Session-scoped shopping cart.
//!
//! The cart maps product IDs to positive quantities. It lives only in the
//! visitor's session; the database is never touched when it changes.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use hbr_pharmacy_core::ProductId;

/// Quantity change requested from the cart page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartAction {
    /// One more unit.
    Add,
    /// One fewer unit; the entry goes away at zero.
    Remove,
    /// Drop the entry regardless of quantity.
    Delete,
}

impl FromStr for CartAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Self::Add),
            "remove" => Ok(Self::Remove),
            "delete" => Ok(Self::Delete),
            other => Err(format!("unknown cart action: {other}")),
        }
    }
}

/// Product ID to quantity. Every stored quantity is at least 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart(BTreeMap<ProductId, u32>);

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of `product_id`, creating the entry if needed.
    pub fn add(&mut self, product_id: ProductId) {
        let quantity = self.0.entry(product_id).or_insert(0);
        *quantity = quantity.saturating_add(1);
    }

    /// Apply a cart-page action to an existing entry.
    ///
    /// Products not already in the cart are left alone, even for
    /// [`CartAction::Add`]. Returns whether the cart changed.
    pub fn apply(&mut self, product_id: ProductId, action: CartAction) -> bool {
        let Some(quantity) = self.0.get_mut(&product_id) else {
            return false;
        };

        match action {
            CartAction::Add => *quantity = quantity.saturating_add(1),
            CartAction::Remove if *quantity > 1 => *quantity -= 1,
            CartAction::Remove | CartAction::Delete => {
                self.0.remove(&product_id);
            }
        }
        true
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Quantity of `product_id`, zero when absent.
    #[must_use]
    pub fn quantity(&self, product_id: ProductId) -> u32 {
        self.0.get(&product_id).copied().unwrap_or(0)
    }

    /// Sum of all quantities, for the navigation badge.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.0.values().fold(0, |acc, q| acc.saturating_add(*q))
    }

    /// Product IDs in the cart, ascending.
    #[must_use]
    pub fn product_ids(&self) -> Vec<ProductId> {
        self.0.keys().copied().collect()
    }

    /// Entries in ascending product ID order.
    pub fn iter(&self) -> impl Iterator<Item = (ProductId, u32)> + '_ {
        self.0.iter().map(|(id, quantity)| (*id, *quantity))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const A: ProductId = ProductId::new(1);
    const B: ProductId = ProductId::new(2);

    #[test]
    fn test_add_creates_then_increments() {
        let mut cart = Cart::new();
        assert!(cart.is_empty());

        cart.add(A);
        cart.add(A);
        cart.add(B);

        assert_eq!(cart.quantity(A), 2);
        assert_eq!(cart.quantity(B), 1);
        assert_eq!(cart.total_quantity(), 3);
    }

    #[test]
    fn test_remove_down_to_zero_drops_entry() {
        let mut cart = Cart::new();
        cart.add(A);
        cart.add(A);

        assert!(cart.apply(A, CartAction::Remove));
        assert_eq!(cart.quantity(A), 1);
        assert!(cart.apply(A, CartAction::Remove));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_delete_ignores_quantity() {
        let mut cart = Cart::new();
        for _ in 0..5 {
            cart.add(A);
        }
        cart.add(B);

        cart.apply(A, CartAction::Delete);
        assert_eq!(cart.quantity(A), 0);
        assert_eq!(cart.product_ids(), vec![B]);
    }

    #[test]
    fn test_actions_on_missing_product_are_noops() {
        let mut cart = Cart::new();
        cart.add(A);
        let before = cart.clone();

        for action in [CartAction::Add, CartAction::Remove, CartAction::Delete] {
            assert!(!cart.apply(B, action));
        }
        assert_eq!(cart, before);
    }

    #[test]
    fn test_net_effect_of_operation_sequence() {
        let mut cart = Cart::new();
        cart.add(A);
        cart.add(B);
        cart.apply(A, CartAction::Add);
        cart.apply(A, CartAction::Add);
        cart.apply(B, CartAction::Remove);
        cart.apply(A, CartAction::Remove);
        cart.add(B);

        assert_eq!(cart.quantity(A), 2);
        assert_eq!(cart.quantity(B), 1);
        assert!(cart.iter().all(|(_, quantity)| quantity > 0));
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add(A);
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_quantity(), 0);
    }

    #[test]
    fn test_action_parsing() {
        assert_eq!("add".parse::<CartAction>().unwrap(), CartAction::Add);
        assert_eq!("remove".parse::<CartAction>().unwrap(), CartAction::Remove);
        assert_eq!("delete".parse::<CartAction>().unwrap(), CartAction::Delete);
        assert!("DELETE".parse::<CartAction>().is_err());
        assert!("double".parse::<CartAction>().is_err());
    }

    #[test]
    fn test_session_json_shape() {
        let mut cart = Cart::new();
        cart.add(A);
        cart.add(A);

        let value = serde_json::to_value(&cart).unwrap();
        assert_eq!(value, serde_json::json!({ "1": 2 }));

        let back: Cart = serde_json::from_value(value).unwrap();
        assert_eq!(back, cart);
    }

    /// One step a visitor can take: the catalog button or a cart-page link.
    #[derive(Debug, Clone, Copy)]
    enum Step {
        AddToCart(i32),
        Update(i32, CartAction),
    }

    fn step() -> impl Strategy<Value = Step> {
        let action = prop_oneof![
            Just(CartAction::Add),
            Just(CartAction::Remove),
            Just(CartAction::Delete),
        ];
        prop_oneof![
            (1..6i32).prop_map(Step::AddToCart),
            (1..6i32, action).prop_map(|(id, action)| Step::Update(id, action)),
        ]
    }

    proptest! {
        #[test]
        fn prop_quantities_are_net_effect_of_steps(steps in prop::collection::vec(step(), 0..64)) {
            let mut cart = Cart::new();
            let mut expected: BTreeMap<i32, i64> = BTreeMap::new();

            for step in steps {
                match step {
                    Step::AddToCart(id) => {
                        cart.add(ProductId::new(id));
                        *expected.entry(id).or_insert(0) += 1;
                    }
                    Step::Update(id, action) => {
                        let changed = cart.apply(ProductId::new(id), action);
                        prop_assert_eq!(changed, expected.contains_key(&id));

                        if let Some(quantity) = expected.get_mut(&id) {
                            match action {
                                CartAction::Add => *quantity += 1,
                                CartAction::Remove => *quantity -= 1,
                                CartAction::Delete => *quantity = 0,
                            }
                            if *quantity <= 0 {
                                expected.remove(&id);
                            }
                        }
                    }
                }
            }

            prop_assert!(cart.iter().all(|(_, quantity)| quantity > 0));

            let actual: BTreeMap<i32, i64> = cart
                .iter()
                .map(|(id, quantity)| (id.as_i32(), i64::from(quantity)))
                .collect();
            prop_assert_eq!(&actual, &expected);

            let total: i64 = expected.values().sum();
            prop_assert_eq!(i64::from(cart.total_quantity()), total);
        }
    }
}
