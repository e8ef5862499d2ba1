//! Client-side cart state.
//!
//! The cart is an explicit container owned by whoever renders the checkout
//! form. Nothing here is global; pass the cart to the form and the form
//! clears it after a successful order.

use serde::{Deserialize, Serialize};

use crate::types::{Price, PriceOverflow, ProductId};

/// A product line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product document ID in the CMS.
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub title: String,
    pub quantity: u32,
    /// Unit price.
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl CartItem {
    /// Create a cart line without an image.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, title: impl Into<String>, quantity: u32, price: Price) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            quantity,
            price,
            image: None,
        }
    }

    /// `quantity × price` for this line.
    ///
    /// # Errors
    ///
    /// Returns [`PriceOverflow`] if the line total is out of range.
    pub fn line_total(&self) -> Result<Price, PriceOverflow> {
        self.price.times(self.quantity)
    }
}

/// Ordered collection of cart lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from existing lines, keeping them as given.
    #[must_use]
    pub const fn from_items(items: Vec<CartItem>) -> Self {
        Self { items }
    }

    /// Add a line. If the product is already in the cart its quantity is
    /// increased instead of adding a second line. Zero quantities are ignored.
    pub fn add(&mut self, item: CartItem) {
        if item.quantity == 0 {
            return;
        }

        match self.items.iter_mut().find(|line| line.id == item.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(item.quantity),
            None => self.items.push(item),
        }
    }

    /// Set the quantity for a product. A quantity of zero removes the line.
    ///
    /// Returns `false` if the product is not in the cart.
    pub fn update_quantity(&mut self, id: &ProductId, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(id);
        }

        match self.items.iter_mut().find(|line| &line.id == id) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove every line for a product. Returns `false` if nothing was removed.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|line| &line.id != id);
        self.items.len() != before
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |acc, line| acc.saturating_add(line.quantity))
    }

    /// Sum of `quantity × price` over all lines.
    ///
    /// # Errors
    ///
    /// Returns [`PriceOverflow`] if a line total or the running sum is out of range.
    pub fn total_price(&self) -> Result<Price, PriceOverflow> {
        Price::total(self.items.iter().map(CartItem::line_total))
    }
}

impl From<Vec<CartItem>> for Cart {
    fn from(items: Vec<CartItem>) -> Self {
        Self::from_items(items)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn widget(quantity: u32) -> CartItem {
        CartItem::new("p1", "Widget", quantity, Price::whole(10))
    }

    #[test]
    fn test_total_is_sum_of_line_totals() {
        let cart = Cart::from_items(vec![
            widget(2),
            CartItem::new("p2", "Gadget", 3, Price::from_cents(1999)),
            CartItem::new("p3", "Gizmo", 1, Price::from_cents(5)),
        ]);

        assert_eq!(cart.total_price().unwrap(), Price::from_cents(2000 + 5997 + 5));
        assert_eq!(cart.item_count(), 6);
        assert_eq!(cart.len(), 3);
    }

    #[test]
    fn test_total_matches_float_sum_for_many_carts() {
        // Walk a spread of quantities and cent prices and compare against the
        // naive f64 computation a browser would do.
        for seed in 0_u32..200 {
            let mut cart = Cart::new();
            let mut expected = 0.0_f64;
            for line in 0..(seed % 7) {
                let quantity = (seed * 31 + line * 7) % 9 + 1;
                let cents = i64::from((seed * 97 + line * 13) % 50_000);
                cart.add(CartItem::new(
                    format!("p{line}"),
                    "Item",
                    quantity,
                    Price::from_cents(cents),
                ));
                #[allow(clippy::cast_precision_loss)]
                let unit = cents as f64 / 100.0;
                expected += unit * f64::from(quantity);
            }
            assert!((cart.total_price().unwrap().to_f64() - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_empty_cart_total_is_zero() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert_eq!(cart.total_price().unwrap(), Price::ZERO);
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_oversized_price_reports_overflow() {
        let cart: Cart =
            serde_json::from_str(r#"[{"_id":"a","title":"A","quantity":2,"price":5e28}]"#).unwrap();

        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.total_price(), Err(PriceOverflow));
    }

    #[test]
    fn test_sum_of_lines_overflow() {
        let near_max: Price = serde_json::from_str("5e28").unwrap();
        let cart = Cart::from_items(vec![
            CartItem::new("a", "A", 1, near_max),
            CartItem::new("b", "B", 1, near_max),
        ]);

        assert!(cart.items().iter().all(|line| line.line_total().is_ok()));
        assert_eq!(cart.total_price(), Err(PriceOverflow));
    }

    #[test]
    fn test_add_same_product_merges_quantity() {
        let mut cart = Cart::new();
        cart.add(widget(1));
        cart.add(widget(2));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items().first().unwrap().quantity, 3);
    }

    #[test]
    fn test_add_zero_quantity_is_ignored() {
        let mut cart = Cart::new();
        cart.add(widget(0));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_and_remove() {
        let mut cart = Cart::from_items(vec![widget(1)]);
        let id = ProductId::new("p1");

        assert!(cart.update_quantity(&id, 5));
        assert_eq!(cart.total_price().unwrap(), Price::whole(50));

        assert!(cart.update_quantity(&id, 0));
        assert!(cart.is_empty());

        assert!(!cart.update_quantity(&id, 2));
        assert!(!cart.remove(&id));
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::from_items(vec![widget(1), CartItem::new("p2", "Gadget", 1, Price::whole(1))]);
        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_wire_shape() {
        let cart = Cart::from_items(vec![widget(2)]);
        let json = serde_json::to_value(&cart).unwrap();
        let line = json.get(0).unwrap();

        assert_eq!(line["_id"], "p1");
        assert_eq!(line["title"], "Widget");
        assert_eq!(line["quantity"], 2);
        assert!((line["price"].as_f64().unwrap() - 10.0).abs() < f64::EPSILON);
        assert!(line.get("image").is_none());
    }
}
