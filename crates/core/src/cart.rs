//! Session shopping cart.
//!
//! A [`Cart`] is an owned value: the storefront loads it from the visitor's
//! session, applies one operation, and writes it back. Nothing here touches
//! a session or a database, so every rule below is checked by plain unit
//! tests.
//!
//! # Invariants
//!
//! - At most one [`CartItem`] per `id`.
//! - Every `qty` is at least 1.
//! - The total is always derived from the lines, never stored.
//! - The total always fits in a [`Price`]. A mutation that would overflow
//!   it is refused and leaves the cart unchanged.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::records::Order;
use crate::types::Price;

/// Label recorded on orders placed without a logged-in user.
pub const GUEST_LABEL: &str = "Guest";

/// Errors building a [`CartItem`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartItemError {
    #[error("item id cannot be empty")]
    EmptyId,
    #[error("item name cannot be empty")]
    EmptyName,
    #[error("quantity must be at least 1")]
    ZeroQuantity,
    #[error("price times quantity is too large")]
    LineTooLarge,
}

/// Errors from cart operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// Checkout was attempted with nothing in the cart.
    #[error("Cart is empty!")]
    Empty,

    /// A quantity change for an id that has no line yet.
    #[error("name and price are required for a new item")]
    NotInCart,

    /// The change would push a quantity or the total past what can be represented.
    #[error("Cart total is too large!")]
    TooLarge,
}

/// One product line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CartItemFields")]
pub struct CartItem {
    id: String,
    name: String,
    price: Price,
    qty: u32,
}

#[derive(Deserialize)]
struct CartItemFields {
    id: String,
    name: String,
    price: Price,
    qty: u32,
}

impl TryFrom<CartItemFields> for CartItem {
    type Error = CartItemError;

    fn try_from(fields: CartItemFields) -> Result<Self, Self::Error> {
        Self::new(fields.id, fields.name, fields.price, fields.qty)
    }
}

impl CartItem {
    /// Create a cart line.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` or `name` is blank, `qty` is zero, or the
    /// line total overflows.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Price,
        qty: u32,
    ) -> Result<Self, CartItemError> {
        let id = id.into();
        let name = name.into();
        if id.trim().is_empty() {
            return Err(CartItemError::EmptyId);
        }
        if name.trim().is_empty() {
            return Err(CartItemError::EmptyName);
        }
        if qty == 0 {
            return Err(CartItemError::ZeroQuantity);
        }
        if price.checked_times(qty).is_none() {
            return Err(CartItemError::LineTooLarge);
        }
        Ok(Self {
            id,
            name,
            price,
            qty,
        })
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn price(&self) -> Price {
        self.price
    }

    #[must_use]
    pub const fn qty(&self) -> u32 {
        self.qty
    }

    /// `price × qty` for this line.
    ///
    /// Construction and every cart mutation check this product, so the
    /// `MAX` fallback is never taken.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.checked_times(self.qty).unwrap_or(Price::MAX)
    }
}

/// Acknowledgement returned by a successful cart mutation.
///
/// The `Display` text is what the cart API sends back as `message`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAck {
    /// A new line was appended.
    Added { name: String },
    /// An existing line's quantity grew.
    QuantityUpdated { name: String },
    /// A quantity was set (or the id was absent).
    Updated,
    /// A line was removed (or the id was absent).
    Removed,
}

impl fmt::Display for CartAck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added { name } => write!(f, "{name} added to cart!"),
            Self::QuantityUpdated { name } => write!(f, "{name} quantity updated in cart!"),
            Self::Updated => f.write_str("Cart updated successfully!"),
            Self::Removed => f.write_str("Item removed from cart!"),
        }
    }
}

/// A visitor's cart.
///
/// Serializes as a plain JSON array of items, which is also the shape the
/// `cart_data` endpoint returns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartItem>", into = "Vec<CartItem>")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add an item, merging quantities when the id is already present.
    ///
    /// # Errors
    ///
    /// Returns `CartError::TooLarge` if the merged quantity or the new total
    /// overflows. The cart is unchanged in that case.
    pub fn add(&mut self, item: CartItem) -> Result<CartAck, CartError> {
        if self.find_mut(&item.id).is_some() {
            return self.add_quantity(&item.id, item.qty);
        }

        let ack = CartAck::Added {
            name: item.name.clone(),
        };
        self.guarded(|cart| {
            cart.items.push(item);
            Ok(ack)
        })
    }

    /// Grow the quantity of a line that is already in the cart.
    ///
    /// A zero `qty` leaves the line as it was.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotInCart` when no line has this id, since there
    /// is nothing to build a new line from, and `CartError::TooLarge` on
    /// overflow.
    pub fn add_quantity(&mut self, id: &str, qty: u32) -> Result<CartAck, CartError> {
        self.guarded(|cart| {
            let existing = cart.find_mut(id).ok_or(CartError::NotInCart)?;
            existing.qty = existing.qty.checked_add(qty).ok_or(CartError::TooLarge)?;
            Ok(CartAck::QuantityUpdated {
                name: existing.name.clone(),
            })
        })
    }

    /// Set a line's quantity, clamping anything below 1 up to 1.
    ///
    /// Unknown ids are ignored and still acknowledged.
    ///
    /// # Errors
    ///
    /// Returns `CartError::TooLarge` if the quantity doesn't fit or the new
    /// total overflows.
    pub fn set_quantity(&mut self, id: &str, qty: i64) -> Result<CartAck, CartError> {
        self.guarded(|cart| {
            if let Some(existing) = cart.find_mut(id) {
                existing.qty = u32::try_from(qty.max(1)).map_err(|_| CartError::TooLarge)?;
            }
            Ok(CartAck::Updated)
        })
    }

    /// Remove the line with this id, if any.
    pub fn remove(&mut self, id: &str) -> CartAck {
        self.items.retain(|item| item.id != id);
        CartAck::Removed
    }

    /// The lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |acc, item| acc.saturating_add(item.qty))
    }

    /// `Σ price × qty` over all lines.
    ///
    /// Mutations refuse to overflow the total, so the `MAX` fallback is
    /// never taken.
    #[must_use]
    pub fn total(&self) -> Price {
        self.checked_total().unwrap_or(Price::MAX)
    }

    /// `Σ price × qty`, `None` if any step overflows.
    #[must_use]
    pub fn checked_total(&self) -> Option<Price> {
        self.items.iter().try_fold(Price::ZERO, |acc, item| {
            acc.checked_add(item.price.checked_times(item.qty)?)
        })
    }

    /// Build the order this cart would become at checkout.
    ///
    /// The cart itself is left untouched; the caller clears it with
    /// [`Cart::clear`] once the order has been stored.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Empty` if there is nothing to order.
    pub fn checkout(&self, user: Option<&str>, date: DateTime<Utc>) -> Result<Order, CartError> {
        if self.is_empty() {
            return Err(CartError::Empty);
        }

        Ok(Order {
            user: user.unwrap_or(GUEST_LABEL).to_owned(),
            products: self.items.clone(),
            total: self.total(),
            date,
        })
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    /// Apply `op`, rolling back if it fails or leaves an unrepresentable total.
    fn guarded<F>(&mut self, op: F) -> Result<CartAck, CartError>
    where
        F: FnOnce(&mut Self) -> Result<CartAck, CartError>,
    {
        let before = self.items.clone();
        let result = op(self).and_then(|ack| {
            self.checked_total().map(|_| ack).ok_or(CartError::TooLarge)
        });
        if result.is_err() {
            self.items = before;
        }
        result
    }
}

impl TryFrom<Vec<CartItem>> for Cart {
    type Error = CartError;

    /// Rebuild a cart from stored lines, folding duplicate ids together.
    fn try_from(items: Vec<CartItem>) -> Result<Self, Self::Error> {
        let mut cart = Self::new();
        for item in items {
            cart.add(item)?;
        }
        Ok(cart)
    }
}

impl From<Cart> for Vec<CartItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn item(id: &str, name: &str, price: &str, qty: u32) -> CartItem {
        CartItem::new(id, name, Price::parse(price).unwrap(), qty).unwrap()
    }

    #[test]
    fn test_add_appends_new_item() {
        let mut cart = Cart::new();
        let ack = cart.add(item("p1", "Widget", "9.99", 2)).unwrap();

        assert_eq!(ack.to_string(), "Widget added to cart!");
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].qty(), 2);
    }

    #[test]
    fn test_add_same_id_accumulates_quantity() {
        let mut cart = Cart::new();
        cart.add(item("p1", "Widget", "9.99", 2)).unwrap();
        cart.add(item("p1", "Widget", "9.99", 1)).unwrap();
        let ack = cart.add(item("p1", "Widget", "9.99", 4)).unwrap();

        assert_eq!(ack.to_string(), "Widget quantity updated in cart!");
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].qty(), 7);
    }

    #[test]
    fn test_merge_by_id_then_total() {
        let mut cart = Cart::new();
        cart.add(item("p1", "Widget", "9.99", 2)).unwrap();
        let ack = cart.add_quantity("p1", 3).unwrap();

        assert_eq!(ack.to_string(), "Widget quantity updated in cart!");
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].qty(), 5);
        assert_eq!(cart.total().amount(), Decimal::new(4995, 2));
    }

    #[test]
    fn test_add_quantity_unknown_id_is_refused() {
        let mut cart = Cart::new();
        assert_eq!(cart.add_quantity("missing", 1), Err(CartError::NotInCart));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_clamps_to_one() {
        let mut cart = Cart::new();
        cart.add(item("p1", "Widget", "9.99", 2)).unwrap();

        for q in [0, -1, -100, i64::MIN] {
            cart.set_quantity("p1", q).unwrap();
            assert_eq!(cart.items()[0].qty(), 1, "qty {q} should clamp to 1");
        }

        cart.set_quantity("p1", 6).unwrap();
        assert_eq!(cart.items()[0].qty(), 6);
    }

    #[test]
    fn test_set_quantity_unknown_id_is_acknowledged_noop() {
        let mut cart = Cart::new();
        cart.add(item("p1", "Widget", "9.99", 2)).unwrap();
        let before = cart.clone();

        let ack = cart.set_quantity("nope", 10).unwrap();

        assert_eq!(ack, CartAck::Updated);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_drops_item() {
        let mut cart = Cart::new();
        cart.add(item("p1", "Widget", "9.99", 2)).unwrap();
        cart.add(item("p2", "Gadget", "1.00", 1)).unwrap();

        let ack = cart.remove("p1");

        assert_eq!(ack.to_string(), "Item removed from cart!");
        assert!(cart.items().iter().all(|i| i.id() != "p1"));
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = Cart::new();
        assert_eq!(cart.remove("p1"), CartAck::Removed);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_checkout_empty_fails_and_leaves_cart() {
        let cart = Cart::new();
        assert_eq!(cart.checkout(None, Utc::now()), Err(CartError::Empty));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_checkout_snapshots_lines_and_total() {
        let mut cart = Cart::new();
        cart.add(item("p1", "Widget", "9.99", 2)).unwrap();
        cart.add(item("p2", "Gadget", "0.50", 3)).unwrap();

        let order = cart.checkout(Some("alice"), Utc::now()).unwrap();

        assert_eq!(order.user, "alice");
        assert_eq!(order.products, cart.items());
        assert_eq!(order.total.amount(), Decimal::new(2148, 2));
        // Clearing is the caller's job once the order is stored
        assert!(!cart.is_empty());
    }

    #[test]
    fn test_checkout_without_user_uses_guest() {
        let mut cart = Cart::new();
        cart.add(item("p1", "Widget", "1", 1)).unwrap();

        let order = cart.checkout(None, Utc::now()).unwrap();
        assert_eq!(order.user, GUEST_LABEL);
    }

    #[test]
    fn test_item_rejects_zero_quantity_and_blank_fields() {
        let price = Price::parse("1").unwrap();
        assert_eq!(
            CartItem::new("p1", "Widget", price, 0),
            Err(CartItemError::ZeroQuantity)
        );
        assert_eq!(
            CartItem::new(" ", "Widget", price, 1),
            Err(CartItemError::EmptyId)
        );
        assert_eq!(
            CartItem::new("p1", "", price, 1),
            Err(CartItemError::EmptyName)
        );
    }

    #[test]
    fn test_item_deserialize_validates() {
        let ok: CartItem =
            serde_json::from_str(r#"{"id":"p1","name":"Widget","price":9.99,"qty":2}"#).unwrap();
        assert_eq!(ok.price().amount(), Decimal::new(999, 2));

        let zero: Result<CartItem, _> =
            serde_json::from_str(r#"{"id":"p1","name":"Widget","price":9.99,"qty":0}"#);
        assert!(zero.is_err());

        let missing: Result<CartItem, _> = serde_json::from_str(r#"{"id":"p1","qty":1}"#);
        assert!(missing.is_err());
    }

    #[test]
    fn test_cart_serializes_as_array_and_folds_duplicates() {
        let json = r#"[
            {"id":"p1","name":"Widget","price":2,"qty":1},
            {"id":"p1","name":"Widget","price":2,"qty":2}
        ]"#;
        let cart: Cart = serde_json::from_str(json).unwrap();
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].qty(), 3);

        let value = serde_json::to_value(&cart).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["qty"], 3);
    }

    #[test]
    fn test_item_count_sums_units() {
        let mut cart = Cart::new();
        cart.add(item("p1", "Widget", "1", 2)).unwrap();
        cart.add(item("p2", "Gadget", "1", 3)).unwrap();
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn test_item_rejects_overflowing_line_total() {
        let huge = Price::parse("50000000000000000000000000000").unwrap();
        assert_eq!(
            CartItem::new("p1", "Big", huge, 2),
            Err(CartItemError::LineTooLarge)
        );
        assert!(CartItem::new("p1", "Big", huge, 1).is_ok());
    }

    #[test]
    fn test_add_refuses_total_overflow_and_keeps_cart() {
        let mut cart = Cart::new();
        cart.add(item("p1", "Big", "50000000000000000000000000000", 1))
            .unwrap();
        let before = cart.clone();

        assert_eq!(
            cart.add(item("p2", "Bigger", "50000000000000000000000000000", 1)),
            Err(CartError::TooLarge)
        );
        assert_eq!(cart, before);

        // The merge path is checked too
        assert_eq!(
            cart.add(item("p1", "Big", "50000000000000000000000000000", 1)),
            Err(CartError::TooLarge)
        );
        assert_eq!(cart.add_quantity("p1", 1), Err(CartError::TooLarge));
        assert_eq!(cart, before);
        assert_eq!(cart.total(), cart.checked_total().unwrap());
    }

    #[test]
    fn test_set_quantity_refuses_total_overflow() {
        let mut cart = Cart::new();
        cart.add(item("p1", "Big", "50000000000000000000000000000", 1))
            .unwrap();

        assert_eq!(cart.set_quantity("p1", 2), Err(CartError::TooLarge));
        assert_eq!(cart.set_quantity("p1", i64::MAX), Err(CartError::TooLarge));
        assert_eq!(cart.items()[0].qty(), 1);
    }

    #[test]
    fn test_merge_quantity_overflow_is_refused() {
        let mut cart = Cart::new();
        cart.add(item("p1", "Free", "0", u32::MAX)).unwrap();

        assert_eq!(cart.add_quantity("p1", 1), Err(CartError::TooLarge));
        assert_eq!(cart.items()[0].qty(), u32::MAX);
    }

    #[test]
    fn test_stored_cart_with_overflowing_total_does_not_decode() {
        let json = r#"[
            {"id":"p1","name":"Big","price":"50000000000000000000000000000","qty":1},
            {"id":"p2","name":"Big","price":"50000000000000000000000000000","qty":1}
        ]"#;
        assert!(serde_json::from_str::<Cart>(json).is_err());
    }
}
