// storefront/src/cart.rs

//! Session-scoped shopping cart. Lives only in process memory and is never
//! persisted; it is cleared when an order is placed.

use serde::Serialize;
use uuid::Uuid;

use crate::models::Product;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
  pub product_id: Uuid,
  pub name: String,
  pub price: i64,
  pub image: Option<String>,
  pub store_id: Uuid,
  pub quantity: u32,
}

impl CartLine {
  pub fn line_total(&self) -> i64 {
    self.price.saturating_mul(i64::from(self.quantity))
  }
}

/// Lines keyed by product id, kept in the order they were first added.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Cart {
  lines: Vec<CartLine>,
}

impl Cart {
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds one unit of `product`. A product already in the cart has its
  /// quantity bumped instead of gaining a second line. No stock check.
  pub fn add(&mut self, product: &Product) {
    if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product.id) {
      line.quantity = line.quantity.saturating_add(1);
      return;
    }
    self.lines.push(CartLine {
      product_id: product.id,
      name: product.name.clone(),
      price: product.price,
      image: product.primary_image().map(str::to_string),
      store_id: product.store_id,
      quantity: 1,
    });
  }

  /// Removes the line for `product_id`; returns whether one was present.
  pub fn remove(&mut self, product_id: Uuid) -> bool {
    let before = self.lines.len();
    self.lines.retain(|l| l.product_id != product_id);
    self.lines.len() != before
  }

  pub fn clear(&mut self) {
    self.lines.clear();
  }

  pub fn lines(&self) -> &[CartLine] {
    &self.lines
  }

  pub fn line(&self, product_id: Uuid) -> Option<&CartLine> {
    self.lines.iter().find(|l| l.product_id == product_id)
  }

  pub fn len(&self) -> usize {
    self.lines.len()
  }

  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }

  pub fn item_count(&self) -> u64 {
    self.lines.iter().map(|l| u64::from(l.quantity)).sum()
  }

  pub fn total(&self) -> i64 {
    self.lines.iter().map(CartLine::line_total).fold(0, i64::saturating_add)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::NewProduct;
  use chrono::Utc;

  fn product(name: &str, price: i64, store_id: Uuid) -> Product {
    Product::from_new(
      NewProduct {
        name: name.into(),
        price,
        store_id,
        images: vec![format!("https://img.example/{name}.png")],
        ..NewProduct::default()
      },
      Utc::now(),
    )
    .unwrap()
  }

  #[test]
  fn adding_same_product_twice_increments_quantity() {
    let store = Uuid::new_v4();
    let headphones = product("headphones", 2999, store);
    let mut cart = Cart::new();

    cart.add(&headphones);
    cart.add(&headphones);

    assert_eq!(cart.len(), 1);
    let line = cart.line(headphones.id).unwrap();
    assert_eq!(line.quantity, 2);
    assert_eq!(line.image.as_deref(), Some("https://img.example/headphones.png"));
    assert_eq!(cart.total(), 5998);
  }

  #[test]
  fn lines_keep_insertion_order_across_stores() {
    let (s1, s2) = (Uuid::new_v4(), Uuid::new_v4());
    let a = product("a", 100, s2);
    let b = product("b", 200, s1);
    let mut cart = Cart::new();
    cart.add(&a);
    cart.add(&b);
    let names: Vec<_> = cart.lines().iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, ["a", "b"]);
    assert_eq!(cart.item_count(), 2);
  }

  #[test]
  fn removing_missing_product_is_a_no_op() {
    let mut cart = Cart::new();
    let watch = product("watch", 19999, Uuid::new_v4());
    cart.add(&watch);

    assert!(!cart.remove(Uuid::new_v4()));
    assert_eq!(cart.len(), 1);
    assert!(cart.remove(watch.id));
    assert!(cart.is_empty());
  }

  #[test]
  fn clear_empties_the_cart() {
    let mut cart = Cart::new();
    cart.add(&product("x", 1, Uuid::new_v4()));
    cart.clear();
    assert!(cart.is_empty());
    assert_eq!(cart.total(), 0);
  }
}
