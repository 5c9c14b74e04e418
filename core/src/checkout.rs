// storefront/src/checkout.rs

//! Splits a multi-store cart into one order per store.
//!
//! Checkout never talks to storage itself: it validates input, groups cart
//! lines by owning store, snapshots them into [`OrderItem`]s and builds the
//! [`Order`] documents. Persisting them (atomically) is the catalog's job.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::cart::Cart;
use crate::error::{StorefrontError, StorefrontResult};
use crate::models::{Order, OrderItem, OrderStatus};

/// Name given to a group whose store no longer exists in the catalog.
pub const UNKNOWN_STORE_NAME: &str = "Unknown Store";

/// Delivery and contact fields the buyer fills in at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub email: String,
  #[serde(default)]
  pub phone: String,
  #[serde(default)]
  pub address: String,
}

impl ContactDetails {
  /// Falls back to the account email when the form left it blank.
  pub fn with_default_email(mut self, account_email: &str) -> Self {
    if self.email.trim().is_empty() {
      self.email = account_email.to_string();
    }
    self
  }

  pub fn validate(&self) -> StorefrontResult<()> {
    let fields = [
      ("name", &self.name),
      ("email", &self.email),
      ("phone", &self.phone),
      ("address", &self.address),
    ];
    let missing: Vec<&str> = fields
      .iter()
      .filter(|(_, value)| value.trim().is_empty())
      .map(|(field, _)| *field)
      .collect();
    if !missing.is_empty() {
      return Err(StorefrontError::validation(format!(
        "please fill in all customer information (missing: {})",
        missing.join(", ")
      )));
    }
    Ok(())
  }
}

/// Per-line quantity adjustments made on the review screen.
///
/// Values below 1 are clamped to 1. There is no upper bound and no stock cap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuantityOverrides(HashMap<Uuid, u32>);

impl QuantityOverrides {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn set(&mut self, product_id: Uuid, quantity: u32) {
    self.0.insert(product_id, quantity.max(1));
  }

  /// Effective quantity for a line: the override if any, else the cart quantity.
  pub fn effective(&self, product_id: Uuid, cart_quantity: u32) -> u32 {
    self.0.get(&product_id).copied().unwrap_or(cart_quantity).max(1)
  }
}

impl FromIterator<(Uuid, u32)> for QuantityOverrides {
  fn from_iter<I: IntoIterator<Item = (Uuid, u32)>>(iter: I) -> Self {
    let mut overrides = QuantityOverrides::new();
    for (id, qty) in iter {
      overrides.set(id, qty);
    }
    overrides
  }
}

/// Cart lines belonging to a single store, ready to become one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreGroup {
  pub store_id: Uuid,
  pub store_name: String,
  pub items: Vec<OrderItem>,
  pub subtotal: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSummary {
  pub groups: Vec<StoreGroup>,
  pub grand_total: i64,
}

impl CheckoutSummary {
  pub fn from_groups(groups: Vec<StoreGroup>) -> StorefrontResult<Self> {
    let grand_total = groups
      .iter()
      .try_fold(0i64, |acc, g| acc.checked_add(g.subtotal))
      .ok_or_else(overflow)?;
    Ok(Self { groups, grand_total })
  }
}

fn overflow() -> StorefrontError {
  StorefrontError::validation("order total is too large")
}

/// Groups cart lines by store, in order of each store's first appearance.
pub fn split_cart<F>(cart: &Cart, overrides: &QuantityOverrides, store_name: F) -> StorefrontResult<Vec<StoreGroup>>
where
  F: Fn(Uuid) -> Option<String>,
{
  if cart.is_empty() {
    return Err(StorefrontError::validation("cart is empty"));
  }

  let mut groups: Vec<StoreGroup> = Vec::new();
  for line in cart.lines() {
    let quantity = overrides.effective(line.product_id, line.quantity);
    let item = OrderItem {
      id: line.product_id,
      name: line.name.clone(),
      price: line.price,
      quantity,
      image: line.image.clone(),
    };
    let line_total = item.line_total().ok_or_else(overflow)?;

    let group = match groups.iter().position(|g| g.store_id == line.store_id) {
      Some(idx) => &mut groups[idx],
      None => {
        groups.push(StoreGroup {
          store_id: line.store_id,
          store_name: store_name(line.store_id).unwrap_or_else(|| UNKNOWN_STORE_NAME.to_string()),
          items: Vec::new(),
          subtotal: 0,
        });
        let last = groups.len() - 1;
        &mut groups[last]
      }
    };
    group.subtotal = group.subtotal.checked_add(line_total).ok_or_else(overflow)?;
    group.items.push(item);
  }

  debug!(stores = groups.len(), lines = cart.len(), "Cart split by store.");
  Ok(groups)
}

/// Builds one pending order per store group. Contact details must already be valid.
pub fn build_orders(
  groups: &[StoreGroup],
  customer_id: Uuid,
  contact: &ContactDetails,
  now: DateTime<Utc>,
) -> Vec<Order> {
  groups
    .iter()
    .map(|group| Order {
      id: Uuid::new_v4(),
      store_id: group.store_id,
      store_name: group.store_name.clone(),
      customer_id,
      customer_name: contact.name.trim().to_string(),
      customer_email: contact.email.trim().to_string(),
      customer_phone: contact.phone.trim().to_string(),
      customer_address: contact.address.trim().to_string(),
      items: group.items.clone(),
      total: group.subtotal,
      status: OrderStatus::Pending,
      created_at: now,
      buyer_claimed: false,
      buyer_claim_date: None,
      buyer_received: None,
      dispute_resolved: false,
      dispute_resolution: None,
      dispute_notes: None,
      dispute_resolved_at: None,
      dispute_resolved_by: None,
    })
    .collect()
}
