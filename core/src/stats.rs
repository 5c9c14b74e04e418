// storefront/src/stats.rs

//! Dashboard aggregates, computed from snapshots of the collections.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::lifecycle::is_awaiting_claim;
use crate::models::{Order, OrderStatus, Product, Store, StoreStatus, User};

/// Users seen within this window count as active.
pub const ACTIVE_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
  pub total_users: usize,
  pub total_stores: usize,
  pub total_orders: usize,
  /// Sum of every order total regardless of status.
  pub total_revenue: i64,
  pub pending_stores: usize,
  pub active_users: usize,
}

impl AdminStats {
  pub fn compute(users: &[User], stores: &[Store], orders: &[Order], now: DateTime<Utc>) -> Self {
    let cutoff = now - Duration::days(ACTIVE_WINDOW_DAYS);
    Self {
      total_users: users.len(),
      total_stores: stores.len(),
      total_orders: orders.len(),
      total_revenue: orders.iter().map(|o| o.total).fold(0, i64::saturating_add),
      pending_stores: stores.iter().filter(|s| s.status == StoreStatus::Pending).count(),
      active_users: users
        .iter()
        .filter(|u| u.last_active.is_some_and(|seen| seen > cutoff))
        .count(),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerSummary {
  pub store_count: usize,
  pub product_count: usize,
  pub order_count: usize,
  pub pending_orders: usize,
  /// Completed orders only.
  pub revenue: i64,
}

impl SellerSummary {
  pub fn compute(owner_id: Uuid, stores: &[Store], products: &[Product], orders: &[Order]) -> Self {
    let owned: Vec<Uuid> = stores.iter().filter(|s| s.owner_id == owner_id).map(|s| s.id).collect();
    let own_orders: Vec<&Order> = orders.iter().filter(|o| owned.contains(&o.store_id)).collect();
    Self {
      store_count: owned.len(),
      product_count: products.iter().filter(|p| owned.contains(&p.store_id)).count(),
      order_count: own_orders.len(),
      pending_orders: own_orders.iter().filter(|o| o.status == OrderStatus::Pending).count(),
      revenue: own_orders
        .iter()
        .filter(|o| o.status == OrderStatus::Completed)
        .map(|o| o.total)
        .fold(0, i64::saturating_add),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerSummary {
  /// Pending or processing.
  pub in_progress: usize,
  pub shipped: usize,
  pub completed: usize,
  pub awaiting_claim: usize,
}

impl BuyerSummary {
  pub fn compute<'a, I>(orders: I) -> Self
  where
    I: IntoIterator<Item = &'a Order>,
  {
    let mut summary = Self::default();
    for order in orders {
      match order.status {
        OrderStatus::Pending | OrderStatus::Processing => summary.in_progress += 1,
        OrderStatus::Shipped => summary.shipped += 1,
        OrderStatus::Completed => summary.completed += 1,
        OrderStatus::Cancelled => {}
      }
      if is_awaiting_claim(order) {
        summary.awaiting_claim += 1;
      }
    }
    summary
  }
}
