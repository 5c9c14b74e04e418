// storefront/src/lifecycle.rs

//! Order status state machine.
//!
//! Sellers move orders between statuses; buyers close a shipped order with a
//! delivery claim. Both paths rewrite the whole order document, there is no
//! event log beyond the fields on the order.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{StorefrontError, StorefrontResult};
use crate::models::{Order, OrderStatus};

/// How strictly seller-initiated status changes are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionPolicy {
  /// Any status may be set from any status.
  #[default]
  Permissive,
  /// `pending → processing → shipped → {completed | cancelled}`, and
  /// `pending | processing → cancelled`.
  ForwardOnly,
}

impl TransitionPolicy {
  pub fn allows(self, from: OrderStatus, to: OrderStatus) -> bool {
    use OrderStatus::*;
    match self {
      TransitionPolicy::Permissive => true,
      TransitionPolicy::ForwardOnly => matches!(
        (from, to),
        (Pending, Processing)
          | (Processing, Shipped)
          | (Shipped, Completed)
          | (Shipped, Cancelled)
          | (Pending, Cancelled)
          | (Processing, Cancelled)
      ),
    }
  }
}

impl FromStr for TransitionPolicy {
  type Err = StorefrontError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "permissive" => Ok(TransitionPolicy::Permissive),
      "forward-only" | "forward_only" | "strict" => Ok(TransitionPolicy::ForwardOnly),
      other => Err(StorefrontError::validation(format!("unknown transition policy '{other}'"))),
    }
  }
}

/// Applies a seller status change under `policy`.
///
/// Setting the current status again is accepted as a no-op under either policy.
pub fn change_status(order: &mut Order, to: OrderStatus, policy: TransitionPolicy) -> StorefrontResult<()> {
  let from = order.status;
  if from == to {
    return Ok(());
  }
  if !policy.allows(from, to) {
    return Err(StorefrontError::InvalidTransition { from, to });
  }
  order.status = to;
  Ok(())
}

/// The buyer's answer to "did you receive this order?".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuyerClaim {
  Received,
  NotReceived,
}

impl BuyerClaim {
  pub fn from_received(received: bool) -> Self {
    if received {
      BuyerClaim::Received
    } else {
      BuyerClaim::NotReceived
    }
  }

  pub fn received(self) -> bool {
    matches!(self, BuyerClaim::Received)
  }

  pub fn resulting_status(self) -> OrderStatus {
    match self {
      BuyerClaim::Received => OrderStatus::Completed,
      BuyerClaim::NotReceived => OrderStatus::Cancelled,
    }
  }
}

/// Shipped orders the buyer has not answered yet.
pub fn is_awaiting_claim(order: &Order) -> bool {
  order.status == OrderStatus::Shipped && !order.buyer_claimed
}

/// Records a buyer delivery claim. The claim is offered once per order.
pub fn apply_claim(order: &mut Order, claim: BuyerClaim, now: DateTime<Utc>) -> StorefrontResult<()> {
  if order.buyer_claimed {
    return Err(StorefrontError::AlreadyClaimed(order.id));
  }
  if order.status != OrderStatus::Shipped {
    return Err(StorefrontError::NotClaimable {
      order_id: order.id,
      status: order.status,
    });
  }
  order.status = claim.resulting_status();
  order.buyer_claimed = true;
  order.buyer_received = Some(claim.received());
  order.buyer_claim_date = Some(now);
  Ok(())
}

/// Only the customer who placed an order may claim it.
pub fn ensure_customer(order: &Order, user_id: Uuid) -> StorefrontResult<()> {
  if order.customer_id != user_id {
    return Err(StorefrontError::Forbidden(format!(
      "order {} belongs to another buyer",
      order.id
    )));
  }
  Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;
  use crate::models::OrderItem;

  pub(crate) fn order_with_status(status: OrderStatus) -> Order {
    Order {
      id: Uuid::new_v4(),
      store_id: Uuid::new_v4(),
      store_name: "Tech Store".into(),
      customer_id: Uuid::new_v4(),
      customer_name: "Asha".into(),
      customer_email: "asha@example.com".into(),
      customer_phone: "0700".into(),
      customer_address: "Dar".into(),
      items: vec![OrderItem {
        id: Uuid::new_v4(),
        name: "Headphones".into(),
        price: 2999,
        quantity: 1,
        image: None,
      }],
      total: 2999,
      status,
      created_at: Utc::now(),
      buyer_claimed: false,
      buyer_claim_date: None,
      buyer_received: None,
      dispute_resolved: false,
      dispute_resolution: None,
      dispute_notes: None,
      dispute_resolved_at: None,
      dispute_resolved_by: None,
    }
  }

  #[test]
  fn permissive_policy_allows_any_jump() {
    let mut order = order_with_status(OrderStatus::Completed);
    change_status(&mut order, OrderStatus::Pending, TransitionPolicy::Permissive).unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    change_status(&mut order, OrderStatus::Shipped, TransitionPolicy::Permissive).unwrap();
    assert_eq!(order.status, OrderStatus::Shipped);
  }

  #[test]
  fn forward_only_policy_rejects_backwards_moves() {
    let mut order = order_with_status(OrderStatus::Shipped);
    let err = change_status(&mut order, OrderStatus::Processing, TransitionPolicy::ForwardOnly).unwrap_err();
    assert!(matches!(
      err,
      StorefrontError::InvalidTransition { from: OrderStatus::Shipped, to: OrderStatus::Processing }
    ));
    assert_eq!(order.status, OrderStatus::Shipped);
  }

  #[test]
  fn forward_only_policy_walks_the_happy_path() {
    let mut order = order_with_status(OrderStatus::Pending);
    for next in [OrderStatus::Processing, OrderStatus::Shipped, OrderStatus::Completed] {
      change_status(&mut order, next, TransitionPolicy::ForwardOnly).unwrap();
    }
    assert_eq!(order.status, OrderStatus::Completed);
    assert!(!TransitionPolicy::ForwardOnly.allows(OrderStatus::Completed, OrderStatus::Cancelled));
    assert!(!TransitionPolicy::ForwardOnly.allows(OrderStatus::Pending, OrderStatus::Shipped));
  }

  #[test]
  fn claim_received_completes_the_order() {
    let mut order = order_with_status(OrderStatus::Shipped);
    let now = Utc::now();
    apply_claim(&mut order, BuyerClaim::Received, now).unwrap();
    assert_eq!(order.status, OrderStatus::Completed);
    assert!(order.buyer_claimed);
    assert_eq!(order.buyer_received, Some(true));
    assert_eq!(order.buyer_claim_date, Some(now));
  }

  #[test]
  fn claim_not_received_cancels_the_order() {
    let mut order = order_with_status(OrderStatus::Shipped);
    apply_claim(&mut order, BuyerClaim::NotReceived, Utc::now()).unwrap();
    assert_eq!(order.status, OrderStatus::Cancelled);
    assert!(order.buyer_claimed);
    assert_eq!(order.buyer_received, Some(false));
  }

  #[test]
  fn claim_is_offered_only_once() {
    let mut order = order_with_status(OrderStatus::Shipped);
    apply_claim(&mut order, BuyerClaim::Received, Utc::now()).unwrap();
    order.status = OrderStatus::Shipped;
    assert!(matches!(
      apply_claim(&mut order, BuyerClaim::NotReceived, Utc::now()),
      Err(StorefrontError::AlreadyClaimed(_))
    ));
  }

  #[test]
  fn claim_requires_shipped_status() {
    let mut order = order_with_status(OrderStatus::Processing);
    assert!(!is_awaiting_claim(&order));
    assert!(matches!(
      apply_claim(&mut order, BuyerClaim::Received, Utc::now()),
      Err(StorefrontError::NotClaimable { status: OrderStatus::Processing, .. })
    ));
    assert!(!order.buyer_claimed);
  }

  #[test]
  fn policy_parses_from_config_values() {
    assert_eq!("permissive".parse::<TransitionPolicy>().unwrap(), TransitionPolicy::Permissive);
    assert_eq!("forward-only".parse::<TransitionPolicy>().unwrap(), TransitionPolicy::ForwardOnly);
    assert!("chaotic".parse::<TransitionPolicy>().is_err());
  }
}
