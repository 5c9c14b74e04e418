// storefront/src/dispute.rs

//! Dispute pool and admin resolution.
//!
//! "Disputed" is never stored. It is derived from the claim fields on each
//! order, so the order collection stays the single source of truth.

use chrono::{DateTime, Utc};

use crate::error::{StorefrontError, StorefrontResult};
pub use crate::models::DisputeOutcome;
use crate::models::{Order, OrderStatus};

/// Value written to `dispute_resolved_by`. The acting admin is not recorded on the order.
pub const RESOLVED_BY: &str = "admin";

/// Cancelled after the buyer reported non-delivery, and not yet resolved.
pub fn is_disputed(order: &Order) -> bool {
  order.status == OrderStatus::Cancelled
    && order.buyer_claimed
    && order.buyer_received == Some(false)
    && !order.dispute_resolved
}

pub fn disputed_orders<'a, I>(orders: I) -> impl Iterator<Item = &'a Order>
where
  I: IntoIterator<Item = &'a Order>,
{
  orders.into_iter().filter(|o| is_disputed(o))
}

/// Closes a dispute. Record-keeping only: the status stays `cancelled` and no
/// payment is reversed.
pub fn resolve_dispute(
  order: &mut Order,
  outcome: DisputeOutcome,
  notes: &str,
  now: DateTime<Utc>,
) -> StorefrontResult<()> {
  check_notes(notes)?;
  if !is_disputed(order) {
    return Err(StorefrontError::NotDisputed(order.id));
  }
  order.dispute_resolved = true;
  order.dispute_resolution = Some(outcome);
  order.dispute_notes = Some(notes.trim().to_string());
  order.dispute_resolved_at = Some(now);
  order.dispute_resolved_by = Some(RESOLVED_BY.to_string());
  Ok(())
}

/// Resolution notes are mandatory.
pub fn check_notes(notes: &str) -> StorefrontResult<()> {
  if notes.trim().is_empty() {
    return Err(StorefrontError::validation(
      "please add resolution notes before resolving the dispute",
    ));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::lifecycle::tests::order_with_status;
  use crate::lifecycle::{apply_claim, BuyerClaim};

  fn disputed() -> Order {
    let mut order = order_with_status(OrderStatus::Shipped);
    apply_claim(&mut order, BuyerClaim::NotReceived, Utc::now()).unwrap();
    order
  }

  #[test]
  fn not_received_claim_enters_the_dispute_pool() {
    let order = disputed();
    assert!(is_disputed(&order));
  }

  #[test]
  fn seller_cancellation_without_claim_is_not_a_dispute() {
    let order = order_with_status(OrderStatus::Cancelled);
    assert!(!is_disputed(&order));

    let mut received = order_with_status(OrderStatus::Shipped);
    apply_claim(&mut received, BuyerClaim::Received, Utc::now()).unwrap();
    received.status = OrderStatus::Cancelled;
    assert!(!is_disputed(&received));
  }

  #[test]
  fn resolving_sets_all_fields_and_leaves_the_pool() {
    let mut order = disputed();
    let now = Utc::now();
    resolve_dispute(&mut order, DisputeOutcome::RefundToBuyer, " courier lost parcel ", now).unwrap();

    assert!(!is_disputed(&order));
    assert!(order.dispute_resolved);
    assert_eq!(order.dispute_resolution, Some(DisputeOutcome::RefundToBuyer));
    assert_eq!(order.dispute_notes.as_deref(), Some("courier lost parcel"));
    assert_eq!(order.dispute_resolved_at, Some(now));
    assert_eq!(order.dispute_resolved_by.as_deref(), Some(RESOLVED_BY));
    assert_eq!(order.status, OrderStatus::Cancelled);
  }

  #[test]
  fn empty_notes_are_rejected_and_membership_is_unchanged() {
    let mut order = disputed();
    let err = resolve_dispute(&mut order, DisputeOutcome::SplitPayment, "  ", Utc::now()).unwrap_err();
    assert!(matches!(err, StorefrontError::Validation(_)));
    assert!(is_disputed(&order));
    assert!(order.dispute_resolution.is_none());
  }

  #[test]
  fn resolved_dispute_cannot_be_resolved_again() {
    let mut order = disputed();
    resolve_dispute(&mut order, DisputeOutcome::ReleaseToSeller, "proof of delivery", Utc::now()).unwrap();
    assert!(matches!(
      resolve_dispute(&mut order, DisputeOutcome::RefundToBuyer, "again", Utc::now()),
      Err(StorefrontError::NotDisputed(_))
    ));
  }

  #[test]
  fn filter_keeps_only_open_disputes() {
    let orders = vec![disputed(), order_with_status(OrderStatus::Pending), disputed()];
    assert_eq!(disputed_orders(&orders).count(), 2);
  }
}
