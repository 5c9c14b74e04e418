// storefront/src/models/order.rs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StorefrontError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Pending,
  Processing,
  Shipped,
  Completed,
  Cancelled,
}

impl OrderStatus {
  pub const ALL: [OrderStatus; 5] = [
    OrderStatus::Pending,
    OrderStatus::Processing,
    OrderStatus::Shipped,
    OrderStatus::Completed,
    OrderStatus::Cancelled,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      OrderStatus::Pending => "pending",
      OrderStatus::Processing => "processing",
      OrderStatus::Shipped => "shipped",
      OrderStatus::Completed => "completed",
      OrderStatus::Cancelled => "cancelled",
    }
  }
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for OrderStatus {
  type Err = StorefrontError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    OrderStatus::ALL
      .into_iter()
      .find(|status| status.as_str() == s)
      .ok_or_else(|| StorefrontError::validation(format!("unknown order status '{s}'")))
  }
}

/// Outcome label an admin records when closing a dispute.
///
/// Stored as free text: the four known labels round-trip to their variants and
/// anything else is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DisputeOutcome {
  RefundToBuyer,
  ReleaseToSeller,
  SplitPayment,
  InvestigateFurther,
  Other(String),
}

impl DisputeOutcome {
  pub fn label(&self) -> &str {
    match self {
      DisputeOutcome::RefundToBuyer => "Refund to buyer",
      DisputeOutcome::ReleaseToSeller => "Release to seller",
      DisputeOutcome::SplitPayment => "Split payment",
      DisputeOutcome::InvestigateFurther => "Investigate further",
      DisputeOutcome::Other(label) => label,
    }
  }
}

impl From<String> for DisputeOutcome {
  fn from(label: String) -> Self {
    match label.trim().to_lowercase().replace(['-', '_'], " ").as_str() {
      "refund to buyer" => DisputeOutcome::RefundToBuyer,
      "release to seller" | "release funds to seller" => DisputeOutcome::ReleaseToSeller,
      "split payment" => DisputeOutcome::SplitPayment,
      "investigate further" => DisputeOutcome::InvestigateFurther,
      _ => DisputeOutcome::Other(label),
    }
  }
}

impl From<DisputeOutcome> for String {
  fn from(outcome: DisputeOutcome) -> Self {
    match outcome {
      DisputeOutcome::Other(label) => label,
      known => known.label().to_string(),
    }
  }
}

impl fmt::Display for DisputeOutcome {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

/// Line snapshot copied from the cart at placement time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
  /// Product id at the time of purchase. Not a live reference.
  pub id: Uuid,
  pub name: String,
  pub price: i64,
  pub quantity: u32,
  pub image: Option<String>,
}

impl OrderItem {
  pub fn line_total(&self) -> Option<i64> {
    self.price.checked_mul(i64::from(self.quantity))
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
  pub id: Uuid,
  pub store_id: Uuid,
  pub store_name: String,
  pub customer_id: Uuid,
  pub customer_name: String,
  pub customer_email: String,
  pub customer_phone: String,
  pub customer_address: String,
  pub items: Vec<OrderItem>,
  pub total: i64,
  pub status: OrderStatus,
  pub created_at: DateTime<Utc>,

  pub buyer_claimed: bool,
  pub buyer_claim_date: Option<DateTime<Utc>>,
  pub buyer_received: Option<bool>,

  pub dispute_resolved: bool,
  pub dispute_resolution: Option<DisputeOutcome>,
  pub dispute_notes: Option<String>,
  pub dispute_resolved_at: Option<DateTime<Utc>>,
  pub dispute_resolved_by: Option<String>,
}
