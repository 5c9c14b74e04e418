// storefront/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;
use uuid::Uuid;

use crate::models::OrderStatus;

/// Errors produced by the storefront domain and its storage seams.
///
/// Validation-style variants are raised before any write is attempted, so a
/// caller that receives one can assume the backing store is untouched.
#[derive(Debug, Error)]
pub enum StorefrontError {
  #[error("Validation failed: {0}")]
  Validation(String),

  #[error("{kind} not found: {id}")]
  NotFound { kind: &'static str, id: Uuid },

  #[error("Forbidden: {0}")]
  Forbidden(String),

  #[error("Conflict: {0}")]
  Conflict(String),

  #[error("Order status cannot move from {from} to {to}")]
  InvalidTransition { from: OrderStatus, to: OrderStatus },

  #[error("Order {order_id} cannot be claimed while {status}")]
  NotClaimable { order_id: Uuid, status: OrderStatus },

  #[error("Order {0} has already been claimed by the buyer")]
  AlreadyClaimed(Uuid),

  #[error("Order {0} is not an open dispute")]
  NotDisputed(Uuid),

  #[error("Blob storage failed: {0}")]
  Blob(String),

  #[error("Document store operation failed. Source: {source}")]
  Backend {
    #[source]
    source: AnyhowError,
  },
}

impl StorefrontError {
  pub fn validation(message: impl Into<String>) -> Self {
    StorefrontError::Validation(message.into())
  }

  pub fn not_found(kind: &'static str, id: Uuid) -> Self {
    StorefrontError::NotFound { kind, id }
  }

  /// True for the errors that are raised before any write was attempted.
  pub fn is_user_facing(&self) -> bool {
    !matches!(self, StorefrontError::Backend { .. } | StorefrontError::Blob(_))
  }
}

impl From<AnyhowError> for StorefrontError {
  fn from(source: AnyhowError) -> Self {
    StorefrontError::Backend { source }
  }
}

pub type StorefrontResult<T, E = StorefrontError> = std::result::Result<T, E>;
