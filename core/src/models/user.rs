// storefront/src/models/user.rs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StorefrontError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Buyer,
  Seller,
  Admin,
}

impl Role {
  pub fn as_str(self) -> &'static str {
    match self {
      Role::Buyer => "buyer",
      Role::Seller => "seller",
      Role::Admin => "admin",
    }
  }

  /// Landing path after sign-in.
  pub fn home(self) -> &'static str {
    match self {
      Role::Buyer => "/buyer-dashboard",
      Role::Seller => "/seller-dashboard",
      Role::Admin => "/admin",
    }
  }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Role {
  type Err = StorefrontError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "buyer" => Ok(Role::Buyer),
      "seller" => Ok(Role::Seller),
      "admin" => Ok(Role::Admin),
      other => Err(StorefrontError::validation(format!("unknown role '{other}'"))),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id: Uuid,
  pub email: String,
  /// Authoritative role. Never cached elsewhere; read per authorization check.
  #[serde(rename = "type")]
  pub role: Role,
  pub created_at: DateTime<Utc>,
  pub last_active: Option<DateTime<Utc>>,
}

/// Password material held by the auth boundary. Never serialized to clients.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
  pub user_id: Uuid,
  pub email: String,
  pub password_hash: String,
}

impl fmt::Debug for Credential {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Credential")
      .field("user_id", &self.user_id)
      .field("email", &self.email)
      .field("password_hash", &"[REDACTED]")
      .finish()
  }
}
