// storefront/src/models/store.rs

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StorefrontError;

pub const DEFAULT_PRIMARY_COLOR: &str = "#3b82f6";
pub const DEFAULT_SECONDARY_COLOR: &str = "#10b981";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreLayout {
  #[default]
  Grid,
  List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreStatus {
  #[default]
  Active,
  Pending,
}

impl StoreLayout {
  pub fn as_str(self) -> &'static str {
    match self {
      StoreLayout::Grid => "grid",
      StoreLayout::List => "list",
    }
  }
}

impl FromStr for StoreLayout {
  type Err = StorefrontError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "grid" => Ok(StoreLayout::Grid),
      "list" => Ok(StoreLayout::List),
      other => Err(StorefrontError::validation(format!("unknown store layout '{other}'"))),
    }
  }
}

impl StoreStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      StoreStatus::Active => "active",
      StoreStatus::Pending => "pending",
    }
  }
}

impl FromStr for StoreStatus {
  type Err = StorefrontError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "active" => Ok(StoreStatus::Active),
      "pending" => Ok(StoreStatus::Pending),
      other => Err(StorefrontError::validation(format!("unknown store status '{other}'"))),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
  pub id: Uuid,
  pub name: String,
  pub description: String,
  pub category: String,
  pub owner_id: Uuid,
  pub logo: Option<String>,
  pub banner: Option<String>,
  pub primary_color: String,
  pub secondary_color: String,
  pub layout: StoreLayout,
  pub status: StoreStatus,
  pub created_at: DateTime<Utc>,
}

/// Seller input for a new store. Asset fields may hold `data:` URLs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStore {
  pub name: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub category: String,
  pub logo: Option<String>,
  pub banner: Option<String>,
  pub primary_color: Option<String>,
  pub secondary_color: Option<String>,
  pub layout: Option<StoreLayout>,
}

/// Partial update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreUpdate {
  pub name: Option<String>,
  pub description: Option<String>,
  pub category: Option<String>,
  pub logo: Option<String>,
  pub banner: Option<String>,
  pub primary_color: Option<String>,
  pub secondary_color: Option<String>,
  pub layout: Option<StoreLayout>,
}

impl Store {
  pub fn from_new(new: NewStore, owner_id: Uuid, now: DateTime<Utc>) -> Result<Self, StorefrontError> {
    if new.name.trim().is_empty() {
      return Err(StorefrontError::validation("store name is required"));
    }
    Ok(Store {
      id: Uuid::new_v4(),
      name: new.name.trim().to_string(),
      description: new.description,
      category: new.category,
      owner_id,
      logo: new.logo,
      banner: new.banner,
      primary_color: new.primary_color.unwrap_or_else(|| DEFAULT_PRIMARY_COLOR.to_string()),
      secondary_color: new.secondary_color.unwrap_or_else(|| DEFAULT_SECONDARY_COLOR.to_string()),
      layout: new.layout.unwrap_or_default(),
      status: StoreStatus::default(),
      created_at: now,
    })
  }

  pub fn apply(&mut self, update: StoreUpdate) -> Result<(), StorefrontError> {
    if let Some(name) = update.name {
      if name.trim().is_empty() {
        return Err(StorefrontError::validation("store name is required"));
      }
      self.name = name.trim().to_string();
    }
    if let Some(description) = update.description {
      self.description = description;
    }
    if let Some(category) = update.category {
      self.category = category;
    }
    if update.logo.is_some() {
      self.logo = update.logo;
    }
    if update.banner.is_some() {
      self.banner = update.banner;
    }
    if let Some(color) = update.primary_color {
      self.primary_color = color;
    }
    if let Some(color) = update.secondary_color {
      self.secondary_color = color;
    }
    if let Some(layout) = update.layout {
      self.layout = layout;
    }
    Ok(())
  }

  /// Case-insensitive substring match over name and description.
  pub fn matches(&self, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    needle.is_empty()
      || self.name.to_lowercase().contains(&needle)
      || self.description.to_lowercase().contains(&needle)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn store_named(name: &str, description: &str) -> Store {
    let new = NewStore {
      name: name.to_string(),
      description: description.to_string(),
      ..NewStore::default()
    };
    Store::from_new(new, Uuid::new_v4(), Utc::now()).unwrap()
  }

  #[test]
  fn new_store_gets_theme_defaults() {
    let store = store_named("Tech Store", "Electronics");
    assert_eq!(store.primary_color, DEFAULT_PRIMARY_COLOR);
    assert_eq!(store.secondary_color, DEFAULT_SECONDARY_COLOR);
    assert_eq!(store.layout, StoreLayout::Grid);
    assert_eq!(store.status, StoreStatus::Active);
  }

  #[test]
  fn blank_name_is_rejected() {
    let new = NewStore { name: "  ".into(), ..NewStore::default() };
    assert!(matches!(
      Store::from_new(new, Uuid::new_v4(), Utc::now()),
      Err(StorefrontError::Validation(_))
    ));
  }

  #[test]
  fn search_matches_name_or_description_ignoring_case() {
    let store = store_named("Tech Store", "Trusted ELECTRONICS and accessories");
    assert!(store.matches("tech"));
    assert!(store.matches("electronics"));
    assert!(store.matches(""));
    assert!(!store.matches("furniture"));
  }
}
