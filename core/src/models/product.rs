// storefront/src/models/product.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::StorefrontError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
  pub id: Uuid,
  pub name: String,
  pub description: String,
  /// Minor currency units.
  pub price: i64,
  pub original_price: Option<i64>,
  pub store_id: Uuid,
  /// Informational only: never decremented by order placement. `None` is unlimited.
  pub stock: Option<u32>,
  pub images: Vec<String>,
  pub video: Option<String>,
  pub category: String,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
  pub name: String,
  #[serde(default)]
  pub description: String,
  pub price: i64,
  pub original_price: Option<i64>,
  pub store_id: Uuid,
  pub stock: Option<u32>,
  #[serde(default)]
  pub images: Vec<String>,
  pub video: Option<String>,
  #[serde(default)]
  pub category: String,
}

/// Partial product edit. For the nullable fields an absent key leaves the
/// value alone and an explicit `null` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
  pub name: Option<String>,
  pub description: Option<String>,
  pub price: Option<i64>,
  #[serde(default, deserialize_with = "present")]
  pub original_price: Option<Option<i64>>,
  #[serde(default, deserialize_with = "present")]
  pub stock: Option<Option<u32>>,
  pub images: Option<Vec<String>>,
  #[serde(default, deserialize_with = "present")]
  pub video: Option<Option<String>>,
  pub category: Option<String>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Option::<T>::deserialize(deserializer).map(Some)
}

fn check_price(price: i64) -> Result<(), StorefrontError> {
  if price < 0 {
    return Err(StorefrontError::validation("price cannot be negative"));
  }
  Ok(())
}

impl Product {
  pub fn from_new(new: NewProduct, now: DateTime<Utc>) -> Result<Self, StorefrontError> {
    if new.name.trim().is_empty() {
      return Err(StorefrontError::validation("product name is required"));
    }
    check_price(new.price)?;
    if let Some(original) = new.original_price {
      check_price(original)?;
    }
    Ok(Product {
      id: Uuid::new_v4(),
      name: new.name.trim().to_string(),
      description: new.description,
      price: new.price,
      original_price: new.original_price,
      store_id: new.store_id,
      stock: new.stock,
      images: new.images,
      video: new.video,
      category: new.category,
      created_at: now,
    })
  }

  pub fn apply(&mut self, update: ProductUpdate) -> Result<(), StorefrontError> {
    if let Some(name) = update.name {
      if name.trim().is_empty() {
        return Err(StorefrontError::validation("product name is required"));
      }
      self.name = name.trim().to_string();
    }
    if let Some(price) = update.price {
      check_price(price)?;
      self.price = price;
    }
    if let Some(original) = update.original_price {
      if let Some(original) = original {
        check_price(original)?;
      }
      self.original_price = original;
    }
    if let Some(description) = update.description {
      self.description = description;
    }
    if let Some(stock) = update.stock {
      self.stock = stock;
    }
    if let Some(images) = update.images {
      self.images = images;
    }
    if let Some(video) = update.video {
      self.video = video;
    }
    if let Some(category) = update.category {
      self.category = category;
    }
    Ok(())
  }

  pub fn primary_image(&self) -> Option<&str> {
    self.images.first().map(String::as_str)
  }
}
