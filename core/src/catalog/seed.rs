// storefront/src/catalog/seed.rs

//! Sample data for an empty catalog, so a fresh deployment has something to browse.

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use super::Catalog;
use crate::error::StorefrontResult;
use crate::models::{NewProduct, NewStore, Product, Store, StoreLayout};

const SAMPLE_PRODUCTS: [(&str, &str, i64, Option<i64>, u32, &str); 4] = [
  (
    "Wireless Bluetooth Headphones",
    "Premium wireless headphones with noise cancellation",
    2999,
    Some(3999),
    15,
    "Electronics",
  ),
  ("Smart Watch Pro", "Advanced fitness and health tracking smartwatch", 19999, Some(24999), 8, "Electronics"),
  ("Designer Sunglasses", "UV protection designer sunglasses", 8999, Some(12999), 25, "Fashion"),
  ("Portable Power Bank", "20000mAh fast charging power bank", 1499, None, 50, "Electronics"),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
  pub stores: usize,
  pub products: usize,
}

/// Adds a sample store when there are no stores, and sample products (in the
/// first store) when there are no products. Existing data is never touched.
pub async fn seed_if_empty(catalog: &Catalog, owner_id: Uuid, now: DateTime<Utc>) -> StorefrontResult<SeedReport> {
  let mut report = SeedReport::default();

  if catalog.stores().is_empty() {
    let sample = NewStore {
      name: "Tech Store".into(),
      description: "Your trusted electronics and accessories store".into(),
      category: "Electronics".into(),
      logo: Some("https://picsum.photos/200/200?random=store".into()),
      banner: Some("https://picsum.photos/800/300?random=banner".into()),
      primary_color: Some("#9333ea".into()),
      secondary_color: Some("#a855f7".into()),
      layout: Some(StoreLayout::Grid),
    };
    catalog.insert_store(Store::from_new(sample, owner_id, now)?).await?;
    report.stores += 1;
  }

  if catalog.products().is_empty() {
    if let Some(store) = catalog.stores().into_iter().next() {
      for (idx, (name, description, price, original_price, stock, category)) in SAMPLE_PRODUCTS.into_iter().enumerate() {
        let new = NewProduct {
          name: name.into(),
          description: description.into(),
          price,
          original_price,
          store_id: store.id,
          stock: Some(stock),
          images: vec![format!("https://picsum.photos/400/400?random={}", idx + 1)],
          video: None,
          category: category.into(),
        };
        catalog.insert_product(Product::from_new(new, now)?).await?;
        report.products += 1;
      }
    }
  }

  if report != SeedReport::default() {
    info!(stores = report.stores, products = report.products, "Sample catalog data seeded.");
  }
  Ok(report)
}
