// storefront/src/catalog/memory.rs

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use super::DocumentStore;
use crate::error::{StorefrontError, StorefrontResult};
use crate::models::{Credential, Order, Product, Store, User};

#[derive(Debug, Default)]
struct Collections {
  users: HashMap<Uuid, User>,
  credentials: HashMap<String, Credential>,
  stores: HashMap<Uuid, Store>,
  products: HashMap<Uuid, Product>,
  orders: HashMap<Uuid, Order>,
}

/// Process-local backend. Everything lives behind one lock, which makes the
/// multi-document writes trivially atomic.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
  inner: RwLock<Collections>,
}

impl MemoryDocumentStore {
  pub fn new() -> Self {
    Self::default()
  }
}

fn sorted_by_creation<T: Clone, K: Ord>(map: &HashMap<Uuid, T>, key: impl Fn(&T) -> K) -> Vec<T> {
  let mut docs: Vec<T> = map.values().cloned().collect();
  docs.sort_by_key(|d| key(d));
  docs
}

fn email_key(email: &str) -> String {
  email.trim().to_lowercase()
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
  async fn load_users(&self) -> StorefrontResult<Vec<User>> {
    Ok(sorted_by_creation(&self.inner.read().users, |u| u.created_at))
  }

  async fn load_stores(&self) -> StorefrontResult<Vec<Store>> {
    Ok(sorted_by_creation(&self.inner.read().stores, |s| s.created_at))
  }

  async fn load_products(&self) -> StorefrontResult<Vec<Product>> {
    Ok(sorted_by_creation(&self.inner.read().products, |p| p.created_at))
  }

  async fn load_orders(&self) -> StorefrontResult<Vec<Order>> {
    Ok(sorted_by_creation(&self.inner.read().orders, |o| o.created_at))
  }

  async fn insert_account(&self, user: &User, credential: &Credential) -> StorefrontResult<()> {
    let mut inner = self.inner.write();
    let key = email_key(&credential.email);
    if inner.credentials.contains_key(&key) || inner.users.contains_key(&user.id) {
      return Err(StorefrontError::Conflict(format!("an account already exists for {}", user.email)));
    }
    inner.users.insert(user.id, user.clone());
    inner.credentials.insert(key, credential.clone());
    Ok(())
  }

  async fn update_user(&self, user: &User) -> StorefrontResult<()> {
    let mut inner = self.inner.write();
    match inner.users.get_mut(&user.id) {
      Some(slot) => {
        *slot = user.clone();
        Ok(())
      }
      None => Err(StorefrontError::not_found("user", user.id)),
    }
  }

  async fn find_credential(&self, email: &str) -> StorefrontResult<Option<Credential>> {
    Ok(self.inner.read().credentials.get(&email_key(email)).cloned())
  }

  async fn insert_store(&self, store: &Store) -> StorefrontResult<()> {
    let mut inner = self.inner.write();
    if inner.stores.contains_key(&store.id) {
      return Err(StorefrontError::Conflict(format!("store {} already exists", store.id)));
    }
    inner.stores.insert(store.id, store.clone());
    Ok(())
  }

  async fn update_store(&self, store: &Store) -> StorefrontResult<()> {
    let mut inner = self.inner.write();
    match inner.stores.get_mut(&store.id) {
      Some(slot) => {
        *slot = store.clone();
        Ok(())
      }
      None => Err(StorefrontError::not_found("store", store.id)),
    }
  }

  async fn delete_store(&self, store_id: Uuid) -> StorefrontResult<Vec<Uuid>> {
    let mut inner = self.inner.write();
    if inner.stores.remove(&store_id).is_none() {
      return Err(StorefrontError::not_found("store", store_id));
    }
    let removed: Vec<Uuid> = inner
      .products
      .values()
      .filter(|p| p.store_id == store_id)
      .map(|p| p.id)
      .collect();
    for id in &removed {
      inner.products.remove(id);
    }
    Ok(removed)
  }

  async fn insert_product(&self, product: &Product) -> StorefrontResult<()> {
    let mut inner = self.inner.write();
    if inner.products.contains_key(&product.id) {
      return Err(StorefrontError::Conflict(format!("product {} already exists", product.id)));
    }
    inner.products.insert(product.id, product.clone());
    Ok(())
  }

  async fn update_product(&self, product: &Product) -> StorefrontResult<()> {
    let mut inner = self.inner.write();
    match inner.products.get_mut(&product.id) {
      Some(slot) => {
        *slot = product.clone();
        Ok(())
      }
      None => Err(StorefrontError::not_found("product", product.id)),
    }
  }

  async fn delete_product(&self, product_id: Uuid) -> StorefrontResult<()> {
    match self.inner.write().products.remove(&product_id) {
      Some(_) => Ok(()),
      None => Err(StorefrontError::not_found("product", product_id)),
    }
  }

  async fn insert_orders(&self, orders: &[Order]) -> StorefrontResult<()> {
    let mut inner = self.inner.write();
    if let Some(dup) = orders.iter().find(|o| inner.orders.contains_key(&o.id)) {
      return Err(StorefrontError::Conflict(format!("order {} already exists", dup.id)));
    }
    for order in orders {
      inner.orders.insert(order.id, order.clone());
    }
    Ok(())
  }

  async fn update_order(&self, order: &Order) -> StorefrontResult<()> {
    let mut inner = self.inner.write();
    match inner.orders.get_mut(&order.id) {
      Some(slot) => {
        *slot = order.clone();
        Ok(())
      }
      None => Err(StorefrontError::not_found("order", order.id)),
    }
  }

  async fn delete_order(&self, order_id: Uuid) -> StorefrontResult<()> {
    match self.inner.write().orders.remove(&order_id) {
      Some(_) => Ok(()),
      None => Err(StorefrontError::not_found("order", order_id)),
    }
  }
}
