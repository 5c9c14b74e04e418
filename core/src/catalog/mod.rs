// storefront/src/catalog/mod.rs

//! The shared catalog: users, stores, products and orders.
//!
//! A [`DocumentStore`] is the durable backend. [`Catalog`] sits in front of
//! it and keeps an in-process mirror of every collection, published through
//! `tokio::sync::watch` so views can subscribe to changes. Writes hit the
//! backend first; the mirror only changes once the backend accepted them.

pub mod memory;
pub mod seed;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::blob::{resolve_asset, resolve_optional_asset, AssetFolder, BlobStore};
use crate::dispute::is_disputed;
use crate::error::{StorefrontError, StorefrontResult};
use crate::models::{
  Credential, NewProduct, NewStore, Order, Product, ProductUpdate, Role, Store, StoreStatus, StoreUpdate, User,
};

pub use memory::MemoryDocumentStore;

/// Durable storage for the four collections.
///
/// Implementations must make [`DocumentStore::insert_orders`] all-or-nothing
/// and must reject a second account for an email already registered.
#[async_trait]
pub trait DocumentStore: Send + Sync {
  async fn load_users(&self) -> StorefrontResult<Vec<User>>;
  async fn load_stores(&self) -> StorefrontResult<Vec<Store>>;
  async fn load_products(&self) -> StorefrontResult<Vec<Product>>;
  async fn load_orders(&self) -> StorefrontResult<Vec<Order>>;

  /// Creates the user record and its credential together.
  async fn insert_account(&self, user: &User, credential: &Credential) -> StorefrontResult<()>;
  async fn update_user(&self, user: &User) -> StorefrontResult<()>;
  async fn find_credential(&self, email: &str) -> StorefrontResult<Option<Credential>>;

  async fn insert_store(&self, store: &Store) -> StorefrontResult<()>;
  async fn update_store(&self, store: &Store) -> StorefrontResult<()>;
  /// Deletes the store and its products; returns the ids of removed products.
  async fn delete_store(&self, store_id: Uuid) -> StorefrontResult<Vec<Uuid>>;

  async fn insert_product(&self, product: &Product) -> StorefrontResult<()>;
  async fn update_product(&self, product: &Product) -> StorefrontResult<()>;
  async fn delete_product(&self, product_id: Uuid) -> StorefrontResult<()>;

  /// Inserts every order or none of them.
  async fn insert_orders(&self, orders: &[Order]) -> StorefrontResult<()>;
  async fn update_order(&self, order: &Order) -> StorefrontResult<()>;
  async fn delete_order(&self, order_id: Uuid) -> StorefrontResult<()>;
}

trait Document {
  fn doc_id(&self) -> Uuid;
}

macro_rules! document {
  ($($ty:ty),*) => {
    $(impl Document for $ty {
      fn doc_id(&self) -> Uuid {
        self.id
      }
    })*
  };
}

document!(User, Store, Product, Order);

fn upsert<T: Document>(tx: &watch::Sender<Vec<T>>, doc: T) {
  tx.send_modify(|docs| match docs.iter_mut().find(|d| d.doc_id() == doc.doc_id()) {
    Some(slot) => *slot = doc,
    None => docs.push(doc),
  });
}

fn remove<T: Document>(tx: &watch::Sender<Vec<T>>, id: Uuid) {
  tx.send_modify(|docs| docs.retain(|d| d.doc_id() != id));
}

fn find<T: Document + Clone>(tx: &watch::Sender<Vec<T>>, id: Uuid) -> Option<T> {
  tx.borrow().iter().find(|d| d.doc_id() == id).cloned()
}

fn newest_first(orders: &mut [Order]) {
  orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

pub struct Catalog {
  backend: Arc<dyn DocumentStore>,
  blobs: Arc<dyn BlobStore>,
  users: watch::Sender<Vec<User>>,
  stores: watch::Sender<Vec<Store>>,
  products: watch::Sender<Vec<Product>>,
  orders: watch::Sender<Vec<Order>>,
}

impl std::fmt::Debug for Catalog {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Catalog")
      .field("users", &self.users.borrow().len())
      .field("stores", &self.stores.borrow().len())
      .field("products", &self.products.borrow().len())
      .field("orders", &self.orders.borrow().len())
      .finish()
  }
}

impl Catalog {
  /// Hydrates the mirror from `backend`.
  #[instrument(name = "Catalog::load", skip_all)]
  pub async fn load(backend: Arc<dyn DocumentStore>, blobs: Arc<dyn BlobStore>) -> StorefrontResult<Self> {
    let catalog = Catalog {
      backend,
      blobs,
      users: watch::channel(Vec::new()).0,
      stores: watch::channel(Vec::new()).0,
      products: watch::channel(Vec::new()).0,
      orders: watch::channel(Vec::new()).0,
    };
    catalog.refresh().await?;
    Ok(catalog)
  }

  /// Reloads every collection from the backend and notifies subscribers.
  pub async fn refresh(&self) -> StorefrontResult<()> {
    let users = self.backend.load_users().await?;
    let stores = self.backend.load_stores().await?;
    let products = self.backend.load_products().await?;
    let orders = self.backend.load_orders().await?;
    info!(
      users = users.len(),
      stores = stores.len(),
      products = products.len(),
      orders = orders.len(),
      "Catalog mirror loaded."
    );
    self.users.send_replace(users);
    self.stores.send_replace(stores);
    self.products.send_replace(products);
    self.orders.send_replace(orders);
    Ok(())
  }

  pub fn blobs(&self) -> &Arc<dyn BlobStore> {
    &self.blobs
  }

  // Subscriptions. Dropping the receiver unsubscribes.

  pub fn subscribe_users(&self) -> watch::Receiver<Vec<User>> {
    self.users.subscribe()
  }

  pub fn subscribe_stores(&self) -> watch::Receiver<Vec<Store>> {
    self.stores.subscribe()
  }

  pub fn subscribe_products(&self) -> watch::Receiver<Vec<Product>> {
    self.products.subscribe()
  }

  pub fn subscribe_orders(&self) -> watch::Receiver<Vec<Order>> {
    self.orders.subscribe()
  }

  pub fn subscriber_count(&self) -> usize {
    self.users.receiver_count()
      + self.stores.receiver_count()
      + self.products.receiver_count()
      + self.orders.receiver_count()
  }

  // Users

  #[instrument(skip(self, user, credential), fields(user_id = %user.id, role = %user.role))]
  pub async fn register_user(&self, user: User, credential: Credential) -> StorefrontResult<User> {
    if self.user_by_email(&user.email).is_some() {
      return Err(StorefrontError::Conflict(format!("an account already exists for {}", user.email)));
    }
    self.backend.insert_account(&user, &credential).await?;
    upsert(&self.users, user.clone());
    info!("User registered.");
    Ok(user)
  }

  pub fn user(&self, id: Uuid) -> Option<User> {
    find(&self.users, id)
  }

  pub fn user_by_email(&self, email: &str) -> Option<User> {
    self.users.borrow().iter().find(|u| u.email.eq_ignore_ascii_case(email)).cloned()
  }

  pub fn users(&self) -> Vec<User> {
    self.users.borrow().clone()
  }

  pub async fn credential(&self, email: &str) -> StorefrontResult<Option<Credential>> {
    self.backend.find_credential(email).await
  }

  /// Stamps `last_active`.
  pub async fn touch_user(&self, id: Uuid, now: DateTime<Utc>) -> StorefrontResult<User> {
    let mut user = self.user(id).ok_or_else(|| StorefrontError::not_found("user", id))?;
    user.last_active = Some(now);
    self.backend.update_user(&user).await?;
    upsert(&self.users, user.clone());
    Ok(user)
  }

  #[instrument(skip(self))]
  pub async fn set_user_role(&self, id: Uuid, role: Role) -> StorefrontResult<User> {
    let mut user = self.user(id).ok_or_else(|| StorefrontError::not_found("user", id))?;
    user.role = role;
    self.backend.update_user(&user).await?;
    upsert(&self.users, user.clone());
    info!("User role changed.");
    Ok(user)
  }

  // Stores

  #[instrument(skip(self, owner, new), fields(owner_id = %owner.id))]
  pub async fn create_store(&self, owner: &User, mut new: NewStore, now: DateTime<Utc>) -> StorefrontResult<Store> {
    if owner.role != Role::Seller {
      return Err(StorefrontError::Forbidden("only sellers can create stores".into()));
    }
    new.logo = resolve_optional_asset(self.blobs.as_ref(), AssetFolder::Logos, new.logo).await?;
    new.banner = resolve_optional_asset(self.blobs.as_ref(), AssetFolder::Banners, new.banner).await?;
    let store = Store::from_new(new, owner.id, now)?;
    self.backend.insert_store(&store).await?;
    upsert(&self.stores, store.clone());
    info!(store_id = %store.id, name = %store.name, "Store created.");
    Ok(store)
  }

  /// Inserts a fully-formed store without owner checks. Used for seeding.
  pub async fn insert_store(&self, store: Store) -> StorefrontResult<Store> {
    self.backend.insert_store(&store).await?;
    upsert(&self.stores, store.clone());
    Ok(store)
  }

  #[instrument(skip(self, update))]
  pub async fn update_store(&self, actor_id: Uuid, store_id: Uuid, mut update: StoreUpdate) -> StorefrontResult<Store> {
    let mut store = self.owned_store(actor_id, store_id)?;
    update.logo = resolve_optional_asset(self.blobs.as_ref(), AssetFolder::Logos, update.logo).await?;
    update.banner = resolve_optional_asset(self.blobs.as_ref(), AssetFolder::Banners, update.banner).await?;
    store.apply(update)?;
    self.backend.update_store(&store).await?;
    upsert(&self.stores, store.clone());
    debug!("Store updated.");
    Ok(store)
  }

  /// Admin moderation; the caller is responsible for the admin check.
  #[instrument(skip(self))]
  pub async fn set_store_status(&self, store_id: Uuid, status: StoreStatus) -> StorefrontResult<Store> {
    let mut store = self.store(store_id).ok_or_else(|| StorefrontError::not_found("store", store_id))?;
    store.status = status;
    self.backend.update_store(&store).await?;
    upsert(&self.stores, store.clone());
    info!("Store status changed.");
    Ok(store)
  }

  /// Deletes a store and its products. Orders placed against it are kept.
  #[instrument(skip(self))]
  pub async fn delete_store(&self, actor_id: Uuid, store_id: Uuid) -> StorefrontResult<usize> {
    self.owned_store(actor_id, store_id)?;
    let removed = self.backend.delete_store(store_id).await?;
    remove(&self.stores, store_id);
    self.products.send_modify(|products| products.retain(|p| p.store_id != store_id));
    info!(products_removed = removed.len(), "Store deleted.");
    Ok(removed.len())
  }

  pub fn store(&self, id: Uuid) -> Option<Store> {
    find(&self.stores, id)
  }

  pub fn store_name(&self, id: Uuid) -> Option<String> {
    self.stores.borrow().iter().find(|s| s.id == id).map(|s| s.name.clone())
  }

  pub fn stores(&self) -> Vec<Store> {
    self.stores.borrow().clone()
  }

  pub fn stores_owned_by(&self, owner_id: Uuid) -> Vec<Store> {
    self.stores.borrow().iter().filter(|s| s.owner_id == owner_id).cloned().collect()
  }

  /// Case-insensitive substring search over store name and description.
  /// A blank query returns every store.
  pub fn search_stores(&self, query: &str) -> Vec<Store> {
    self.stores.borrow().iter().filter(|s| s.matches(query)).cloned().collect()
  }

  fn owned_store(&self, actor_id: Uuid, store_id: Uuid) -> StorefrontResult<Store> {
    let store = self.store(store_id).ok_or_else(|| StorefrontError::not_found("store", store_id))?;
    if store.owner_id != actor_id {
      warn!(%actor_id, %store_id, "Store access denied.");
      return Err(StorefrontError::Forbidden(format!("store {store_id} belongs to another seller")));
    }
    Ok(store)
  }

  // Products

  #[instrument(skip(self, new), fields(store_id = %new.store_id))]
  pub async fn create_product(&self, actor_id: Uuid, mut new: NewProduct, now: DateTime<Utc>) -> StorefrontResult<Product> {
    self.owned_store(actor_id, new.store_id)?;
    new.images = self.resolve_images(new.images).await?;
    new.video = resolve_optional_asset(self.blobs.as_ref(), AssetFolder::Videos, new.video).await?;
    let product = Product::from_new(new, now)?;
    self.backend.insert_product(&product).await?;
    upsert(&self.products, product.clone());
    info!(product_id = %product.id, "Product created.");
    Ok(product)
  }

  /// Inserts a fully-formed product without owner checks. Used for seeding.
  pub async fn insert_product(&self, product: Product) -> StorefrontResult<Product> {
    self.backend.insert_product(&product).await?;
    upsert(&self.products, product.clone());
    Ok(product)
  }

  #[instrument(skip(self, update))]
  pub async fn update_product(
    &self,
    actor_id: Uuid,
    product_id: Uuid,
    mut update: ProductUpdate,
  ) -> StorefrontResult<Product> {
    let mut product = self.product(product_id).ok_or_else(|| StorefrontError::not_found("product", product_id))?;
    self.owned_store(actor_id, product.store_id)?;
    if let Some(images) = update.images.take() {
      update.images = Some(self.resolve_images(images).await?);
    }
    if let Some(video) = update.video.take() {
      update.video = Some(resolve_optional_asset(self.blobs.as_ref(), AssetFolder::Videos, video).await?);
    }
    product.apply(update)?;
    self.backend.update_product(&product).await?;
    upsert(&self.products, product.clone());
    debug!("Product updated.");
    Ok(product)
  }

  #[instrument(skip(self))]
  pub async fn delete_product(&self, actor_id: Uuid, product_id: Uuid) -> StorefrontResult<()> {
    let product = self.product(product_id).ok_or_else(|| StorefrontError::not_found("product", product_id))?;
    self.owned_store(actor_id, product.store_id)?;
    self.backend.delete_product(product_id).await?;
    remove(&self.products, product_id);
    info!("Product deleted.");
    Ok(())
  }

  pub fn product(&self, id: Uuid) -> Option<Product> {
    find(&self.products, id)
  }

  pub fn products(&self) -> Vec<Product> {
    self.products.borrow().clone()
  }

  pub fn products_in_store(&self, store_id: Uuid) -> Vec<Product> {
    self.products.borrow().iter().filter(|p| p.store_id == store_id).cloned().collect()
  }

  async fn resolve_images(&self, images: Vec<String>) -> StorefrontResult<Vec<String>> {
    let mut resolved = Vec::with_capacity(images.len());
    for image in images {
      resolved.push(resolve_asset(self.blobs.as_ref(), AssetFolder::Products, image).await?);
    }
    Ok(resolved)
  }

  // Orders

  /// Persists a checkout's orders in one all-or-nothing write.
  #[instrument(skip(self, orders), fields(count = orders.len()))]
  pub async fn place_orders(&self, orders: Vec<Order>) -> StorefrontResult<Vec<Order>> {
    if orders.is_empty() {
      return Err(StorefrontError::validation("no orders to place"));
    }
    self.backend.insert_orders(&orders).await?;
    self.orders.send_modify(|all| all.extend(orders.iter().cloned()));
    info!("Orders placed.");
    Ok(orders)
  }

  /// Replaces the stored order document. Last write wins.
  pub async fn save_order(&self, order: Order) -> StorefrontResult<Order> {
    if self.order(order.id).is_none() {
      return Err(StorefrontError::not_found("order", order.id));
    }
    self.backend.update_order(&order).await?;
    upsert(&self.orders, order.clone());
    Ok(order)
  }

  /// Sellers may delete orders placed against their own stores.
  #[instrument(skip(self))]
  pub async fn delete_order(&self, actor_id: Uuid, order_id: Uuid) -> StorefrontResult<()> {
    let order = self.order(order_id).ok_or_else(|| StorefrontError::not_found("order", order_id))?;
    self.ensure_store_owner(actor_id, order.store_id)?;
    self.backend.delete_order(order_id).await?;
    remove(&self.orders, order_id);
    info!("Order deleted.");
    Ok(())
  }

  pub fn ensure_store_owner(&self, actor_id: Uuid, store_id: Uuid) -> StorefrontResult<()> {
    self.owned_store(actor_id, store_id).map(|_| ())
  }

  pub fn order(&self, id: Uuid) -> Option<Order> {
    find(&self.orders, id)
  }

  pub fn orders(&self) -> Vec<Order> {
    self.orders.borrow().clone()
  }

  pub fn orders_for_customer(&self, customer_id: Uuid) -> Vec<Order> {
    let mut orders: Vec<Order> = self.orders.borrow().iter().filter(|o| o.customer_id == customer_id).cloned().collect();
    newest_first(&mut orders);
    orders
  }

  pub fn orders_for_owner(&self, owner_id: Uuid) -> Vec<Order> {
    let owned: Vec<Uuid> = self.stores_owned_by(owner_id).iter().map(|s| s.id).collect();
    let mut orders: Vec<Order> = self.orders.borrow().iter().filter(|o| owned.contains(&o.store_id)).cloned().collect();
    newest_first(&mut orders);
    orders
  }

  pub fn disputed_orders(&self) -> Vec<Order> {
    let mut orders: Vec<Order> = self.orders.borrow().iter().filter(|o| is_disputed(o)).cloned().collect();
    newest_first(&mut orders);
    orders
  }
}
