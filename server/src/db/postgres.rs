// storefront_server/src/db/postgres.rs

//! PostgreSQL-backed [`DocumentStore`].
//!
//! Each collection is a table; order line items are a JSONB snapshot and the
//! small enums are stored as their lowercase labels.

use std::str::FromStr;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use storefront::models::{
  Credential, DisputeOutcome, Order, OrderItem, OrderStatus, Product, Role, Store, StoreLayout, StoreStatus, User,
};
use storefront::{DocumentStore, StorefrontError, StorefrontResult};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::Result as AppResult;

#[derive(Debug, Clone)]
pub struct PgDocumentStore {
  pool: PgPool,
}

impl PgDocumentStore {
  /// Connects and brings the schema up to date.
  #[instrument(name = "PgDocumentStore::connect", skip_all, err(Display))]
  pub async fn connect(database_url: &str) -> AppResult<Self> {
    let pool = PgPool::connect(database_url).await?;
    info!("Successfully connected to the database.");
    sqlx::migrate!("./migrations").run(&pool).await.map_err(sqlx::Error::from)?;
    info!("Database migrations applied.");
    Ok(Self { pool })
  }
}

fn backend(err: sqlx::Error) -> StorefrontError {
  if let sqlx::Error::Database(ref db_err) = err {
    if db_err.is_unique_violation() {
      return StorefrontError::Conflict(db_err.message().to_string());
    }
  }
  StorefrontError::from(anyhow::Error::new(err))
}

fn corrupt(what: &str, err: impl std::fmt::Display) -> StorefrontError {
  StorefrontError::from(anyhow!("invalid {what} in database: {err}"))
}

fn parse<T: FromStr>(what: &str, raw: &str) -> StorefrontResult<T>
where
  T::Err: std::fmt::Display,
{
  raw.parse::<T>().map_err(|e| corrupt(what, e))
}

fn affected(rows: u64, kind: &'static str, id: Uuid) -> StorefrontResult<()> {
  if rows == 0 {
    return Err(StorefrontError::not_found(kind, id));
  }
  Ok(())
}

#[derive(Debug, FromRow)]
struct UserRow {
  id: Uuid,
  email: String,
  role: String,
  created_at: DateTime<Utc>,
  last_active: Option<DateTime<Utc>>,
}

impl TryFrom<UserRow> for User {
  type Error = StorefrontError;

  fn try_from(row: UserRow) -> StorefrontResult<Self> {
    Ok(User {
      id: row.id,
      email: row.email,
      role: parse::<Role>("role", &row.role)?,
      created_at: row.created_at,
      last_active: row.last_active,
    })
  }
}

#[derive(Debug, FromRow)]
struct CredentialRow {
  user_id: Uuid,
  email: String,
  password_hash: String,
}

#[derive(Debug, FromRow)]
struct StoreRow {
  id: Uuid,
  name: String,
  description: String,
  category: String,
  owner_id: Uuid,
  logo: Option<String>,
  banner: Option<String>,
  primary_color: String,
  secondary_color: String,
  layout: String,
  status: String,
  created_at: DateTime<Utc>,
}

impl TryFrom<StoreRow> for Store {
  type Error = StorefrontError;

  fn try_from(row: StoreRow) -> StorefrontResult<Self> {
    Ok(Store {
      id: row.id,
      name: row.name,
      description: row.description,
      category: row.category,
      owner_id: row.owner_id,
      logo: row.logo,
      banner: row.banner,
      primary_color: row.primary_color,
      secondary_color: row.secondary_color,
      layout: parse::<StoreLayout>("store layout", &row.layout)?,
      status: parse::<StoreStatus>("store status", &row.status)?,
      created_at: row.created_at,
    })
  }
}

#[derive(Debug, FromRow)]
struct ProductRow {
  id: Uuid,
  name: String,
  description: String,
  price: i64,
  original_price: Option<i64>,
  store_id: Uuid,
  stock: Option<i64>,
  images: Vec<String>,
  video: Option<String>,
  category: String,
  created_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
  type Error = StorefrontError;

  fn try_from(row: ProductRow) -> StorefrontResult<Self> {
    let stock = row
      .stock
      .map(u32::try_from)
      .transpose()
      .map_err(|e| corrupt("stock", e))?;
    Ok(Product {
      id: row.id,
      name: row.name,
      description: row.description,
      price: row.price,
      original_price: row.original_price,
      store_id: row.store_id,
      stock,
      images: row.images,
      video: row.video,
      category: row.category,
      created_at: row.created_at,
    })
  }
}

#[derive(Debug, FromRow)]
struct OrderRow {
  id: Uuid,
  store_id: Uuid,
  store_name: String,
  customer_id: Uuid,
  customer_name: String,
  customer_email: String,
  customer_phone: String,
  customer_address: String,
  items: Json<Vec<OrderItem>>,
  total: i64,
  status: String,
  created_at: DateTime<Utc>,
  buyer_claimed: bool,
  buyer_claim_date: Option<DateTime<Utc>>,
  buyer_received: Option<bool>,
  dispute_resolved: bool,
  dispute_resolution: Option<String>,
  dispute_notes: Option<String>,
  dispute_resolved_at: Option<DateTime<Utc>>,
  dispute_resolved_by: Option<String>,
}

impl TryFrom<OrderRow> for Order {
  type Error = StorefrontError;

  fn try_from(row: OrderRow) -> StorefrontResult<Self> {
    Ok(Order {
      id: row.id,
      store_id: row.store_id,
      store_name: row.store_name,
      customer_id: row.customer_id,
      customer_name: row.customer_name,
      customer_email: row.customer_email,
      customer_phone: row.customer_phone,
      customer_address: row.customer_address,
      items: row.items.0,
      total: row.total,
      status: parse::<OrderStatus>("order status", &row.status)?,
      created_at: row.created_at,
      buyer_claimed: row.buyer_claimed,
      buyer_claim_date: row.buyer_claim_date,
      buyer_received: row.buyer_received,
      dispute_resolved: row.dispute_resolved,
      dispute_resolution: row.dispute_resolution.map(DisputeOutcome::from),
      dispute_notes: row.dispute_notes,
      dispute_resolved_at: row.dispute_resolved_at,
      dispute_resolved_by: row.dispute_resolved_by,
    })
  }
}

fn convert_all<R, T>(rows: Vec<R>) -> StorefrontResult<Vec<T>>
where
  T: TryFrom<R, Error = StorefrontError>,
{
  rows.into_iter().map(T::try_from).collect()
}

const ORDER_COLUMNS: &str = "id, store_id, store_name, customer_id, customer_name, customer_email, customer_phone, \
   customer_address, items, total, status, created_at, buyer_claimed, buyer_claim_date, buyer_received, \
   dispute_resolved, dispute_resolution, dispute_notes, dispute_resolved_at, dispute_resolved_by";

const INSERT_ORDER: &str = "INSERT INTO orders (id, store_id, store_name, customer_id, customer_name, customer_email, \
   customer_phone, customer_address, items, total, status, created_at, buyer_claimed, buyer_claim_date, \
   buyer_received, dispute_resolved, dispute_resolution, dispute_notes, dispute_resolved_at, dispute_resolved_by) \
   VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)";

#[async_trait]
impl DocumentStore for PgDocumentStore {
  async fn load_users(&self) -> StorefrontResult<Vec<User>> {
    let rows: Vec<UserRow> =
      sqlx::query_as("SELECT id, email, role, created_at, last_active FROM users ORDER BY created_at ASC")
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
    convert_all(rows)
  }

  async fn load_stores(&self) -> StorefrontResult<Vec<Store>> {
    let rows: Vec<StoreRow> = sqlx::query_as(
      "SELECT id, name, description, category, owner_id, logo, banner, primary_color, secondary_color, layout, \
       status, created_at FROM stores ORDER BY created_at ASC",
    )
    .fetch_all(&self.pool)
    .await
    .map_err(backend)?;
    convert_all(rows)
  }

  async fn load_products(&self) -> StorefrontResult<Vec<Product>> {
    let rows: Vec<ProductRow> = sqlx::query_as(
      "SELECT id, name, description, price, original_price, store_id, stock, images, video, category, created_at \
       FROM products ORDER BY created_at ASC",
    )
    .fetch_all(&self.pool)
    .await
    .map_err(backend)?;
    convert_all(rows)
  }

  async fn load_orders(&self) -> StorefrontResult<Vec<Order>> {
    let rows: Vec<OrderRow> = sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at ASC"))
      .fetch_all(&self.pool)
      .await
      .map_err(backend)?;
    convert_all(rows)
  }

  async fn insert_account(&self, user: &User, credential: &Credential) -> StorefrontResult<()> {
    let mut tx = self.pool.begin().await.map_err(backend)?;
    sqlx::query("INSERT INTO users (id, email, role, created_at, last_active) VALUES ($1, $2, $3, $4, $5)")
      .bind(user.id)
      .bind(&user.email)
      .bind(user.role.as_str())
      .bind(user.created_at)
      .bind(user.last_active)
      .execute(&mut *tx)
      .await
      .map_err(backend)?;
    sqlx::query("INSERT INTO credentials (user_id, email, password_hash) VALUES ($1, $2, $3)")
      .bind(credential.user_id)
      .bind(&credential.email)
      .bind(&credential.password_hash)
      .execute(&mut *tx)
      .await
      .map_err(backend)?;
    tx.commit().await.map_err(backend)
  }

  async fn update_user(&self, user: &User) -> StorefrontResult<()> {
    let result = sqlx::query("UPDATE users SET email = $2, role = $3, last_active = $4 WHERE id = $1")
      .bind(user.id)
      .bind(&user.email)
      .bind(user.role.as_str())
      .bind(user.last_active)
      .execute(&self.pool)
      .await
      .map_err(backend)?;
    affected(result.rows_affected(), "user", user.id)
  }

  async fn find_credential(&self, email: &str) -> StorefrontResult<Option<Credential>> {
    let row: Option<CredentialRow> =
      sqlx::query_as("SELECT user_id, email, password_hash FROM credentials WHERE lower(email) = lower($1)")
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;
    Ok(row.map(|r| Credential {
      user_id: r.user_id,
      email: r.email,
      password_hash: r.password_hash,
    }))
  }

  async fn insert_store(&self, store: &Store) -> StorefrontResult<()> {
    sqlx::query(
      "INSERT INTO stores (id, name, description, category, owner_id, logo, banner, primary_color, \
       secondary_color, layout, status, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
    )
    .bind(store.id)
    .bind(&store.name)
    .bind(&store.description)
    .bind(&store.category)
    .bind(store.owner_id)
    .bind(&store.logo)
    .bind(&store.banner)
    .bind(&store.primary_color)
    .bind(&store.secondary_color)
    .bind(store.layout.as_str())
    .bind(store.status.as_str())
    .bind(store.created_at)
    .execute(&self.pool)
    .await
    .map_err(backend)?;
    Ok(())
  }

  async fn update_store(&self, store: &Store) -> StorefrontResult<()> {
    let result = sqlx::query(
      "UPDATE stores SET name = $2, description = $3, category = $4, logo = $5, banner = $6, primary_color = $7, \
       secondary_color = $8, layout = $9, status = $10 WHERE id = $1",
    )
    .bind(store.id)
    .bind(&store.name)
    .bind(&store.description)
    .bind(&store.category)
    .bind(&store.logo)
    .bind(&store.banner)
    .bind(&store.primary_color)
    .bind(&store.secondary_color)
    .bind(store.layout.as_str())
    .bind(store.status.as_str())
    .execute(&self.pool)
    .await
    .map_err(backend)?;
    affected(result.rows_affected(), "store", store.id)
  }

  async fn delete_store(&self, store_id: Uuid) -> StorefrontResult<Vec<Uuid>> {
    let mut tx = self.pool.begin().await.map_err(backend)?;
    let removed: Vec<Uuid> = sqlx::query_scalar("DELETE FROM products WHERE store_id = $1 RETURNING id")
      .bind(store_id)
      .fetch_all(&mut *tx)
      .await
      .map_err(backend)?;
    let result = sqlx::query("DELETE FROM stores WHERE id = $1")
      .bind(store_id)
      .execute(&mut *tx)
      .await
      .map_err(backend)?;
    affected(result.rows_affected(), "store", store_id)?;
    tx.commit().await.map_err(backend)?;
    Ok(removed)
  }

  async fn insert_product(&self, product: &Product) -> StorefrontResult<()> {
    sqlx::query(
      "INSERT INTO products (id, name, description, price, original_price, store_id, stock, images, video, \
       category, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
    )
    .bind(product.id)
    .bind(&product.name)
    .bind(&product.description)
    .bind(product.price)
    .bind(product.original_price)
    .bind(product.store_id)
    .bind(product.stock.map(i64::from))
    .bind(&product.images)
    .bind(&product.video)
    .bind(&product.category)
    .bind(product.created_at)
    .execute(&self.pool)
    .await
    .map_err(backend)?;
    Ok(())
  }

  async fn update_product(&self, product: &Product) -> StorefrontResult<()> {
    let result = sqlx::query(
      "UPDATE products SET name = $2, description = $3, price = $4, original_price = $5, stock = $6, images = $7, \
       video = $8, category = $9 WHERE id = $1",
    )
    .bind(product.id)
    .bind(&product.name)
    .bind(&product.description)
    .bind(product.price)
    .bind(product.original_price)
    .bind(product.stock.map(i64::from))
    .bind(&product.images)
    .bind(&product.video)
    .bind(&product.category)
    .execute(&self.pool)
    .await
    .map_err(backend)?;
    affected(result.rows_affected(), "product", product.id)
  }

  async fn delete_product(&self, product_id: Uuid) -> StorefrontResult<()> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
      .bind(product_id)
      .execute(&self.pool)
      .await
      .map_err(backend)?;
    affected(result.rows_affected(), "product", product_id)
  }

  #[instrument(skip(self, orders), fields(count = orders.len()))]
  async fn insert_orders(&self, orders: &[Order]) -> StorefrontResult<()> {
    let mut tx = self.pool.begin().await.map_err(backend)?;
    for order in orders {
      sqlx::query(INSERT_ORDER)
        .bind(order.id)
        .bind(order.store_id)
        .bind(&order.store_name)
        .bind(order.customer_id)
        .bind(&order.customer_name)
        .bind(&order.customer_email)
        .bind(&order.customer_phone)
        .bind(&order.customer_address)
        .bind(Json(&order.items))
        .bind(order.total)
        .bind(order.status.as_str())
        .bind(order.created_at)
        .bind(order.buyer_claimed)
        .bind(order.buyer_claim_date)
        .bind(order.buyer_received)
        .bind(order.dispute_resolved)
        .bind(order.dispute_resolution.as_ref().map(|o| o.label().to_string()))
        .bind(&order.dispute_notes)
        .bind(order.dispute_resolved_at)
        .bind(&order.dispute_resolved_by)
        .execute(&mut *tx)
        .await
        .map_err(backend)?;
    }
    tx.commit().await.map_err(backend)
  }

  async fn update_order(&self, order: &Order) -> StorefrontResult<()> {
    let result = sqlx::query(
      "UPDATE orders SET store_name = $2, customer_name = $3, customer_email = $4, customer_phone = $5, \
       customer_address = $6, items = $7, total = $8, status = $9, buyer_claimed = $10, buyer_claim_date = $11, \
       buyer_received = $12, dispute_resolved = $13, dispute_resolution = $14, dispute_notes = $15, \
       dispute_resolved_at = $16, dispute_resolved_by = $17 WHERE id = $1",
    )
    .bind(order.id)
    .bind(&order.store_name)
    .bind(&order.customer_name)
    .bind(&order.customer_email)
    .bind(&order.customer_phone)
    .bind(&order.customer_address)
    .bind(Json(&order.items))
    .bind(order.total)
    .bind(order.status.as_str())
    .bind(order.buyer_claimed)
    .bind(order.buyer_claim_date)
    .bind(order.buyer_received)
    .bind(order.dispute_resolved)
    .bind(order.dispute_resolution.as_ref().map(|o| o.label().to_string()))
    .bind(&order.dispute_notes)
    .bind(order.dispute_resolved_at)
    .bind(&order.dispute_resolved_by)
    .execute(&self.pool)
    .await
    .map_err(backend)?;
    affected(result.rows_affected(), "order", order.id)
  }

  async fn delete_order(&self, order_id: Uuid) -> StorefrontResult<()> {
    let result = sqlx::query("DELETE FROM orders WHERE id = $1")
      .bind(order_id)
      .execute(&self.pool)
      .await
      .map_err(backend)?;
    affected(result.rows_affected(), "order", order_id)
  }
}
