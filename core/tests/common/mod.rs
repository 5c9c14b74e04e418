// tests/common/mod.rs
#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;
use once_cell::sync::Lazy;
use storefront::models::{Credential, NewProduct, NewStore, Product, Role, Store, User};
use storefront::{Catalog, ContextData, MemoryBlobStore, MemoryDocumentStore, PipelineControl, WorkflowError};
use tracing::Level;
use uuid::Uuid;

// --- Workflow fixtures ---

#[derive(Clone, Debug, Default)]
pub struct TestContext {
  pub counter: i32,
  pub message: String,
  pub steps_executed: Vec<String>,
  pub should_stop_at: Option<String>,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("workflow error: {0}")]
  Workflow(#[from] WorkflowError),

  #[error("test handler failed: {0}")]
  Handler(String),
}

pub fn create_simple_handler(
  step_name: &'static str,
  message_to_append: &'static str,
) -> storefront::workflow::Handler<TestContext, TestError> {
  Box::new(move |ctx: ContextData<TestContext>| {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.counter += 1;
      guard.message.push_str(message_to_append);
      guard.steps_executed.push(step_name.to_string());
      tracing::debug!(target: "test_handlers", step = step_name, counter = guard.counter, "executed");
      if guard.should_stop_at.as_deref() == Some(step_name) {
        return Ok(PipelineControl::Stop);
      }
      Ok(PipelineControl::Continue)
    })
  })
}

pub fn create_failing_handler(
  step_name: &'static str,
  error_message: &'static str,
) -> storefront::workflow::Handler<TestContext, TestError> {
  Box::new(move |ctx: ContextData<TestContext>| {
    Box::pin(async move {
      ctx.write().steps_executed.push(step_name.to_string());
      tracing::warn!(target: "test_handlers", step = step_name, "failing with: '{}'", error_message);
      Err(TestError::Handler(error_message.to_string()))
    })
  })
}

// --- Tracing ---

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Catalog fixtures ---

pub struct Fixture {
  pub catalog: Catalog,
  pub backend: Arc<MemoryDocumentStore>,
  pub blobs: Arc<MemoryBlobStore>,
}

pub async fn empty_catalog() -> Fixture {
  let backend = Arc::new(MemoryDocumentStore::new());
  let blobs = Arc::new(MemoryBlobStore::new());
  let catalog = Catalog::load(backend.clone(), blobs.clone()).await.unwrap();
  Fixture { catalog, backend, blobs }
}

pub async fn register(catalog: &Catalog, email: &str, role: Role) -> User {
  let user = User {
    id: Uuid::new_v4(),
    email: email.to_string(),
    role,
    created_at: Utc::now(),
    last_active: None,
  };
  let credential = Credential {
    user_id: user.id,
    email: email.to_string(),
    password_hash: "not-a-real-hash".to_string(),
  };
  catalog.register_user(user, credential).await.unwrap()
}

pub async fn open_store(catalog: &Catalog, owner: &User, name: &str) -> Store {
  catalog
    .create_store(
      owner,
      NewStore {
        name: name.to_string(),
        description: format!("{name} sells things"),
        ..NewStore::default()
      },
      Utc::now(),
    )
    .await
    .unwrap()
}

pub async fn list_product(catalog: &Catalog, owner: &User, store: &Store, name: &str, price: i64) -> Product {
  catalog
    .create_product(
      owner.id,
      NewProduct {
        name: name.to_string(),
        price,
        store_id: store.id,
        ..NewProduct::default()
      },
      Utc::now(),
    )
    .await
    .unwrap()
}
