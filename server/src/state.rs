// storefront_server/src/state.rs

use std::sync::Arc;

use chrono::Utc;
use storefront::catalog::seed::seed_if_empty;
use storefront::{BlobStore, Catalog, DocumentStore, FsBlobStore, MemoryDocumentStore};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::db::PgDocumentStore;
use crate::errors::Result;
use crate::pipelines::Pipelines;
use crate::services::{auth_service, SessionStore};

#[derive(Clone)]
pub struct AppState {
  pub catalog: Arc<Catalog>,
  pub sessions: Arc<SessionStore>,
  pub pipelines: Arc<Pipelines>,
  pub config: Arc<AppConfig>,
}

impl AppState {
  /// Wires a state around an already loaded catalog.
  pub fn new(catalog: Catalog, config: AppConfig) -> Result<Self> {
    Ok(Self {
      catalog: Arc::new(catalog),
      sessions: Arc::new(SessionStore::new()),
      pipelines: Arc::new(Pipelines::build()?),
      config: Arc::new(config),
    })
  }

  /// Picks the document backend from `config`, loads the catalog and applies
  /// the configured admin account and sample data.
  pub async fn initialize(config: AppConfig) -> Result<Self> {
    let backend: Arc<dyn DocumentStore> = match &config.database_url {
      Some(url) => Arc::new(PgDocumentStore::connect(url).await?),
      None => {
        warn!("DATABASE_URL is not set; using the in-memory document store. Data is lost on restart.");
        Arc::new(MemoryDocumentStore::new())
      }
    };
    let blobs: Arc<dyn BlobStore> = Arc::new(FsBlobStore::new(config.upload_dir.clone(), config.asset_base_url.clone()));
    let catalog = Catalog::load(backend, blobs).await?;
    info!(?catalog, "Catalog loaded.");

    let state = Self::new(catalog, config)?;

    let admin_id = match (&state.config.admin_email, &state.config.admin_password) {
      (Some(email), Some(password)) => Some(auth_service::ensure_admin(&state.catalog, email, password).await?.id),
      _ => None,
    };

    if state.config.seed_db {
      let report = seed_if_empty(&state.catalog, admin_id.unwrap_or_else(Uuid::nil), Utc::now()).await?;
      info!(stores = report.stores, products = report.products, "Sample data seeded.");
    }

    Ok(state)
  }
}
