// storefront_server/src/config.rs

use std::env;
use std::path::PathBuf;

use dotenvy::dotenv;
use storefront::TransitionPolicy;

use crate::errors::{AppError, Result};

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  /// `None` runs the catalog on the in-process memory store.
  pub database_url: Option<String>,
  pub app_base_url: String,

  pub upload_dir: PathBuf,
  pub asset_base_url: String,

  pub transition_policy: TransitionPolicy,

  pub admin_email: Option<String>,
  pub admin_password: Option<String>,

  pub seed_db: bool,
}

impl Default for AppConfig {
  fn default() -> Self {
    let app_base_url = "http://127.0.0.1:8080".to_string();
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 8080,
      database_url: None,
      asset_base_url: format!("{app_base_url}/assets"),
      app_base_url,
      upload_dir: PathBuf::from("./uploads"),
      transition_policy: TransitionPolicy::default(),
      admin_email: None,
      admin_password: None,
      seed_db: false,
    }
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok();

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL").ok().filter(|url| !url.trim().is_empty());
    let app_base_url = get_env("APP_BASE_URL").unwrap_or_else(|_| format!("http://{}:{}", server_host, server_port));

    let upload_dir = PathBuf::from(get_env("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string()));
    let asset_base_url = get_env("ASSET_BASE_URL").unwrap_or_else(|_| format!("{}/assets", app_base_url));

    let transition_policy = match get_env("ORDER_TRANSITION_POLICY") {
      Ok(raw) => raw
        .parse::<TransitionPolicy>()
        .map_err(|e| AppError::Config(format!("Invalid ORDER_TRANSITION_POLICY: {}", e)))?,
      Err(_) => TransitionPolicy::default(),
    };

    let admin_email = get_env("ADMIN_EMAIL").ok();
    let admin_password = get_env("ADMIN_PASSWORD").ok();
    if admin_email.is_some() != admin_password.is_some() {
      return Err(AppError::Config(
        "ADMIN_EMAIL and ADMIN_PASSWORD must be set together".to_string(),
      ));
    }

    let seed_db = get_env("SEED_DB")
      .unwrap_or_else(|_| "false".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid SEED_DB value: {}", e)))?;

    tracing::info!(
      persistent = database_url.is_some(),
      policy = ?transition_policy,
      "Application configuration loaded successfully."
    );

    Ok(Self {
      server_host,
      server_port,
      database_url,
      app_base_url,
      upload_dir,
      asset_base_url,
      transition_policy,
      admin_email,
      admin_password,
      seed_db,
    })
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}
