// storefront_server/src/main.rs

use std::io;

use actix_web::{web as actix_data, App, HttpServer};
use storefront_server::config::AppConfig;
use storefront_server::state::AppState;
use storefront_server::web::{configure_app_routes, configure_extractors, error_handlers};
use tracing_subscriber::fmt::format::FmtSpan;

#[actix_web::main]
async fn main() -> io::Result<()> {
  // RUST_LOG overrides the default level; set LOG_FORMAT=json for structured output.
  let filter = tracing_subscriber::EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
  let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
  if json_logs {
    tracing_subscriber::fmt().json().with_env_filter(filter).init();
  } else {
    tracing_subscriber::fmt()
      .with_env_filter(filter)
      .with_span_events(FmtSpan::CLOSE)
      .init();
  }

  tracing::info!("Starting storefront server...");

  let app_config = AppConfig::from_env().map_err(|e| {
    tracing::error!(error = %e, "Failed to load application configuration.");
    io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
  })?;
  let server_address = app_config.bind_address();

  let app_state = AppState::initialize(app_config).await.map_err(|e| {
    tracing::error!(error = %e, "Failed to initialize application state.");
    io::Error::new(io::ErrorKind::Other, e.to_string())
  })?;

  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .configure(configure_extractors)
      .wrap(error_handlers())
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
