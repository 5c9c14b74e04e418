// storefront_server/src/errors.rs

use actix_web::http::{header, StatusCode};
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use storefront::{StorefrontError, WorkflowError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  /// The caller's role may not use this surface; they belong at the path.
  #[error("Redirecting to {0}")]
  Redirect(String),

  #[error(transparent)]
  Storefront(#[from] StorefrontError),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Workflow Error: {source}")]
  Workflow {
    #[from]
    source: WorkflowError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),

  #[error("Pipeline execution was halted by a handler: {0}")]
  PipelineHalted(String),
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<sqlx::Error>() {
      Ok(sqlx_err) => AppError::Sqlx(sqlx_err),
      Err(err) => AppError::Internal(err.to_string()),
    }
  }
}

fn storefront_status(err: &StorefrontError) -> StatusCode {
  match err {
    StorefrontError::Validation(_)
    | StorefrontError::InvalidTransition { .. }
    | StorefrontError::NotClaimable { .. }
    | StorefrontError::NotDisputed(_) => StatusCode::BAD_REQUEST,
    StorefrontError::NotFound { .. } => StatusCode::NOT_FOUND,
    StorefrontError::Forbidden(_) => StatusCode::FORBIDDEN,
    StorefrontError::Conflict(_) | StorefrontError::AlreadyClaimed(_) => StatusCode::CONFLICT,
    StorefrontError::Blob(_) | StorefrontError::Backend { .. } => StatusCode::INTERNAL_SERVER_ERROR,
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::Auth(_) => StatusCode::UNAUTHORIZED,
      AppError::Redirect(_) => StatusCode::SEE_OTHER,
      AppError::Storefront(err) => storefront_status(err),
      AppError::PipelineHalted(_) => StatusCode::CONFLICT,
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Workflow { .. } | AppError::Internal(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, status = status.as_u16(), "Responding with error");
    }

    match self {
      AppError::Redirect(path) => HttpResponse::SeeOther()
        .insert_header((header::LOCATION, path.as_str()))
        .json(json!({ "redirectTo": path })),
      AppError::Storefront(err) if !err.is_user_facing() => {
        HttpResponse::build(status).json(json!({"error": "Storage operation failed"}))
      }
      AppError::Sqlx(_) => HttpResponse::build(status).json(json!({"error": "Database operation failed"})),
      AppError::Workflow { source } => {
        tracing::error!(workflow_error_source = ?source, "Workflow error details");
        HttpResponse::build(status).json(json!({"error": "Workflow processing error", "detail": source.to_string()}))
      }
      AppError::Config(m) => HttpResponse::build(status).json(json!({"error": "Configuration issue", "detail": m})),
      AppError::Internal(_) => HttpResponse::build(status).json(json!({"error": "An internal error occurred"})),
      other => HttpResponse::build(status).json(json!({"error": other.to_string()})),
    }
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
