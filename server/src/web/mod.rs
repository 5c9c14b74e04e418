// storefront_server/src/web/mod.rs

pub mod extractors;
pub mod handlers;
pub mod routes;

use actix_web::dev::ServiceResponse;
use actix_web::http::header::{self, HeaderValue};
use actix_web::http::StatusCode;
use actix_web::middleware::{ErrorHandlerResponse, ErrorHandlers};
use actix_web::web;
use serde_json::json;

use crate::errors::AppError;

pub use routes::configure_app_routes;

pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please reload.";

/// Replaces every 500 body with a generic message. The failure itself was
/// already logged by `AppError::error_response`; this logs the route.
pub fn error_handlers<B: 'static>() -> ErrorHandlers<B> {
  ErrorHandlers::new().handler(StatusCode::INTERNAL_SERVER_ERROR, generic_failure)
}

fn generic_failure<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
  let (req, res) = res.into_parts();
  tracing::error!(method = %req.method(), path = %req.path(), "Request failed with an internal error.");
  let mut res = res.set_body(json!({ "error": GENERIC_FAILURE_MESSAGE }).to_string());
  res
    .headers_mut()
    .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
  let res = ServiceResponse::new(req, res).map_into_boxed_body().map_into_right_body();
  Ok(ErrorHandlerResponse::Response(res))
}

/// Malformed JSON bodies, paths and query strings become validation errors.
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(web::JsonConfig::default().error_handler(|err, _req| AppError::Validation(err.to_string()).into()))
    .app_data(web::PathConfig::default().error_handler(|err, _req| AppError::Validation(err.to_string()).into()))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| AppError::Validation(err.to_string()).into()));
}
