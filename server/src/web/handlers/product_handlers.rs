// storefront_server/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde_json::json;
use storefront::models::{NewProduct, ProductUpdate};
use storefront::{Route, StorefrontError};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[instrument(name = "handler::get_product", skip(app_state))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let product = app_state
    .catalog
    .product(product_id)
    .ok_or_else(|| StorefrontError::not_found("product", product_id))?;
  Ok(HttpResponse::Ok().json(product))
}

#[instrument(
  name = "handler::create_product",
  skip(app_state, auth_user, req_payload),
  fields(user_id = %auth_user.user.id, store_id = %req_payload.store_id)
)]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  req_payload: web::Json<NewProduct>,
) -> Result<HttpResponse, AppError> {
  auth_user.gate(Route::ManageProducts)?;
  let product = app_state
    .catalog
    .create_product(auth_user.user.id, req_payload.into_inner(), Utc::now())
    .await?;
  info!(product_id = %product.id, "Product listed.");
  Ok(HttpResponse::Created().json(product))
}

#[instrument(name = "handler::update_product", skip(app_state, auth_user, req_payload), fields(user_id = %auth_user.user.id))]
pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
  req_payload: web::Json<ProductUpdate>,
) -> Result<HttpResponse, AppError> {
  auth_user.gate(Route::ManageProducts)?;
  let product = app_state
    .catalog
    .update_product(auth_user.user.id, path.into_inner(), req_payload.into_inner())
    .await?;
  Ok(HttpResponse::Ok().json(product))
}

#[instrument(name = "handler::delete_product", skip(app_state, auth_user), fields(user_id = %auth_user.user.id))]
pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  auth_user.gate(Route::ManageProducts)?;
  let product_id = path.into_inner();
  app_state.catalog.delete_product(auth_user.user.id, product_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "Product deleted.", "productId": product_id })))
}
