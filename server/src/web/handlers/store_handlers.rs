// storefront_server/src/web/handlers/store_handlers.rs

use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use storefront::models::{NewStore, StoreUpdate};
use storefront::{Route, StorefrontError};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Debug, Deserialize)]
pub struct StoreSearchQuery {
  #[serde(default)]
  pub q: String,
}

/// Public store directory; `?q=` filters by name and description.
#[instrument(name = "handler::list_stores", skip(app_state))]
pub async fn list_stores_handler(
  app_state: web::Data<AppState>,
  query: web::Query<StoreSearchQuery>,
) -> Result<HttpResponse, AppError> {
  let stores = app_state.catalog.search_stores(&query.q);
  Ok(HttpResponse::Ok().json(json!({ "stores": stores })))
}

#[instrument(name = "handler::get_store", skip(app_state))]
pub async fn get_store_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let store_id = path.into_inner();
  let store = app_state
    .catalog
    .store(store_id)
    .ok_or_else(|| StorefrontError::not_found("store", store_id))?;
  Ok(HttpResponse::Ok().json(store))
}

#[instrument(name = "handler::list_store_products", skip(app_state))]
pub async fn list_store_products_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let store_id = path.into_inner();
  if app_state.catalog.store(store_id).is_none() {
    return Err(StorefrontError::not_found("store", store_id).into());
  }
  let products = app_state.catalog.products_in_store(store_id);
  Ok(HttpResponse::Ok().json(json!({ "storeId": store_id, "products": products })))
}

#[instrument(name = "handler::create_store", skip_all, fields(user_id = %auth_user.user.id))]
pub async fn create_store_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  req_payload: web::Json<NewStore>,
) -> Result<HttpResponse, AppError> {
  auth_user.gate(Route::CreateStore)?;
  let store = app_state
    .catalog
    .create_store(&auth_user.user, req_payload.into_inner(), Utc::now())
    .await?;
  info!(store_id = %store.id, "Store created via API.");
  Ok(HttpResponse::Created().json(store))
}

#[instrument(name = "handler::update_store", skip(app_state, auth_user, req_payload), fields(user_id = %auth_user.user.id))]
pub async fn update_store_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
  req_payload: web::Json<StoreUpdate>,
) -> Result<HttpResponse, AppError> {
  auth_user.gate(Route::StoreEdit)?;
  let store = app_state
    .catalog
    .update_store(auth_user.user.id, path.into_inner(), req_payload.into_inner())
    .await?;
  Ok(HttpResponse::Ok().json(store))
}

/// Deletes the store together with its products. Existing orders remain.
#[instrument(name = "handler::delete_store", skip(app_state, auth_user), fields(user_id = %auth_user.user.id))]
pub async fn delete_store_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  auth_user.gate(Route::StoreEdit)?;
  let store_id = path.into_inner();
  let products_removed = app_state.catalog.delete_store(auth_user.user.id, store_id).await?;
  Ok(HttpResponse::Ok().json(json!({
    "message": "Store deleted.",
    "storeId": store_id,
    "productsRemoved": products_removed,
  })))
}
