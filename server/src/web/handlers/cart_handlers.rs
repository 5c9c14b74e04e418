// storefront_server/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use storefront::{Cart, StorefrontError};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequestPayload {
  pub product_id: Uuid,
}

fn session_gone() -> AppError {
  AppError::Auth("Session expired. Please sign in again.".to_string())
}

fn cart_body(cart: &Cart) -> serde_json::Value {
  json!({
    "cart": cart,
    "itemCount": cart.item_count(),
    "total": cart.total(),
  })
}

#[instrument(name = "handler::view_cart", skip_all, fields(user_id = %auth_user.user.id))]
pub async fn view_cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let cart = app_state.sessions.cart(&auth_user.token).ok_or_else(session_gone)?;
  Ok(HttpResponse::Ok().json(cart_body(&cart)))
}

/// Adds one unit. Adding a product already in the cart bumps its quantity.
#[instrument(
  name = "handler::add_to_cart",
  skip(app_state, auth_user, req_payload),
  fields(user_id = %auth_user.user.id, product_id = %req_payload.product_id)
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  req_payload: web::Json<AddToCartRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let product_id = req_payload.product_id;
  let product = app_state
    .catalog
    .product(product_id)
    .ok_or_else(|| StorefrontError::not_found("product", product_id))?;

  let cart = app_state
    .sessions
    .with_cart(&auth_user.token, |cart| {
      cart.add(&product);
      cart.clone()
    })
    .ok_or_else(session_gone)?;
  info!(item_count = cart.item_count(), "Product added to cart.");
  Ok(HttpResponse::Ok().json(cart_body(&cart)))
}

#[instrument(name = "handler::remove_from_cart", skip(app_state, auth_user), fields(user_id = %auth_user.user.id))]
pub async fn remove_from_cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let (removed, cart) = app_state
    .sessions
    .with_cart(&auth_user.token, |cart| (cart.remove(product_id), cart.clone()))
    .ok_or_else(session_gone)?;
  if !removed {
    debug!(%product_id, "Remove requested for a product not in the cart.");
  }
  Ok(HttpResponse::Ok().json(cart_body(&cart)))
}
