// storefront_server/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use storefront::models::OrderStatus;
use storefront::{BuyerClaim, ContextData, PipelineResult, Route};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::pipelines::common_steps::loaded_order;
use crate::pipelines::contexts::{ClaimCtxData, OrderStatusCtxData};
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Deserialize)]
pub struct ClaimRequestPayload {
  pub received: bool,
}

#[derive(Deserialize)]
pub struct StatusRequestPayload {
  pub status: OrderStatus,
}

#[derive(Debug, Deserialize)]
pub struct SellerOrdersQuery {
  pub status: Option<OrderStatus>,
}

/// The buyer's own orders, newest first.
#[instrument(name = "handler::my_orders", skip_all, fields(user_id = %auth_user.user.id))]
pub async fn my_orders_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  auth_user.gate(Route::BuyerOrders)?;
  let orders = app_state.catalog.orders_for_customer(auth_user.user.id);
  Ok(HttpResponse::Ok().json(json!({ "orders": orders })))
}

#[instrument(
  name = "handler::claim_order",
  skip(app_state, auth_user, req_payload),
  fields(user_id = %auth_user.user.id, received = req_payload.received)
)]
pub async fn claim_order_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
  req_payload: web::Json<ClaimRequestPayload>,
) -> Result<HttpResponse, AppError> {
  auth_user.gate(Route::BuyerOrders)?;
  let claim = BuyerClaim::from_received(req_payload.received);
  let ctx = ContextData::new(ClaimCtxData::new(
    app_state.get_ref().clone(),
    auth_user.user.id,
    path.into_inner(),
    claim,
  ));

  match app_state.pipelines.claim.run(ctx.clone()).await? {
    PipelineResult::Completed => {
      let order = loaded_order(&ctx)?;
      let message = if claim.received() {
        "Thanks for confirming delivery."
      } else {
        "We're sorry. A dispute has been opened for this order."
      };
      Ok(HttpResponse::Ok().json(json!({ "message": message, "order": order })))
    }
    PipelineResult::Stopped => Err(AppError::PipelineHalted("claim".to_string())),
  }
}

/// Orders placed against the caller's stores, optionally filtered by status.
#[instrument(name = "handler::seller_orders", skip(app_state, auth_user), fields(user_id = %auth_user.user.id))]
pub async fn seller_orders_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  query: web::Query<SellerOrdersQuery>,
) -> Result<HttpResponse, AppError> {
  auth_user.gate(Route::SellerOrders)?;
  let mut orders = app_state.catalog.orders_for_owner(auth_user.user.id);
  if let Some(status) = query.status {
    orders.retain(|o| o.status == status);
  }
  Ok(HttpResponse::Ok().json(json!({ "orders": orders })))
}

#[instrument(
  name = "handler::update_order_status",
  skip(app_state, auth_user, req_payload),
  fields(user_id = %auth_user.user.id, status = %req_payload.status)
)]
pub async fn update_order_status_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
  req_payload: web::Json<StatusRequestPayload>,
) -> Result<HttpResponse, AppError> {
  auth_user.gate(Route::SellerOrders)?;
  let ctx = ContextData::new(OrderStatusCtxData::new(
    app_state.get_ref().clone(),
    auth_user.user.id,
    path.into_inner(),
    req_payload.status,
  ));

  match app_state.pipelines.order_status.run(ctx.clone()).await? {
    PipelineResult::Completed => {
      let order = loaded_order(&ctx)?;
      Ok(HttpResponse::Ok().json(json!({ "message": "Order status updated.", "order": order })))
    }
    PipelineResult::Stopped => {
      let order = loaded_order(&ctx)?;
      info!(order_id = %order.id, "Order already has the requested status.");
      Ok(HttpResponse::Ok().json(json!({ "message": "Order status unchanged.", "order": order })))
    }
  }
}

#[instrument(name = "handler::delete_order", skip(app_state, auth_user), fields(user_id = %auth_user.user.id))]
pub async fn delete_order_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  auth_user.gate(Route::SellerOrders)?;
  let order_id = path.into_inner();
  app_state.catalog.delete_order(auth_user.user.id, order_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "Order deleted.", "orderId": order_id })))
}
