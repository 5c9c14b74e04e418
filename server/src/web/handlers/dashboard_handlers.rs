// storefront_server/src/web/handlers/dashboard_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use storefront::{BuyerSummary, Route, SellerSummary};
use tracing::instrument;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[instrument(name = "handler::seller_dashboard", skip_all, fields(user_id = %auth_user.user.id))]
pub async fn seller_dashboard_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  auth_user.gate(Route::SellerDashboard)?;
  let catalog = &app_state.catalog;
  let owner_id = auth_user.user.id;
  let summary = SellerSummary::compute(owner_id, &catalog.stores(), &catalog.products(), &catalog.orders());
  Ok(HttpResponse::Ok().json(json!({
    "summary": summary,
    "stores": catalog.stores_owned_by(owner_id),
    "recentOrders": catalog.orders_for_owner(owner_id).into_iter().take(5).collect::<Vec<_>>(),
  })))
}

#[instrument(name = "handler::buyer_dashboard", skip_all, fields(user_id = %auth_user.user.id))]
pub async fn buyer_dashboard_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  auth_user.gate(Route::BuyerDashboard)?;
  let orders = app_state.catalog.orders_for_customer(auth_user.user.id);
  let summary = BuyerSummary::compute(orders.iter());
  Ok(HttpResponse::Ok().json(json!({
    "summary": summary,
    "recentOrders": orders.into_iter().take(5).collect::<Vec<_>>(),
  })))
}
