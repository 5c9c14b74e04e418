// storefront_server/src/web/handlers/checkout_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use storefront::{split_cart, CheckoutSummary, ContactDetails, ContextData, PipelineResult, QuantityOverrides, Route};
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::pipelines::contexts::CheckoutCtxData;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequestPayload {
  #[serde(default)]
  pub contact: ContactDetails,
  /// Per-product quantities edited on the review screen.
  #[serde(default)]
  pub quantities: QuantityOverrides,
}

/// Review screen: the session cart grouped by store, with subtotals.
#[instrument(name = "handler::review_checkout", skip_all, fields(user_id = %auth_user.user.id))]
pub async fn review_checkout_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  auth_user.gate(Route::Checkout)?;
  let cart = app_state
    .sessions
    .cart(&auth_user.token)
    .ok_or_else(|| AppError::Auth("Session expired. Please sign in again.".to_string()))?;
  let catalog = &app_state.catalog;
  let groups = split_cart(&cart, &QuantityOverrides::new(), |store_id| catalog.store_name(store_id))?;
  let summary = CheckoutSummary::from_groups(groups)?;
  Ok(HttpResponse::Ok().json(summary))
}

#[instrument(name = "handler::place_orders", skip_all, fields(user_id = %auth_user.user.id))]
pub async fn place_orders_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  req_payload: web::Json<CheckoutRequestPayload>,
) -> Result<HttpResponse, AppError> {
  auth_user.gate(Route::Checkout)?;
  let CheckoutRequestPayload { contact, quantities } = req_payload.into_inner();
  info!("Checkout attempt by user: {}", auth_user.user.id);

  let ctx = ContextData::new(CheckoutCtxData {
    app_state: app_state.get_ref().clone(),
    buyer: auth_user.user.clone(),
    session_token: auth_user.token.clone(),
    contact,
    quantities,
    cart: Default::default(),
    groups: Vec::new(),
    placed_orders: Vec::new(),
  });

  match app_state.pipelines.checkout.run(ctx.clone()).await? {
    PipelineResult::Completed => {
      let guard = ctx.read();
      let summary = CheckoutSummary::from_groups(guard.groups.clone())?;
      Ok(HttpResponse::Created().json(json!({
        "message": format!("{} order(s) placed.", guard.placed_orders.len()),
        "orders": guard.placed_orders,
        "grandTotal": summary.grand_total,
        "redirectTo": "/buyer-orders",
      })))
    }
    PipelineResult::Stopped => Err(AppError::PipelineHalted("checkout".to_string())),
  }
}
