// storefront_server/src/web/handlers/admin_handlers.rs

use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use storefront::dispute::DisputeOutcome;
use storefront::models::StoreStatus;
use storefront::{AdminStats, ContextData, PipelineResult, Route};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::pipelines::common_steps::loaded_order;
use crate::pipelines::contexts::{DisputeCtxData, DisputeResolution};
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Deserialize)]
pub struct ResolveDisputeRequestPayload {
  pub resolution: DisputeOutcome,
  #[serde(default)]
  pub notes: String,
}

#[derive(Deserialize)]
pub struct StoreStatusRequestPayload {
  pub status: StoreStatus,
}

#[instrument(name = "handler::admin_stats", skip_all, fields(user_id = %auth_user.user.id))]
pub async fn admin_stats_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  auth_user.gate(Route::Admin)?;
  let catalog = &app_state.catalog;
  let stats = AdminStats::compute(&catalog.users(), &catalog.stores(), &catalog.orders(), Utc::now());
  Ok(HttpResponse::Ok().json(stats))
}

#[instrument(name = "handler::admin_users", skip_all, fields(user_id = %auth_user.user.id))]
pub async fn admin_users_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  auth_user.gate(Route::Admin)?;
  let mut users = app_state.catalog.users();
  users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
  Ok(HttpResponse::Ok().json(json!({ "users": users })))
}

/// Open disputes: cancelled orders the buyer reported as not received and
/// no admin has resolved yet.
#[instrument(name = "handler::admin_disputes", skip_all, fields(user_id = %auth_user.user.id))]
pub async fn admin_disputes_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  auth_user.gate(Route::Admin)?;
  let disputes = app_state.catalog.disputed_orders();
  Ok(HttpResponse::Ok().json(json!({ "disputes": disputes })))
}

#[instrument(
  name = "handler::resolve_dispute",
  skip(app_state, auth_user, req_payload),
  fields(user_id = %auth_user.user.id, resolution = %req_payload.resolution)
)]
pub async fn resolve_dispute_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
  req_payload: web::Json<ResolveDisputeRequestPayload>,
) -> Result<HttpResponse, AppError> {
  auth_user.gate(Route::Admin)?;
  let ResolveDisputeRequestPayload { resolution, notes } = req_payload.into_inner();
  let ctx = ContextData::new(DisputeCtxData::new(
    app_state.get_ref().clone(),
    auth_user.user.id,
    path.into_inner(),
    DisputeResolution { outcome: resolution, notes },
  ));

  match app_state.pipelines.dispute.run(ctx.clone()).await? {
    PipelineResult::Completed => {
      let order = loaded_order(&ctx)?;
      Ok(HttpResponse::Ok().json(json!({ "message": "Dispute resolved.", "order": order })))
    }
    PipelineResult::Stopped => Err(AppError::PipelineHalted("dispute".to_string())),
  }
}

#[instrument(
  name = "handler::set_store_status",
  skip(app_state, auth_user, req_payload),
  fields(user_id = %auth_user.user.id, status = req_payload.status.as_str())
)]
pub async fn set_store_status_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
  req_payload: web::Json<StoreStatusRequestPayload>,
) -> Result<HttpResponse, AppError> {
  auth_user.gate(Route::Admin)?;
  let store_id = path.into_inner();
  let store = app_state.catalog.set_store_status(store_id, req_payload.status).await?;
  info!(%store_id, "Store moderated.");
  Ok(HttpResponse::Ok().json(store))
}
