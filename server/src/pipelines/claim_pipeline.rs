// storefront_server/src/pipelines/claim_pipeline.rs

use chrono::Utc;
use storefront::lifecycle::{apply_claim, ensure_customer};
use storefront::{ContextData, Pipeline, PipelineControl};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::pipelines::common_steps::{self, loaded_order};
use crate::pipelines::contexts::ClaimCtxData;

/// Buyer delivery claim on a shipped order. "Not received" cancels the order
/// and opens a dispute for the admins.
pub fn build_claim_pipeline() -> Result<Pipeline<ClaimCtxData, AppError>, AppError> {
  let mut p = Pipeline::<ClaimCtxData, AppError>::new(&[
    ("load_order", false, None),
    ("authorize_buyer", false, None),
    ("record_claim", false, None),
    ("persist_order", false, None),
  ]);

  p.on("load_order", common_steps::load_order::<_>)?;

  p.on("authorize_buyer", |ctx_data: ContextData<ClaimCtxData>| async move {
    let actor_id = ctx_data.read().actor_id;
    ensure_customer(&loaded_order(&ctx_data)?, actor_id)?;
    Ok::<_, AppError>(PipelineControl::Continue)
  })?;

  p.on("record_claim", |ctx_data: ContextData<ClaimCtxData>| async move {
    let mut order = loaded_order(&ctx_data)?;
    let claim = ctx_data.read().action;
    apply_claim(&mut order, claim, Utc::now())?;
    ctx_data.write().order = Some(order);
    Ok::<_, AppError>(PipelineControl::Continue)
  })?;

  p.on("persist_order", common_steps::persist_order::<_>)?;

  p.after("persist_order", |ctx_data: ContextData<ClaimCtxData>| async move {
    let order = loaded_order(&ctx_data)?;
    if order.buyer_received == Some(false) {
      warn!(order_id = %order.id, store_id = %order.store_id, "Buyer reported non-delivery; dispute opened.");
    } else {
      info!(order_id = %order.id, "Buyer confirmed delivery.");
    }
    Ok::<_, AppError>(PipelineControl::Continue)
  })?;

  Ok(p)
}
