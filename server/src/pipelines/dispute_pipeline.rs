// storefront_server/src/pipelines/dispute_pipeline.rs

use chrono::Utc;
use storefront::dispute::{check_notes, resolve_dispute};
use storefront::{ContextData, Pipeline, PipelineControl};
use tracing::info;

use crate::errors::AppError;
use crate::pipelines::common_steps::{self, loaded_order};
use crate::pipelines::contexts::DisputeCtxData;

/// Admin resolution of a disputed order.
pub fn build_dispute_pipeline() -> Result<Pipeline<DisputeCtxData, AppError>, AppError> {
  let mut p = Pipeline::<DisputeCtxData, AppError>::new(&[
    ("check_notes", false, None),
    ("load_order", false, None),
    ("resolve_dispute", false, None),
    ("persist_order", false, None),
  ]);

  p.on("check_notes", |ctx_data: ContextData<DisputeCtxData>| async move {
    check_notes(&ctx_data.read().action.notes)?;
    Ok::<_, AppError>(PipelineControl::Continue)
  })?;

  p.on("load_order", common_steps::load_order::<_>)?;

  p.on("resolve_dispute", |ctx_data: ContextData<DisputeCtxData>| async move {
    let mut order = loaded_order(&ctx_data)?;
    let resolution = ctx_data.read().action.clone();
    resolve_dispute(&mut order, resolution.outcome, &resolution.notes, Utc::now())?;
    ctx_data.write().order = Some(order);
    Ok::<_, AppError>(PipelineControl::Continue)
  })?;

  p.on("persist_order", common_steps::persist_order::<_>)?;

  p.after("persist_order", |ctx_data: ContextData<DisputeCtxData>| async move {
    let admin_id = ctx_data.read().actor_id;
    let order = loaded_order(&ctx_data)?;
    info!(
      order_id = %order.id,
      %admin_id,
      outcome = ?order.dispute_resolution,
      "Dispute resolved."
    );
    Ok::<_, AppError>(PipelineControl::Continue)
  })?;

  Ok(p)
}
