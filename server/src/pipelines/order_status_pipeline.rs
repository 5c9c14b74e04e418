// storefront_server/src/pipelines/order_status_pipeline.rs

use storefront::lifecycle::change_status;
use storefront::{ContextData, Pipeline, PipelineControl};
use tracing::info;

use crate::errors::AppError;
use crate::pipelines::common_steps::{self, loaded_order};
use crate::pipelines::contexts::OrderStatusCtxData;

/// Seller status change. Stops without writing when the order already has
/// the requested status.
pub fn build_order_status_pipeline() -> Result<Pipeline<OrderStatusCtxData, AppError>, AppError> {
  let mut p = Pipeline::<OrderStatusCtxData, AppError>::new(&[
    ("load_order", false, None),
    ("authorize_seller", false, None),
    ("apply_transition", false, None),
    ("persist_order", false, None),
  ]);

  p.on("load_order", common_steps::load_order::<_>)?;

  p.on("authorize_seller", |ctx_data: ContextData<OrderStatusCtxData>| async move {
    let (actor_id, catalog) = {
      let guard = ctx_data.read();
      (guard.actor_id, guard.app_state.catalog.clone())
    };
    let order = loaded_order(&ctx_data)?;
    catalog.ensure_store_owner(actor_id, order.store_id)?;
    Ok::<_, AppError>(PipelineControl::Continue)
  })?;

  p.on("apply_transition", |ctx_data: ContextData<OrderStatusCtxData>| async move {
    let mut order = loaded_order(&ctx_data)?;
    let (requested, policy) = {
      let guard = ctx_data.read();
      (guard.action, guard.app_state.config.transition_policy)
    };
    if order.status == requested {
      return Ok(PipelineControl::Stop);
    }
    let from = order.status;
    change_status(&mut order, requested, policy)?;
    info!(order_id = %order.id, %from, to = %requested, "Order status changed.");
    ctx_data.write().order = Some(order);
    Ok::<_, AppError>(PipelineControl::Continue)
  })?;

  p.on("persist_order", common_steps::persist_order::<_>)?;

  Ok(p)
}
