// storefront_server/src/pipelines/common_steps.rs

//! Steps reused by the single-order pipelines.

use storefront::models::Order;
use storefront::{ContextData, PipelineControl, StorefrontError};
use tracing::debug;

use crate::errors::AppError;
use crate::pipelines::contexts::OrderCtxData;

/// Clones the order loaded by [`load_order`] out of the context.
pub fn loaded_order<A>(ctx: &ContextData<OrderCtxData<A>>) -> Result<Order, AppError>
where
  A: Clone + Send + Sync + 'static,
{
  ctx
    .read()
    .order
    .clone()
    .ok_or_else(|| AppError::Internal("order step ran before load_order".to_string()))
}

pub async fn load_order<A>(ctx: ContextData<OrderCtxData<A>>) -> Result<PipelineControl, AppError>
where
  A: Clone + Send + Sync + 'static,
{
  let (catalog, order_id) = {
    let guard = ctx.read();
    (guard.app_state.catalog.clone(), guard.order_id)
  };
  let order = catalog
    .order(order_id)
    .ok_or_else(|| StorefrontError::not_found("order", order_id))?;
  debug!(%order_id, status = %order.status, "Order loaded.");
  ctx.write().order = Some(order);
  Ok(PipelineControl::Continue)
}

/// Writes the context's order back through the catalog.
pub async fn persist_order<A>(ctx: ContextData<OrderCtxData<A>>) -> Result<PipelineControl, AppError>
where
  A: Clone + Send + Sync + 'static,
{
  let catalog = ctx.read().app_state.catalog.clone();
  let order = loaded_order(&ctx)?;
  let saved = catalog.save_order(order).await?;
  ctx.write().order = Some(saved);
  Ok(PipelineControl::Continue)
}
