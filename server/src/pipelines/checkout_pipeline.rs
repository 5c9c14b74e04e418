// storefront_server/src/pipelines/checkout_pipeline.rs

//! Turns the session cart into one order per store.
//!
//! Orders are written in a single all-or-nothing call; the cart is only
//! cleared once that call succeeded, so a failed checkout leaves it intact.

use chrono::Utc;
use storefront::{build_orders, split_cart, ContextData, Pipeline, PipelineControl};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::pipelines::contexts::CheckoutCtxData;

pub fn build_checkout_pipeline() -> Result<Pipeline<CheckoutCtxData, AppError>, AppError> {
  let mut p = Pipeline::<CheckoutCtxData, AppError>::new(&[
    ("load_cart_checkout", false, None),
    ("validate_contact_checkout", false, None),
    ("split_by_store_checkout", false, None),
    ("place_orders_checkout", false, None),
    ("clear_cart_checkout", false, None),
  ]);

  p.on("load_cart_checkout", |ctx_data: ContextData<CheckoutCtxData>| async move {
    let (token, sessions) = {
      let guard = ctx_data.read();
      (guard.session_token.clone(), guard.app_state.sessions.clone())
    };
    let cart = sessions
      .cart(&token)
      .ok_or_else(|| AppError::Auth("Session expired. Please sign in again.".to_string()))?;
    ctx_data.write().cart = cart;
    Ok::<_, AppError>(PipelineControl::Continue)
  })?;

  p.on("validate_contact_checkout", |ctx_data: ContextData<CheckoutCtxData>| async move {
    let mut guard = ctx_data.write();
    let account_email = guard.buyer.email.clone();
    let contact = std::mem::take(&mut guard.contact).with_default_email(&account_email);
    contact.validate()?;
    guard.contact = contact;
    Ok::<_, AppError>(PipelineControl::Continue)
  })?;

  p.on("split_by_store_checkout", |ctx_data: ContextData<CheckoutCtxData>| async move {
    let catalog = ctx_data.read().app_state.catalog.clone();
    let mut guard = ctx_data.write();
    let groups = split_cart(&guard.cart, &guard.quantities, |store_id| catalog.store_name(store_id))?;
    for group in groups.iter().filter(|g| catalog.store(g.store_id).is_none()) {
      warn!(store_id = %group.store_id, "Cart references a store that no longer exists.");
    }
    guard.groups = groups;
    Ok::<_, AppError>(PipelineControl::Continue)
  })?;

  p.on("place_orders_checkout", |ctx_data: ContextData<CheckoutCtxData>| async move {
    let (orders, catalog) = {
      let guard = ctx_data.read();
      (
        build_orders(&guard.groups, guard.buyer.id, &guard.contact, Utc::now()),
        guard.app_state.catalog.clone(),
      )
    };
    let placed = catalog.place_orders(orders).await?;
    ctx_data.write().placed_orders = placed;
    Ok::<_, AppError>(PipelineControl::Continue)
  })?;

  p.on("clear_cart_checkout", |ctx_data: ContextData<CheckoutCtxData>| async move {
    let (token, sessions) = {
      let guard = ctx_data.read();
      (guard.session_token.clone(), guard.app_state.sessions.clone())
    };
    sessions.with_cart(&token, |cart| cart.clear());
    Ok::<_, AppError>(PipelineControl::Continue)
  })?;

  p.after("place_orders_checkout", |ctx_data: ContextData<CheckoutCtxData>| async move {
    let guard = ctx_data.read();
    let grand_total: i64 = guard.placed_orders.iter().map(|o| o.total).sum();
    info!(
      buyer_id = %guard.buyer.id,
      orders = guard.placed_orders.len(),
      grand_total,
      "Checkout placed orders."
    );
    Ok::<_, AppError>(PipelineControl::Continue)
  })?;

  Ok(p)
}
