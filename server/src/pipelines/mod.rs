// storefront_server/src/pipelines/mod.rs

//! The multi-step operations behind the HTTP handlers, each a
//! `storefront::Pipeline` built once at startup and shared through `AppState`.

use std::sync::Arc;

use storefront::Pipeline;

use crate::errors::AppError;

pub mod common_steps;
pub mod contexts;

pub mod checkout_pipeline;
pub mod claim_pipeline;
pub mod dispute_pipeline;
pub mod order_status_pipeline;
pub mod signin_pipeline;
pub mod signup_pipeline;

use contexts::{CheckoutCtxData, ClaimCtxData, DisputeCtxData, OrderStatusCtxData, SigninCtxData, SignupCtxData};

pub struct Pipelines {
  pub signup: Arc<Pipeline<SignupCtxData, AppError>>,
  pub signin: Arc<Pipeline<SigninCtxData, AppError>>,
  pub checkout: Arc<Pipeline<CheckoutCtxData, AppError>>,
  pub order_status: Arc<Pipeline<OrderStatusCtxData, AppError>>,
  pub claim: Arc<Pipeline<ClaimCtxData, AppError>>,
  pub dispute: Arc<Pipeline<DisputeCtxData, AppError>>,
}

impl Pipelines {
  pub fn build() -> Result<Self, AppError> {
    tracing::info!("Building application pipelines...");
    let pipelines = Self {
      signup: Arc::new(signup_pipeline::build_signup_pipeline()?),
      signin: Arc::new(signin_pipeline::build_signin_pipeline()?),
      checkout: Arc::new(checkout_pipeline::build_checkout_pipeline()?),
      order_status: Arc::new(order_status_pipeline::build_order_status_pipeline()?),
      claim: Arc::new(claim_pipeline::build_claim_pipeline()?),
      dispute: Arc::new(dispute_pipeline::build_dispute_pipeline()?),
    };
    tracing::info!("All application pipelines built.");
    Ok(pipelines)
  }
}
