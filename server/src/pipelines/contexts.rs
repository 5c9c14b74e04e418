// storefront_server/src/pipelines/contexts.rs

//! Data carried through each pipeline. Handlers receive these wrapped in
//! `storefront::ContextData`.

use storefront::dispute::DisputeOutcome;
use storefront::models::{Credential, Order, OrderStatus, Role, User};
use storefront::{BuyerClaim, Cart, ContactDetails, QuantityOverrides, StoreGroup};
use uuid::Uuid;

use crate::state::AppState;

#[derive(Clone)]
pub struct SignupCtxData {
  pub app_state: AppState,
  pub email: String,
  pub password: String,
  pub role: Role,
  pub created_user: Option<User>,
  pub session_token: Option<String>,
}

#[derive(Clone)]
pub struct SigninCtxData {
  pub app_state: AppState,
  pub email: String,
  pub password: String,
  pub credential: Option<Credential>,
  pub user: Option<User>,
  pub session_token: Option<String>,
}

#[derive(Clone)]
pub struct CheckoutCtxData {
  pub app_state: AppState,
  pub buyer: User,
  pub session_token: String,
  pub contact: ContactDetails,
  pub quantities: QuantityOverrides,
  pub cart: Cart,
  pub groups: Vec<StoreGroup>,
  pub placed_orders: Vec<Order>,
}

/// Shared by the three single-order flows: seller status change, buyer
/// claim and admin dispute resolution.
#[derive(Clone)]
pub struct OrderCtxData<A: Clone> {
  pub app_state: AppState,
  pub actor_id: Uuid,
  pub order_id: Uuid,
  pub action: A,
  pub order: Option<Order>,
}

impl<A: Clone> OrderCtxData<A> {
  pub fn new(app_state: AppState, actor_id: Uuid, order_id: Uuid, action: A) -> Self {
    Self {
      app_state,
      actor_id,
      order_id,
      action,
      order: None,
    }
  }
}

pub type OrderStatusCtxData = OrderCtxData<OrderStatus>;
pub type ClaimCtxData = OrderCtxData<BuyerClaim>;

#[derive(Debug, Clone)]
pub struct DisputeResolution {
  pub outcome: DisputeOutcome,
  pub notes: String,
}

pub type DisputeCtxData = OrderCtxData<DisputeResolution>;
