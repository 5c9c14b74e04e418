// storefront/src/access.rs

//! Role gating for the client surface.
//!
//! Every check takes the role freshly read from the user record; nothing
//! here caches who the caller is.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::StorefrontError;
use crate::models::Role;

pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
  Home,
  Login,
  Register,
  SellerDashboard,
  BuyerDashboard,
  BuyerOrders,
  CreateStore,
  StoreView,
  StoreEdit,
  ManageProducts,
  Checkout,
  SellerOrders,
  Explore,
  Admin,
}

impl Route {
  pub const ALL: [Route; 14] = [
    Route::Home,
    Route::Login,
    Route::Register,
    Route::SellerDashboard,
    Route::BuyerDashboard,
    Route::BuyerOrders,
    Route::CreateStore,
    Route::StoreView,
    Route::StoreEdit,
    Route::ManageProducts,
    Route::Checkout,
    Route::SellerOrders,
    Route::Explore,
    Route::Admin,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      Route::Home => "home",
      Route::Login => "login",
      Route::Register => "register",
      Route::SellerDashboard => "seller-dashboard",
      Route::BuyerDashboard => "buyer-dashboard",
      Route::BuyerOrders => "buyer-orders",
      Route::CreateStore => "create-store",
      Route::StoreView => "store",
      Route::StoreEdit => "edit-store",
      Route::ManageProducts => "manage-products",
      Route::Checkout => "checkout",
      Route::SellerOrders => "orders",
      Route::Explore => "explore",
      Route::Admin => "admin",
    }
  }
}

impl fmt::Display for Route {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Route {
  type Err = StorefrontError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let wanted = s.trim().trim_start_matches('/');
    Route::ALL
      .into_iter()
      .find(|r| r.as_str() == wanted)
      .ok_or_else(|| StorefrontError::validation(format!("unknown route '{s}'")))
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "access", content = "redirectTo", rename_all = "camelCase")]
pub enum Access {
  Allow,
  Redirect(String),
}

impl Access {
  fn to(path: &str) -> Self {
    Access::Redirect(path.to_string())
  }

  pub fn is_allowed(&self) -> bool {
    matches!(self, Access::Allow)
  }
}

/// Decides whether a caller with `role` (None when signed out) may open `route`.
pub fn authorize(route: Route, role: Option<Role>) -> Access {
  use Role::*;
  match (route, role) {
    (Route::Admin, None) => Access::to(LOGIN_PATH),
    (Route::Admin, Some(Admin)) => Access::Allow,
    (Route::Admin, Some(other)) => Access::to(other.home()),

    (Route::Checkout | Route::BuyerOrders, None) => Access::to(LOGIN_PATH),
    (Route::Checkout | Route::BuyerOrders, Some(Seller)) => Access::to(Seller.home()),

    (Route::BuyerDashboard | Route::Explore, Some(Seller)) => Access::to(Seller.home()),

    (Route::SellerOrders | Route::SellerDashboard | Route::ManageProducts | Route::StoreEdit, None) => {
      Access::to(LOGIN_PATH)
    }
    (Route::SellerOrders | Route::SellerDashboard | Route::ManageProducts | Route::StoreEdit, Some(Buyer)) => {
      Access::to(Buyer.home())
    }

    (Route::CreateStore, None) => Access::to(LOGIN_PATH),
    (Route::CreateStore, Some(Buyer)) => Access::to("/explore"),

    _ => Access::Allow,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn admin_route_sends_each_non_admin_home() {
    assert_eq!(authorize(Route::Admin, None), Access::to("/login"));
    assert_eq!(authorize(Route::Admin, Some(Role::Seller)), Access::to("/seller-dashboard"));
    assert_eq!(authorize(Route::Admin, Some(Role::Buyer)), Access::to("/buyer-dashboard"));
    assert!(authorize(Route::Admin, Some(Role::Admin)).is_allowed());
  }

  #[test]
  fn checkout_is_for_signed_in_buyers() {
    assert_eq!(authorize(Route::Checkout, None), Access::to("/login"));
    assert_eq!(authorize(Route::Checkout, Some(Role::Seller)), Access::to("/seller-dashboard"));
    assert!(authorize(Route::Checkout, Some(Role::Buyer)).is_allowed());
    assert_eq!(authorize(Route::BuyerOrders, None), Access::to("/login"));
  }

  #[test]
  fn sellers_are_kept_out_of_buyer_pages() {
    assert_eq!(authorize(Route::Explore, Some(Role::Seller)), Access::to("/seller-dashboard"));
    assert_eq!(authorize(Route::BuyerDashboard, Some(Role::Seller)), Access::to("/seller-dashboard"));
    assert!(authorize(Route::Explore, None).is_allowed());
  }

  #[test]
  fn buyers_are_kept_out_of_seller_pages() {
    assert_eq!(authorize(Route::SellerOrders, Some(Role::Buyer)), Access::to("/buyer-dashboard"));
    assert_eq!(authorize(Route::ManageProducts, Some(Role::Buyer)), Access::to("/buyer-dashboard"));
    assert_eq!(authorize(Route::CreateStore, Some(Role::Buyer)), Access::to("/explore"));
    assert!(authorize(Route::CreateStore, Some(Role::Seller)).is_allowed());
  }

  #[test]
  fn public_pages_are_open() {
    for route in [Route::Home, Route::Login, Route::Register, Route::StoreView] {
      assert!(authorize(route, None).is_allowed(), "{route} should be public");
    }
  }

  #[test]
  fn routes_parse_from_path_segments() {
    for route in Route::ALL {
      assert_eq!(route.as_str().parse::<Route>().unwrap(), route);
    }
    assert_eq!("/checkout".parse::<Route>().unwrap(), Route::Checkout);
    assert!("nowhere".parse::<Route>().is_err());
  }

  #[test]
  fn redirect_serializes_with_target() {
    let json = serde_json::to_value(Access::to("/login")).unwrap();
    assert_eq!(json, serde_json::json!({ "access": "redirect", "redirectTo": "/login" }));
  }
}
