// storefront_server/src/web/extractors.rs

use actix_web::http::header;
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use storefront::models::User;
use storefront::{authorize, Access, Route};
use tracing::warn;

use crate::errors::AppError;
use crate::state::AppState;

/// The signed-in caller, resolved from `Authorization: Bearer <token>`.
///
/// `user` is read from the catalog on every request, so its role is current.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
  pub user: User,
  pub token: String,
}

impl AuthenticatedUser {
  /// Applies the role gate for `route`; a denial becomes a redirect.
  pub fn gate(&self, route: Route) -> Result<(), AppError> {
    match authorize(route, Some(self.user.role)) {
      Access::Allow => Ok(()),
      Access::Redirect(path) => {
        warn!(user_id = %self.user.id, role = %self.user.role, %route, redirect_to = %path, "Role gate denied access.");
        Err(AppError::Redirect(path))
      }
    }
  }
}

/// Like [`AuthenticatedUser`] but anonymous callers are allowed.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<AuthenticatedUser>);

fn bearer_token(req: &HttpRequest) -> Option<String> {
  let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
  let token = value.strip_prefix("Bearer ").or_else(|| value.strip_prefix("bearer "))?.trim();
  (!token.is_empty()).then(|| token.to_string())
}

fn resolve(req: &HttpRequest) -> Result<Option<AuthenticatedUser>, AppError> {
  let Some(token) = bearer_token(req) else {
    return Ok(None);
  };
  let state = req
    .app_data::<web::Data<AppState>>()
    .ok_or_else(|| AppError::Internal("AppState is not registered".to_string()))?;
  let user = state
    .sessions
    .user_id(&token)
    .and_then(|user_id| state.catalog.user(user_id))
    .ok_or_else(|| {
      warn!("Rejected unknown or expired session token.");
      AppError::Auth("Session expired. Please sign in again.".to_string())
    })?;
  Ok(Some(AuthenticatedUser { user, token }))
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    ready(resolve(req).and_then(|found| {
      found.ok_or_else(|| AppError::Auth("Sign in required. Missing bearer token.".to_string()))
    }))
  }
}

impl FromRequest for MaybeUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    // A stale token reads as signed out here rather than failing the request.
    ready(match resolve(req) {
      Err(AppError::Auth(_)) => Ok(MaybeUser(None)),
      other => other.map(MaybeUser),
    })
  }
}
