// storefront_server/src/web/handlers/access_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use storefront::{authorize, Route};
use tracing::{debug, instrument};

use crate::errors::AppError;
use crate::web::extractors::MaybeUser;

/// Evaluates the role gate for a client route, for the signed-in caller or
/// anonymously.
#[instrument(name = "handler::check_access", skip(caller))]
pub async fn check_access_handler(
  path: web::Path<String>,
  caller: MaybeUser,
) -> Result<HttpResponse, AppError> {
  let route: Route = path.into_inner().parse()?;
  let role = caller.0.as_ref().map(|auth| auth.user.role);
  let access = authorize(route, role);
  debug!(%route, ?role, allowed = access.is_allowed(), "Access evaluated.");
  Ok(HttpResponse::Ok().json(json!({
    "route": route.as_str(),
    "role": role,
    "result": access,
  })))
}
