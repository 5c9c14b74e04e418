// storefront_server/src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use storefront::models::Role;
use storefront::{ContextData, PipelineResult};
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::pipelines::contexts::{SigninCtxData, SignupCtxData};
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

// --- Request DTOs ---

#[derive(Deserialize)]
pub struct SignupRequestPayload {
  pub email: String,
  pub password: String,
  /// `buyer` or `seller`.
  #[serde(rename = "type", alias = "role", default = "default_role")]
  pub role: Role,
}

fn default_role() -> Role {
  Role::Buyer
}

#[derive(Deserialize)]
pub struct SigninRequestPayload {
  pub email: String,
  pub password: String,
}

// --- Handler Implementations ---

#[instrument(
  name = "handler::signup",
  skip(app_state, req_payload),
  fields(req_email = %req_payload.email, role = %req_payload.role)
)]
pub async fn signup_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<SignupRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let SignupRequestPayload { email, password, role } = req_payload.into_inner();
  info!("Signup attempt for email: {}", email);

  let ctx = ContextData::new(SignupCtxData {
    app_state: app_state.get_ref().clone(),
    email,
    password,
    role,
    created_user: None,
    session_token: None,
  });

  match app_state.pipelines.signup.run(ctx.clone()).await? {
    PipelineResult::Completed => {
      let guard = ctx.read();
      let (Some(user), Some(token)) = (guard.created_user.clone(), guard.session_token.clone()) else {
        warn!("Signup pipeline completed without a user or session.");
        return Err(AppError::Internal("Signup completed without creating a session.".to_string()));
      };
      info!(user_id = %user.id, "Signup successful.");
      Ok(HttpResponse::Created().json(json!({
        "message": "User created successfully.",
        "user": user,
        "token": token,
        "redirectTo": user.role.home(),
      })))
    }
    PipelineResult::Stopped => Err(AppError::PipelineHalted("signup".to_string())),
  }
}

#[instrument(name = "handler::signin", skip(app_state, req_payload), fields(req_email = %req_payload.email))]
pub async fn signin_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<SigninRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let SigninRequestPayload { email, password } = req_payload.into_inner();

  let ctx = ContextData::new(SigninCtxData {
    app_state: app_state.get_ref().clone(),
    email,
    password,
    credential: None,
    user: None,
    session_token: None,
  });

  match app_state.pipelines.signin.run(ctx.clone()).await? {
    PipelineResult::Completed => {
      let guard = ctx.read();
      let (Some(user), Some(token)) = (guard.user.clone(), guard.session_token.clone()) else {
        warn!("Signin pipeline completed without a user or session.");
        return Err(AppError::Auth("Signin completed without user identification.".to_string()));
      };
      Ok(HttpResponse::Ok().json(json!({
        "message": "Signed in.",
        "user": user,
        "token": token,
        "redirectTo": user.role.home(),
      })))
    }
    PipelineResult::Stopped => Err(AppError::PipelineHalted("signin".to_string())),
  }
}

#[instrument(name = "handler::signout", skip_all, fields(user_id = %auth_user.user.id))]
pub async fn signout_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  app_state.sessions.close(&auth_user.token);
  info!("Signed out; session cart dropped.");
  Ok(HttpResponse::Ok().json(json!({ "message": "Signed out.", "redirectTo": "/" })))
}

/// Session restore. The role comes from the user record, not the session.
#[instrument(name = "handler::me", skip_all, fields(user_id = %auth_user.user.id))]
pub async fn me_handler(auth_user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
  let user = auth_user.user;
  Ok(HttpResponse::Ok().json(json!({
    "user": user,
    "redirectTo": user.role.home(),
  })))
}
