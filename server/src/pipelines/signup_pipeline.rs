// storefront_server/src/pipelines/signup_pipeline.rs

use storefront::models::Role;
use storefront::{ContextData, Pipeline, PipelineControl, StorefrontError};
use tracing::{event, info, warn, Level};

use crate::errors::AppError;
use crate::pipelines::contexts::SignupCtxData;
use crate::services::auth_service;

pub const MIN_PASSWORD_LEN: usize = 6;

pub fn build_signup_pipeline() -> Result<Pipeline<SignupCtxData, AppError>, AppError> {
  let mut signup_p = Pipeline::<SignupCtxData, AppError>::new(&[
    ("validate_signup_input", false, None),
    ("check_existing_user_signup", false, None),
    ("create_account_signup", false, None),
    ("open_session_signup", false, None),
  ]);

  signup_p.on("validate_signup_input", |ctx_data: ContextData<SignupCtxData>| async move {
    let (email_val, password_len_val, role) = {
      let guard = ctx_data.read();
      (guard.email.trim().to_string(), guard.password.len(), guard.role)
    };

    event!(Level::DEBUG, email = %email_val, %role, "Validating signup input.");
    if email_val.is_empty() || !email_val.contains('@') {
      warn!("Invalid email format provided for signup.");
      return Err(AppError::Validation("A valid email is required.".to_string()));
    }
    if password_len_val < MIN_PASSWORD_LEN {
      warn!("Password too short for signup ({} chars).", password_len_val);
      return Err(AppError::Validation(format!(
        "Password must be at least {} characters long.",
        MIN_PASSWORD_LEN
      )));
    }
    if role == Role::Admin {
      warn!(email = %email_val, "Rejected self-assigned admin role.");
      return Err(AppError::from(StorefrontError::Forbidden(
        "admin accounts cannot be created by sign-up".to_string(),
      )));
    }
    Ok(PipelineControl::Continue)
  })?;

  signup_p.on("check_existing_user_signup", |ctx_data: ContextData<SignupCtxData>| async move {
    let (email_val, catalog) = {
      let guard = ctx_data.read();
      (guard.email.trim().to_string(), guard.app_state.catalog.clone())
    };

    if catalog.user_by_email(&email_val).is_some() {
      warn!("Attempt to signup with existing email: {}", email_val);
      return Err(AppError::from(StorefrontError::Conflict(
        "An account with this email already exists.".to_string(),
      )));
    }
    Ok(PipelineControl::Continue)
  })?;

  signup_p.on("create_account_signup", |ctx_data: ContextData<SignupCtxData>| async move {
    let (email_val, password_val, role, catalog) = {
      let guard = ctx_data.read();
      (
        guard.email.clone(),
        guard.password.clone(),
        guard.role,
        guard.app_state.catalog.clone(),
      )
    };

    let user = auth_service::create_account(&catalog, &email_val, &password_val, role).await?;
    info!("User created successfully: ID={}, Email={}", user.id, user.email);
    ctx_data.write().created_user = Some(user);
    Ok::<_, AppError>(PipelineControl::Continue)
  })?;

  signup_p.on("open_session_signup", |ctx_data: ContextData<SignupCtxData>| async move {
    let (user_id, sessions) = {
      let guard = ctx_data.read();
      (guard.created_user.as_ref().map(|u| u.id), guard.app_state.sessions.clone())
    };
    let user_id =
      user_id.ok_or_else(|| AppError::Internal("Signup reached session step without a user.".to_string()))?;
    let token = sessions.open(user_id);
    ctx_data.write().session_token = Some(token);
    Ok::<_, AppError>(PipelineControl::Continue)
  })?;

  Ok(signup_p)
}
