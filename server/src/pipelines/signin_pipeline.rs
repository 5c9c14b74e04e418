// storefront_server/src/pipelines/signin_pipeline.rs

use chrono::Utc;
use storefront::{ContextData, Pipeline, PipelineControl};
use tracing::{event, info, warn, Level};

use crate::errors::AppError;
use crate::pipelines::contexts::SigninCtxData;
use crate::services::auth_service;

const BAD_CREDENTIALS: &str = "Invalid email or password.";

pub fn build_signin_pipeline() -> Result<Pipeline<SigninCtxData, AppError>, AppError> {
  let mut signin_p = Pipeline::<SigninCtxData, AppError>::new(&[
    ("validate_signin_input", false, None),
    ("fetch_credential_signin", false, None),
    ("verify_password_signin", false, None),
    ("touch_last_active_signin", false, None),
    ("open_session_signin", false, None),
  ]);

  signin_p.on("validate_signin_input", |ctx_data: ContextData<SigninCtxData>| async move {
    let guard = ctx_data.read();
    if guard.email.trim().is_empty() || guard.password.is_empty() {
      return Err(AppError::Validation("Email and password are required.".to_string()));
    }
    Ok(PipelineControl::Continue)
  })?;

  signin_p.on("fetch_credential_signin", |ctx_data: ContextData<SigninCtxData>| async move {
    let (email_val, catalog) = {
      let guard = ctx_data.read();
      (guard.email.trim().to_string(), guard.app_state.catalog.clone())
    };

    event!(Level::DEBUG, email = %email_val, "Fetching credential for signin.");
    match catalog.credential(&email_val).await? {
      Some(credential) => {
        ctx_data.write().credential = Some(credential);
        Ok::<_, AppError>(PipelineControl::Continue)
      }
      None => {
        warn!("Signin attempt for unknown email: {}", email_val);
        Err(AppError::Auth(BAD_CREDENTIALS.to_string()))
      }
    }
  })?;

  signin_p.on("verify_password_signin", |ctx_data: ContextData<SigninCtxData>| async move {
    let (hash, password_val) = {
      let guard = ctx_data.read();
      (
        guard.credential.as_ref().map(|c| c.password_hash.clone()).unwrap_or_default(),
        guard.password.clone(),
      )
    };

    if !auth_service::verify_password(&hash, &password_val)? {
      warn!("Signin failed: password mismatch.");
      return Err(AppError::Auth(BAD_CREDENTIALS.to_string()));
    }
    Ok::<_, AppError>(PipelineControl::Continue)
  })?;

  signin_p.on("touch_last_active_signin", |ctx_data: ContextData<SigninCtxData>| async move {
    let (user_id, catalog) = {
      let guard = ctx_data.read();
      (guard.credential.as_ref().map(|c| c.user_id), guard.app_state.catalog.clone())
    };
    let user_id = user_id.ok_or_else(|| AppError::Internal("Signin reached touch step without a credential.".to_string()))?;

    let user = catalog.touch_user(user_id, Utc::now()).await?;
    info!(user_id = %user.id, role = %user.role, "User signed in.");
    ctx_data.write().user = Some(user);
    Ok::<_, AppError>(PipelineControl::Continue)
  })?;

  signin_p.on("open_session_signin", |ctx_data: ContextData<SigninCtxData>| async move {
    let (user_id, sessions) = {
      let guard = ctx_data.read();
      (guard.user.as_ref().map(|u| u.id), guard.app_state.sessions.clone())
    };
    let user_id = user_id.ok_or_else(|| AppError::Internal("Signin reached session step without a user.".to_string()))?;
    let token = sessions.open(user_id);
    ctx_data.write().session_token = Some(token);
    Ok::<_, AppError>(PipelineControl::Continue)
  })?;

  Ok(signin_p)
}
