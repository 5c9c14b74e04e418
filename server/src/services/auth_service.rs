// storefront_server/src/services/auth_service.rs

//! Password hashing and account creation for the auth endpoints.

use argon2::{
  password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
  Argon2,
};
use chrono::Utc;
use storefront::models::{Credential, Role, User};
use storefront::Catalog;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::errors::AppError;

/// Hashes a plain-text password using Argon2 with a fresh random salt.
#[instrument(name = "auth_service::hash_password", skip(password), err(Display))]
pub fn hash_password(password: &str) -> Result<String, AppError> {
  if password.is_empty() {
    error!("Password hashing failed: Password cannot be empty.");
    return Err(AppError::Validation("Password cannot be empty.".to_string()));
  }

  let salt = SaltString::generate(&mut OsRng);
  match Argon2::default().hash_password(password.as_bytes(), &salt) {
    Ok(password_hash_obj) => {
      debug!("Password hashed successfully.");
      Ok(password_hash_obj.to_string())
    }
    Err(argon_err) => {
      error!(error = %argon_err, "Argon2 password hashing failed.");
      Err(AppError::Internal(format!("Password hashing process failed: {}", argon_err)))
    }
  }
}

/// Verifies a plain-text password against a stored Argon2 hash.
///
/// A mismatch is `Ok(false)`; an unparseable stored hash is an internal error.
#[instrument(
  name = "auth_service::verify_password",
  skip(hashed_password_str, provided_password),
  err(Display),
  fields(hash_len = hashed_password_str.len())
)]
pub fn verify_password(hashed_password_str: &str, provided_password: &str) -> Result<bool, AppError> {
  if hashed_password_str.is_empty() || provided_password.is_empty() {
    return Ok(false);
  }

  let parsed_hash = PasswordHash::new(hashed_password_str).map_err(|parse_err| {
    error!(error = %parse_err, "Failed to parse stored password hash string.");
    AppError::Internal(format!("Invalid stored password hash format: {}", parse_err))
  })?;

  match Argon2::default().verify_password(provided_password.as_bytes(), &parsed_hash) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => {
      debug!("Password verification failed: Passwords do not match.");
      Ok(false)
    }
    Err(other_argon_err) => {
      error!(error = %other_argon_err, "Argon2 password verification process encountered an error.");
      Err(AppError::Internal(format!(
        "Password verification process failed: {}",
        other_argon_err
      )))
    }
  }
}

/// Creates a user record plus credential with the given role.
///
/// Role policy (no self-assigned admins) is enforced by the sign-up flow,
/// not here, so startup can use this to provision the admin account.
#[instrument(name = "auth_service::create_account", skip(catalog, password), fields(email = %email, role = %role), err(Display))]
pub async fn create_account(catalog: &Catalog, email: &str, password: &str, role: Role) -> Result<User, AppError> {
  let email = email.trim();
  let password_hash = hash_password(password)?;
  let user = User {
    id: Uuid::new_v4(),
    email: email.to_string(),
    role,
    created_at: Utc::now(),
    last_active: None,
  };
  let credential = Credential {
    user_id: user.id,
    email: email.to_string(),
    password_hash,
  };
  let user = catalog.register_user(user, credential).await?;
  info!(user_id = %user.id, "Account created.");
  Ok(user)
}

/// Provisions the configured admin account unless it already exists.
///
/// An email already held by a buyer or seller is a configuration error: that
/// account's password was self-chosen, so it is never promoted.
#[instrument(name = "auth_service::ensure_admin", skip(catalog, password), err(Display))]
pub async fn ensure_admin(catalog: &Catalog, email: &str, password: &str) -> Result<User, AppError> {
  match catalog.user_by_email(email) {
    Some(existing) if existing.role == Role::Admin => Ok(existing),
    Some(existing) => {
      error!(user_id = %existing.id, role = %existing.role, "Configured admin email belongs to a non-admin account.");
      Err(AppError::Config(format!(
        "ADMIN_EMAIL '{}' is already registered as a {} account",
        existing.email, existing.role
      )))
    }
    None => create_account(catalog, email, password, Role::Admin).await,
  }
}
