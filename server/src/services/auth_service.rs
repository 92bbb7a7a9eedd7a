// server/src/services/auth_service.rs

//! Password hashing/verification and JWT session tokens.

use crate::errors::AppError;
use argon2::{
  password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
  },
  Argon2,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};
use uuid::Uuid;

/// Session token lifetime.
const TOKEN_TTL_SECS: i64 = 60 * 60 * 24;

/// Hashes a plain-text password using Argon2 with a random salt.
#[instrument(name = "auth_service::hash_password", skip(password), err(Display))]
pub fn hash_password(password: &str) -> Result<String, AppError> {
  if password.is_empty() {
    return Err(AppError::Validation(
      "Password cannot be empty.".to_string(),
    ));
  }

  let salt = SaltString::generate(&mut OsRng);
  let argon2_hasher = Argon2::default();

  match argon2_hasher.hash_password(password.as_bytes(), &salt) {
    Ok(password_hash_obj) => Ok(password_hash_obj.to_string()),
    Err(argon_err) => {
      error!(error = %argon_err, "Argon2 password hashing failed.");
      Err(AppError::Internal(format!(
        "Password hashing process failed: {}",
        argon_err
      )))
    }
  }
}

/// Verifies a plain-text password against a stored Argon2 hash.
///
/// Returns `Ok(false)` on a mismatch; errors are reserved for malformed
/// stored hashes or internal Argon2 failures.
#[instrument(name = "auth_service::verify_password", skip_all, err(Display))]
pub fn verify_password(hashed_password_str: &str, provided_password: &str) -> Result<bool, AppError> {
  if hashed_password_str.is_empty() || provided_password.is_empty() {
    return Err(AppError::Auth("Invalid credentials.".to_string()));
  }

  let parsed_hash = PasswordHash::new(hashed_password_str).map_err(|parse_err| {
    error!(error = %parse_err, "Failed to parse stored password hash string.");
    AppError::Internal(format!("Invalid stored password hash format: {}", parse_err))
  })?;

  let argon2_verifier = Argon2::default();
  match argon2_verifier.verify_password(provided_password.as_bytes(), &parsed_hash) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => {
      debug!("Password verification failed: passwords do not match.");
      Ok(false)
    }
    Err(other_argon_err) => {
      error!(error = %other_argon_err, "Argon2 verification error.");
      Err(AppError::Internal(format!(
        "Password verification process failed: {}",
        other_argon_err
      )))
    }
  }
}

/// JWT claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
  pub sub: Uuid,
  pub role: String,
  pub exp: i64,
}

/// Issues a signed session token for a user.
#[instrument(name = "auth_service::issue_token", skip(secret), fields(user_id = %user_id))]
pub fn issue_token(user_id: Uuid, role: &str, secret: &str) -> Result<String, AppError> {
  let claims = Claims {
    sub: user_id,
    role: role.to_string(),
    exp: (chrono::Utc::now().timestamp()) + TOKEN_TTL_SECS,
  };
  encode(
    &Header::default(),
    &claims,
    &EncodingKey::from_secret(secret.as_bytes()),
  )
  .map_err(|e| AppError::Internal(format!("Failed to sign session token: {}", e)))
}

/// Decodes and validates a session token.
#[instrument(name = "auth_service::decode_token", skip_all, err(Display))]
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, AppError> {
  decode::<Claims>(
    token,
    &DecodingKey::from_secret(secret.as_bytes()),
    &Validation::default(),
  )
  .map(|data| data.claims)
  .map_err(|_| AppError::Auth("Invalid or expired session token.".to_string()))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hash_then_verify_round_trip() {
    let hash = hash_password("hunter2secret").unwrap();
    assert!(verify_password(&hash, "hunter2secret").unwrap());
    assert!(!verify_password(&hash, "wrong-password").unwrap());
  }

  #[test]
  fn empty_password_is_rejected() {
    assert!(hash_password("").is_err());
  }

  #[test]
  fn token_round_trip_preserves_claims() {
    let user_id = Uuid::new_v4();
    let token = issue_token(user_id, "admin", "test-secret").unwrap();
    let claims = decode_token(&token, "test-secret").unwrap();
    assert_eq!(claims.sub, user_id);
    assert_eq!(claims.role, "admin");
  }

  #[test]
  fn token_with_wrong_secret_is_rejected() {
    let token = issue_token(Uuid::new_v4(), "user", "secret-a").unwrap();
    assert!(decode_token(&token, "secret-b").is_err());
  }
}
