// server/src/pipelines/signin_pipeline.rs

use crate::errors::AppError;
use crate::models::RoleName;
use crate::pipelines::contexts::SigninCtxData;
use crate::services::auth_service;
use astaan::{Flow, FlowContext, FlowControl};
use tracing::{event, warn, Level};
use uuid::Uuid;

/// Builds the user sign-in flow.
pub fn build_signin_flow() -> Flow<SigninCtxData, AppError> {
  let mut signin_f = Flow::<SigninCtxData, AppError>::new(&[
    ("validate_signin_input", false, None),
    ("fetch_user_by_email_signin", false, None),
    ("verify_user_password_signin", false, None),
    ("issue_session_token_signin", false, None),
  ]);

  // Step 1: Validate input
  signin_f.on("validate_signin_input", |ctx_data: FlowContext<SigninCtxData>| async move {
    let (email, password_is_empty) = {
      let guard = ctx_data.read();
      (guard.email.clone(), guard.password.is_empty())
    }; // guard dropped

    event!(Level::DEBUG, email = %email, "Validating sign-in input.");
    if email.is_empty() || !email.contains('@') {
      warn!("Invalid email format provided for sign-in.");
      return Err(AppError::Validation("Valid email is required.".to_string()));
    }
    if password_is_empty {
      warn!("Empty password provided for sign-in.");
      return Err(AppError::Validation("Password is required.".to_string()));
    }

    ctx_data.write().email = email.to_ascii_lowercase();
    Ok(FlowControl::Continue)
  });

  // Step 2: Fetch user by email
  signin_f.on(
    "fetch_user_by_email_signin",
    |ctx_data: FlowContext<SigninCtxData>| async move {
      let (email, db_pool) = {
        let guard = ctx_data.read();
        (guard.email.clone(), guard.app_state.db_pool.clone())
      }; // guard dropped

      event!(Level::DEBUG, email = %email, "Fetching user by email for signin.");

      match sqlx::query_as::<_, (Uuid, String, String, RoleName)>(
        "SELECT u.id, u.fullname, u.password_hash, r.name \
         FROM users u JOIN roles r ON r.id = u.role_id \
         WHERE u.email = $1",
      )
      .bind(&email)
      .fetch_optional(&db_pool)
      .await
      {
        Ok(Some((user_id, fullname, password_hash, role))) => {
          {
            let mut guard = ctx_data.write();
            guard.user_id = Some(user_id);
            guard.fullname = Some(fullname);
            guard.role = Some(role.as_str().to_string());
            guard.temp_password_hash = Some(password_hash);
          } // guard dropped
          event!(Level::INFO, user_id = %user_id, "User found for signin.");
          Ok(FlowControl::Continue)
        }
        Ok(None) => {
          warn!("User not found for email during signin: {}", email);
          Err(AppError::Auth("Invalid email or password.".to_string()))
        }
        Err(sqlx_error) => {
          event!(Level::ERROR, error = %sqlx_error, "Database error while fetching user for signin.");
          Err(AppError::Sqlx(sqlx_error))
        }
      }
    },
  );

  // Step 3: Verify password
  signin_f.on(
    "verify_user_password_signin",
    |ctx_data: FlowContext<SigninCtxData>| async move {
      let (stored_hash_opt, password, user_id_opt) = {
        let guard = ctx_data.read();
        (guard.temp_password_hash.clone(), guard.password.clone(), guard.user_id)
      }; // guard dropped

      let stored_hash = stored_hash_opt.ok_or_else(|| {
        event!(Level::ERROR, "Password hash missing in context for verification.");
        AppError::Internal("Password hash unexpectedly missing for verification.".to_string())
      })?;

      let verified = auth_service::verify_password(&stored_hash, &password);
      {
        ctx_data.write().temp_password_hash = None;
      } // guard dropped

      match verified {
        Ok(true) => {
          event!(Level::INFO, user_id = ?user_id_opt, "Password verified for signin.");
          Ok(FlowControl::Continue)
        }
        Ok(false) => {
          warn!("Password mismatch for user_id (signin): {:?}", user_id_opt);
          Err(AppError::Auth("Invalid email or password.".to_string()))
        }
        Err(app_err) => {
          event!(Level::ERROR, error = %app_err, "Error during password verification for signin.");
          Err(app_err)
        }
      }
    },
  );

  // Step 4: Issue session token
  signin_f.on(
    "issue_session_token_signin",
    |ctx_data: FlowContext<SigninCtxData>| async move {
      let (user_id, role, jwt_secret) = {
        let guard = ctx_data.read();
        let user_id = guard.user_id.ok_or_else(|| {
          AppError::Internal("User id must be present to issue a token.".to_string())
        })?;
        let role = guard.role.clone().unwrap_or_else(|| "user".to_string());
        (user_id, role, guard.app_state.config.jwt_secret.clone())
      }; // guard dropped

      let token = auth_service::issue_token(user_id, &role, &jwt_secret)?;
      ctx_data.write().token = Some(token);
      event!(Level::INFO, user_id = %user_id, "Session token issued.");
      Ok::<_, AppError>(FlowControl::Continue)
    },
  );

  signin_f
}
