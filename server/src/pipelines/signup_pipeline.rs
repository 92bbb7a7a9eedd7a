// server/src/pipelines/signup_pipeline.rs

use crate::errors::{is_unique_violation, AppError};
use crate::pipelines::contexts::SignupCtxData;
use crate::services::auth_service;
use astaan::{Flow, FlowContext, FlowControl};
use tracing::{event, warn, Level};
use uuid::Uuid;

/// Builds the user registration flow.
pub fn build_signup_flow() -> Flow<SignupCtxData, AppError> {
  let mut signup_f = Flow::<SignupCtxData, AppError>::new(&[
    ("validate_signup_input", false, None),
    ("create_user_account", false, None),
    ("issue_session_token_signup", false, None),
  ]);

  // Step 1: Validate input
  signup_f.on("validate_signup_input", |ctx_data: FlowContext<SignupCtxData>| async move {
    let (fullname, email, password, phone) = {
      let guard = ctx_data.read();
      (
        guard.input.fullname.clone(),
        guard.input.email.clone(),
        guard.input.password.clone(),
        guard.input.phone.clone(),
      )
    }; // guard dropped

    event!(Level::DEBUG, email = %email, "Validating signup input.");
    if fullname.trim().is_empty() {
      return Err(AppError::Validation("Full name is required.".to_string()));
    }
    if email.is_empty() || !email.contains('@') {
      warn!("Invalid email format provided for signup.");
      return Err(AppError::Validation("Valid email is required.".to_string()));
    }
    if password.len() < 6 {
      return Err(AppError::Validation(
        "Password must be at least 6 characters.".to_string(),
      ));
    }
    if phone.trim().is_empty() {
      return Err(AppError::Validation("Phone number is required.".to_string()));
    }

    // Emails are stored lowercased; uniqueness is enforced by the store.
    ctx_data.write().input.email = email.to_ascii_lowercase();
    Ok(FlowControl::Continue)
  });

  // Step 2: Create the user record
  signup_f.on("create_user_account", |ctx_data: FlowContext<SignupCtxData>| async move {
    let (input, db_pool) = {
      let guard = ctx_data.read();
      (guard.input.clone(), guard.app_state.db_pool.clone())
    }; // guard dropped

    let password_hash = auth_service::hash_password(&input.password)?;

    let role_id: Uuid = sqlx::query_scalar("SELECT id FROM roles WHERE name = 'user'")
      .fetch_one(&db_pool)
      .await
      .map_err(AppError::Sqlx)?;

    let insert_result = sqlx::query_scalar::<_, Uuid>(
      "INSERT INTO users \
         (fullname, email, password_hash, phone, company_name, address, city, country, role_id) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
       RETURNING id",
    )
    .bind(&input.fullname)
    .bind(&input.email)
    .bind(&password_hash)
    .bind(&input.phone)
    .bind(&input.company_name)
    .bind(&input.address)
    .bind(&input.city)
    .bind(&input.country)
    .bind(role_id)
    .fetch_one(&db_pool)
    .await;

    match insert_result {
      Ok(user_id) => {
        event!(Level::INFO, user_id = %user_id, "User account created.");
        ctx_data.write().created_user_id = Some(user_id);
        Ok(FlowControl::Continue)
      }
      Err(sqlx_error) if is_unique_violation(&sqlx_error) => {
        warn!(email = %input.email, "Signup rejected: email already registered.");
        Err(AppError::Validation(
          "An account with this email already exists.".to_string(),
        ))
      }
      Err(sqlx_error) => {
        event!(Level::ERROR, error = %sqlx_error, "Database error while creating user.");
        Err(AppError::Sqlx(sqlx_error))
      }
    }
  });

  // Step 3: Issue session token
  signup_f.on(
    "issue_session_token_signup",
    |ctx_data: FlowContext<SignupCtxData>| async move {
      let (user_id, jwt_secret) = {
        let guard = ctx_data.read();
        let user_id = guard.created_user_id.ok_or_else(|| {
          AppError::Internal("User id unexpectedly missing after account creation.".to_string())
        })?;
        (user_id, guard.app_state.config.jwt_secret.clone())
      }; // guard dropped

      let token = auth_service::issue_token(user_id, "user", &jwt_secret)?;
      ctx_data.write().token = Some(token);
      event!(Level::INFO, user_id = %user_id, "Session token issued for new account.");
      Ok::<_, AppError>(FlowControl::Continue)
    },
  );

  signup_f
}
