// server/src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::models::User;
use crate::pipelines::contexts::{SigninCtxData, SignupCtxData, SignupInput};
use crate::state::AppState;
use crate::web::{created_data, ok_data};
use astaan::{FlowContext, FlowOutcome};

#[derive(Deserialize, Debug)]
pub struct SigninRequestPayload {
  pub email: String,
  pub password: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfilePayload {
  pub fullname: Option<String>,
  pub phone: Option<String>,
  pub company_name: Option<String>,
  pub address: Option<String>,
  pub city: Option<String>,
  pub country: Option<String>,
}

#[instrument(
    name = "handler::signup",
    skip(app_state, req_payload),
    fields(req_email = %req_payload.email)
)]
pub async fn signup_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<SignupInput>,
) -> Result<HttpResponse, AppError> {
  info!("Signup attempt for email: {}", req_payload.email);

  let input = req_payload.into_inner();
  let email = input.email.to_ascii_lowercase();
  let signup_ctx = FlowContext::new(SignupCtxData {
    app_state: app_state.get_ref().clone(),
    input,
    created_user_id: None,
    token: None,
  });

  match app_state.flows.signup.run(signup_ctx.clone()).await {
    Ok(FlowOutcome::Completed) => {
      let final_ctx_guard = signup_ctx.read();
      let user_id = final_ctx_guard.created_user_id.ok_or_else(|| {
        warn!("Signup flow completed but user_id was not set in context.");
        AppError::Internal("Signup completed without creating a user ID.".to_string())
      })?;
      let token = final_ctx_guard.token.clone().ok_or_else(|| {
        AppError::Internal("Signup completed without a session token.".to_string())
      })?;

      info!("Signup successful for email: {}. User ID: {}", email, user_id);
      Ok(created_data(json!({
          "userId": user_id,
          "email": email,
          "token": token,
      })))
    }
    Ok(FlowOutcome::Stopped) => {
      warn!("Signup flow for email {} was stopped by a handler.", email);
      Err(AppError::Internal(
        "Signup process was halted by an internal step.".to_string(),
      ))
    }
    Err(app_err) => {
      warn!("Signup flow failed for email {}: {:?}", email, app_err);
      Err(app_err)
    }
  }
}

#[instrument(
    name = "handler::login",
    skip(app_state, req_payload),
    fields(req_email = %req_payload.email)
)]
pub async fn login_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<SigninRequestPayload>,
) -> Result<HttpResponse, AppError> {
  info!("Signin attempt for email: {}", req_payload.email);

  let signin_ctx = FlowContext::new(SigninCtxData {
    app_state: app_state.get_ref().clone(),
    email: req_payload.email.clone(),
    password: req_payload.password.clone(),
    temp_password_hash: None,
    user_id: None,
    fullname: None,
    role: None,
    token: None,
  });

  match app_state.flows.signin.run(signin_ctx.clone()).await {
    Ok(FlowOutcome::Completed) => {
      let final_ctx_guard = signin_ctx.read();
      let user_id = final_ctx_guard.user_id.ok_or_else(|| {
        warn!("Signin flow completed but user_id was not set.");
        AppError::Auth("Signin completed without user identification.".to_string())
      })?;
      let token = final_ctx_guard.token.clone().ok_or_else(|| {
        warn!("Signin flow completed but session token was not generated.");
        AppError::Auth("Signin completed without session token generation.".to_string())
      })?;

      info!("Signin successful for email: {}. User ID: {}", req_payload.email, user_id);
      Ok(ok_data(json!({
          "userId": user_id,
          "email": final_ctx_guard.email.clone(),
          "fullname": final_ctx_guard.fullname.clone(),
          "role": final_ctx_guard.role.clone(),
          "token": token,
      })))
    }
    Ok(FlowOutcome::Stopped) => {
      warn!("Signin flow for email {} was stopped by a handler.", req_payload.email);
      Err(AppError::Auth(
        "Authentication process was unexpectedly halted.".to_string(),
      ))
    }
    Err(app_err) => {
      warn!("Signin flow failed for email {}: {:?}", req_payload.email, app_err);
      Err(app_err)
    }
  }
}

#[instrument(name = "handler::me", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn me_handler(
  app_state: web::Data<AppState>,
  auth_user: crate::web::extractors::AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
    .bind(auth_user.user_id)
    .fetch_optional(&app_state.db_pool)
    .await?
    .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;

  Ok(ok_data(user))
}

#[instrument(
    name = "handler::update_profile",
    skip(app_state, auth_user, req_payload),
    fields(user_id = %auth_user.user_id)
)]
pub async fn update_profile_handler(
  app_state: web::Data<AppState>,
  auth_user: crate::web::extractors::AuthenticatedUser,
  req_payload: web::Json<UpdateProfilePayload>,
) -> Result<HttpResponse, AppError> {
  let p = req_payload.into_inner();
  let user = sqlx::query_as::<_, User>(
    "UPDATE users SET \
       fullname = COALESCE($2, fullname), \
       phone = COALESCE($3, phone), \
       company_name = COALESCE($4, company_name), \
       address = COALESCE($5, address), \
       city = COALESCE($6, city), \
       country = COALESCE($7, country), \
       updated_at = now() \
     WHERE id = $1 \
     RETURNING *",
  )
  .bind(auth_user.user_id)
  .bind(p.fullname)
  .bind(p.phone)
  .bind(p.company_name)
  .bind(p.address)
  .bind(p.city)
  .bind(p.country)
  .fetch_optional(&app_state.db_pool)
  .await?
  .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;

  Ok(ok_data(user))
}

#[instrument(name = "handler::list_users", skip(app_state, _admin))]
pub async fn list_users_handler(
  app_state: web::Data<AppState>,
  _admin: crate::web::extractors::AdminUser,
) -> Result<HttpResponse, AppError> {
  let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC")
    .fetch_all(&app_state.db_pool)
    .await?;
  Ok(ok_data(users))
}
