// server/src/web/extractors.rs

//! Request extractors for authenticated and admin-only routes.

use crate::errors::AppError;
use crate::services::auth_service;
use crate::state::AppState;
use actix_web::http::header;
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use uuid::Uuid;

/// The bearer-token identity attached to a request.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
  pub user_id: Uuid,
  pub role: String,
}

impl AuthenticatedUser {
  pub fn is_admin(&self) -> bool {
    self.role == "admin"
  }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
  let app_state = req
    .app_data::<web::Data<AppState>>()
    .ok_or_else(|| AppError::Internal("Application state is not configured.".to_string()))?;

  let header_value = req
    .headers()
    .get(header::AUTHORIZATION)
    .and_then(|h| h.to_str().ok())
    .ok_or_else(|| AppError::Auth("Missing Authorization header.".to_string()))?;

  let token = header_value
    .strip_prefix("Bearer ")
    .ok_or_else(|| AppError::Auth("Expected a Bearer token.".to_string()))?;

  let claims = auth_service::decode_token(token, &app_state.config.jwt_secret)?;
  Ok(AuthenticatedUser {
    user_id: claims.sub,
    role: claims.role,
  })
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    ready(authenticate(req))
  }
}

/// An authenticated user holding the `admin` role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthenticatedUser);

impl FromRequest for AdminUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    ready(authenticate(req).and_then(|user| {
      if user.is_admin() {
        Ok(AdminUser(user))
      } else {
        Err(AppError::Forbidden(
          "Administrator access is required.".to_string(),
        ))
      }
    }))
  }
}
