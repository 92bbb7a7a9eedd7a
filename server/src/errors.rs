// server/src/errors.rs

use actix_web::{HttpResponse, ResponseError};
use astaan::{CoreError, FlowError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Forbidden: {0}")]
  Forbidden(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Payment Processing Error: {0}")]
  Payment(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Flow Error: {source}")]
  Flow {
    #[from]
    source: FlowError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<CoreError> for AppError {
  fn from(err: CoreError) -> Self {
    match err {
      CoreError::Validation(m) => AppError::Validation(m),
      CoreError::Config(m) => AppError::Config(m),
      CoreError::Gateway { source } => AppError::Payment(source.to_string()),
      CoreError::Registry { domain, source } => {
        AppError::Internal(format!("Registry lookup for '{}' failed: {}", domain, source))
      }
      CoreError::Flow(fe) => AppError::Flow { source: fe },
    }
  }
}

// Allow anyhow::Error to be converted into AppError::Internal for
// convenience in handlers using `?` on anyhow results.
impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    AppError::Internal(err.to_string())
  }
}

impl AppError {
  /// The single human-readable message surfaced to the client.
  pub fn user_message(&self) -> String {
    self.to_string()
  }
}

/// True when a sqlx error is a unique-constraint violation.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
  err
    .as_database_error()
    .and_then(|db| db.code().map(|c| c == "23505"))
    .unwrap_or(false)
}

impl ResponseError for AppError {
  fn error_response(&self) -> HttpResponse {
    tracing::error!(application_error = %self, "Responding with error");
    match self {
      AppError::Validation(m) => {
        HttpResponse::BadRequest().json(json!({"success": false, "message": m}))
      }
      AppError::Auth(m) => {
        HttpResponse::Unauthorized().json(json!({"success": false, "message": m}))
      }
      AppError::Forbidden(m) => {
        HttpResponse::Forbidden().json(json!({"success": false, "message": m}))
      }
      AppError::NotFound(m) => {
        HttpResponse::NotFound().json(json!({"success": false, "message": m}))
      }
      AppError::Payment(m) => {
        HttpResponse::PaymentRequired().json(json!({"success": false, "message": m}))
      }
      AppError::Config(_) => HttpResponse::InternalServerError()
        .json(json!({"success": false, "message": "Configuration issue"})),
      // Internal shapes never leak to the client.
      AppError::Sqlx(_) => HttpResponse::InternalServerError()
        .json(json!({"success": false, "message": "Database operation failed"})),
      AppError::Flow { .. } => HttpResponse::InternalServerError()
        .json(json!({"success": false, "message": "Request processing failed"})),
      AppError::Internal(_) => HttpResponse::InternalServerError()
        .json(json!({"success": false, "message": "An internal error occurred"})),
    }
  }
}

// Define a Result type alias for the application.
pub type Result<T, E = AppError> = std::result::Result<T, E>;
