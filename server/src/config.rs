// server/src/config.rs

use crate::errors::{AppError, Result};
use astaan::payment::waafi::{WaafiConfig, DEFAULT_WAAFI_ENDPOINT};
use astaan::rdap::DEFAULT_RDAP_BASE;
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,

  pub jwt_secret: String,

  pub rdap_base_url: String,
  pub waafi: WaafiConfig,

  pub smtp_from: String,

  // Reconciliation sweep cadence and the age at which a pending
  // transaction counts as stale.
  pub reconcile_interval_secs: u64,
  pub reconcile_stale_after_secs: i64,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present.

    let get_env = |var_name: &str| {
      env::var(var_name)
        .map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL")?;

    // Secrets arrive via deployment tooling and occasionally pick up stray
    // whitespace; the gateway rejects padded credentials.
    let jwt_secret = get_env("JWT_SECRET")?.trim().to_string();
    let waafi = WaafiConfig {
      endpoint: get_env("WAAFI_ENDPOINT").unwrap_or_else(|_| DEFAULT_WAAFI_ENDPOINT.to_string()),
      merchant_uid: get_env("WAAFI_MERCHANT_UID")?.trim().to_string(),
      api_user_id: get_env("WAAFI_API_USER_ID")?.trim().to_string(),
      api_key: get_env("WAAFI_API_KEY")?.trim().to_string(),
    };

    let rdap_base_url = get_env("RDAP_BASE_URL").unwrap_or_else(|_| DEFAULT_RDAP_BASE.to_string());

    let smtp_from = get_env("SMTP_FROM").unwrap_or_else(|_| "noreply@astaan.digital".to_string());

    let reconcile_interval_secs = get_env("RECONCILE_INTERVAL_SECS")
      .unwrap_or_else(|_| "60".to_string())
      .parse::<u64>()
      .map_err(|e| AppError::Config(format!("Invalid RECONCILE_INTERVAL_SECS: {}", e)))?;
    let reconcile_stale_after_secs = get_env("RECONCILE_STALE_AFTER_SECS")
      .unwrap_or_else(|_| "900".to_string())
      .parse::<i64>()
      .map_err(|e| AppError::Config(format!("Invalid RECONCILE_STALE_AFTER_SECS: {}", e)))?;

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      database_url,
      jwt_secret,
      rdap_base_url,
      waafi,
      smtp_from,
      reconcile_interval_secs,
      reconcile_stale_after_secs,
    })
  }
}
