// server/src/main.rs

mod config;
mod errors;
mod models;
mod pipelines;
mod services;
mod state;
mod web;

use crate::config::AppConfig;
use crate::state::AppState;

use actix_web::{web as actix_data, App, HttpServer};
use astaan::payment::waafi::WaafiClient;
use astaan::payment::PaymentGateway;
use astaan::rdap::RdapClient;
use astaan::DomainChecker;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting Astaan back-office server...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      panic!("Configuration error: {}", e);
    }
  };

  let db_pool = match PgPool::connect(&app_config.database_url).await {
    Ok(pool) => {
      tracing::info!("Successfully connected to the database.");
      pool
    }
    Err(e) => {
      tracing::error!(error = %e, "Failed to connect to the database.");
      panic!("Database connection error: {}", e);
    }
  };

  let rdap_client = match RdapClient::new(app_config.rdap_base_url.clone()) {
    Ok(client) => Arc::new(client),
    Err(e) => {
      tracing::error!(error = %e, "Failed to build the registry client.");
      panic!("Registry client error: {}", e);
    }
  };
  let checker = Arc::new(DomainChecker::new(rdap_client));

  let gateway: Arc<dyn PaymentGateway> = match WaafiClient::new(app_config.waafi.clone()) {
    Ok(client) => Arc::new(client),
    Err(e) => {
      tracing::error!(error = %e, "Failed to build the payment gateway client.");
      panic!("Payment gateway error: {}", e);
    }
  };

  let flows = Arc::new(pipelines::build_flows());

  let app_state = AppState {
    db_pool,
    config: app_config.clone(),
    checker,
    gateway,
    flows,
  };

  // Settle stale pending transactions in the background.
  services::reconcile::spawn_reconciliation(app_state.clone());

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
