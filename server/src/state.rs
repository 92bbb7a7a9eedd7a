// server/src/state.rs
use crate::config::AppConfig;
use crate::pipelines::Flows;
use astaan::payment::PaymentGateway;
use astaan::rdap::RdapClient;
use astaan::DomainChecker;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub db_pool: PgPool,
  pub config: Arc<AppConfig>,
  pub checker: Arc<DomainChecker<Arc<RdapClient>>>,
  pub gateway: Arc<dyn PaymentGateway>,
  pub flows: Arc<Flows>,
}
