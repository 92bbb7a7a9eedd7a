// server/src/web/handlers/domain_handlers.rs

use actix_web::{web, HttpResponse};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::{is_unique_violation, AppError};
use crate::models::{Domain, DomainPrice, TransactionKind, TransactionStatus};
use crate::services::billing::{self, ChargeArgs};
use crate::state::AppState;
use crate::web::extractors::{AdminUser, AuthenticatedUser};
use crate::web::{created_data, ok_data, ok_message};
use astaan::pricing::{PricingCatalog, PricingEntry};
use astaan::tld;

#[derive(Deserialize, Debug)]
pub struct CheckDomainQuery {
  pub domain: String,
  /// Comma-separated TLD list, e.g. `.com,.net`.
  #[serde(default)]
  pub tlds: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DomainPricePayload {
  pub tld: String,
  pub price: Decimal,
  pub renewal_price: Decimal,
  pub transfer_price: Decimal,
  pub duration: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DomainBillingPayload {
  pub account_no: String,
}

async fn load_catalog(app_state: &AppState) -> Result<PricingCatalog, AppError> {
  let rows = sqlx::query_as::<_, DomainPrice>("SELECT * FROM domain_prices ORDER BY tld")
    .fetch_all(&app_state.db_pool)
    .await?;
  Ok(PricingCatalog::new(rows.into_iter().map(Into::into).collect()))
}

#[instrument(
    name = "handler::check_domain",
    skip(app_state, query),
    fields(domain = %query.domain)
)]
pub async fn check_domain_handler(
  app_state: web::Data<AppState>,
  query: web::Query<CheckDomainQuery>,
) -> Result<HttpResponse, AppError> {
  // Only a failing catalog fetch aborts the check; per-TLD lookup
  // failures degrade to best-effort results inside the checker.
  let catalog = load_catalog(&app_state).await?;

  let selected: Vec<String> = query
    .tlds
    .as_deref()
    .unwrap_or_default()
    .split(',')
    .map(|t| t.trim().to_string())
    .filter(|t| !t.is_empty())
    .collect();

  let results = app_state.checker.check(&query.domain, &selected, &catalog).await;
  info!(result_count = results.len(), "Domain availability check finished.");
  Ok(ok_data(results))
}

#[instrument(name = "handler::list_domain_prices", skip(app_state))]
pub async fn list_domain_prices_handler(
  app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
  let rows = sqlx::query_as::<_, DomainPrice>("SELECT * FROM domain_prices ORDER BY tld")
    .fetch_all(&app_state.db_pool)
    .await?;
  Ok(ok_data(rows))
}

#[instrument(name = "handler::create_domain_price", skip(app_state, _admin, req_payload))]
pub async fn create_domain_price_handler(
  app_state: web::Data<AppState>,
  _admin: AdminUser,
  req_payload: web::Json<DomainPricePayload>,
) -> Result<HttpResponse, AppError> {
  let p = req_payload.into_inner();
  // Validate and normalize through the catalog entry constructor.
  let entry =
    PricingEntry::new(&p.tld, p.price, p.renewal_price, p.transfer_price, &p.duration)?;

  let row = sqlx::query_as::<_, DomainPrice>(
    "INSERT INTO domain_prices (tld, price, renewal_price, transfer_price, duration) \
     VALUES ($1, $2, $3, $4, $5) \
     RETURNING *",
  )
  .bind(&entry.tld)
  .bind(entry.price)
  .bind(entry.renewal_price)
  .bind(entry.transfer_price)
  .bind(&entry.duration)
  .fetch_one(&app_state.db_pool)
  .await
  .map_err(|e| {
    if is_unique_violation(&e) {
      AppError::Validation(format!("A price for '{}' already exists.", entry.tld))
    } else {
      AppError::Sqlx(e)
    }
  })?;

  Ok(created_data(row))
}

#[instrument(name = "handler::update_domain_price", skip(app_state, _admin, req_payload))]
pub async fn update_domain_price_handler(
  app_state: web::Data<AppState>,
  _admin: AdminUser,
  path: web::Path<Uuid>,
  req_payload: web::Json<DomainPricePayload>,
) -> Result<HttpResponse, AppError> {
  let p = req_payload.into_inner();
  let entry =
    PricingEntry::new(&p.tld, p.price, p.renewal_price, p.transfer_price, &p.duration)?;

  let row = sqlx::query_as::<_, DomainPrice>(
    "UPDATE domain_prices \
     SET tld = $2, price = $3, renewal_price = $4, transfer_price = $5, duration = $6 \
     WHERE id = $1 \
     RETURNING *",
  )
  .bind(path.into_inner())
  .bind(&entry.tld)
  .bind(entry.price)
  .bind(entry.renewal_price)
  .bind(entry.transfer_price)
  .bind(&entry.duration)
  .fetch_optional(&app_state.db_pool)
  .await?
  .ok_or_else(|| AppError::NotFound("Domain price not found.".to_string()))?;

  Ok(ok_data(row))
}

#[instrument(name = "handler::delete_domain_price", skip(app_state, _admin))]
pub async fn delete_domain_price_handler(
  app_state: web::Data<AppState>,
  _admin: AdminUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let deleted = sqlx::query("DELETE FROM domain_prices WHERE id = $1")
    .bind(path.into_inner())
    .execute(&app_state.db_pool)
    .await?;
  if deleted.rows_affected() == 0 {
    return Err(AppError::NotFound("Domain price not found.".to_string()));
  }
  Ok(ok_message("Domain price deleted."))
}

#[instrument(name = "handler::list_domains", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn list_domains_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let domains = if auth_user.is_admin() {
    sqlx::query_as::<_, Domain>("SELECT * FROM domains ORDER BY created_at DESC")
      .fetch_all(&app_state.db_pool)
      .await?
  } else {
    sqlx::query_as::<_, Domain>(
      "SELECT * FROM domains WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(auth_user.user_id)
    .fetch_all(&app_state.db_pool)
    .await?
  };
  Ok(ok_data(domains))
}

async fn fetch_owned_domain(
  app_state: &AppState,
  auth_user: &AuthenticatedUser,
  domain_id: Uuid,
) -> Result<Domain, AppError> {
  let domain = sqlx::query_as::<_, Domain>("SELECT * FROM domains WHERE id = $1")
    .bind(domain_id)
    .fetch_optional(&app_state.db_pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Domain not found.".to_string()))?;

  if domain.user_id != auth_user.user_id && !auth_user.is_admin() {
    return Err(AppError::Forbidden(
      "You do not own this domain.".to_string(),
    ));
  }
  Ok(domain)
}

fn billing_response(
  transaction_id: Uuid,
  status: TransactionStatus,
  payment_reference_id: &str,
) -> HttpResponse {
  ok_data(json!({
      "transactionId": transaction_id,
      "status": status,
      "paymentReferenceId": payment_reference_id,
  }))
}

#[instrument(
    name = "handler::renew_domain",
    skip(app_state, auth_user, req_payload),
    fields(user_id = %auth_user.user_id)
)]
pub async fn renew_domain_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
  req_payload: web::Json<DomainBillingPayload>,
) -> Result<HttpResponse, AppError> {
  let domain = fetch_owned_domain(&app_state, &auth_user, path.into_inner()).await?;

  let catalog = load_catalog(&app_state).await?;
  let amount = tld::extension(&domain.name)
    .and_then(|ext| catalog.renewal_price_for(ext))
    .unwrap_or(domain.price);

  let outcome = billing::charge(
    &app_state.db_pool,
    &*app_state.gateway,
    ChargeArgs {
      user_id: domain.user_id,
      kind: TransactionKind::Renew,
      amount,
      description: format!("Domain renewal for {}", domain.name),
      account_no: req_payload.account_no.clone(),
      domain_id: Some(domain.id),
      service_id: None,
      hosting_package_id: None,
    },
  )
  .await?;

  if outcome.status != TransactionStatus::Completed {
    return Err(AppError::Payment(outcome.message));
  }

  sqlx::query(
    "UPDATE domains \
     SET expiry_date = COALESCE(expiry_date, now()) + interval '1 year', updated_at = now() \
     WHERE id = $1",
  )
  .bind(domain.id)
  .execute(&app_state.db_pool)
  .await?;

  info!(domain = %domain.name, "Domain renewed.");
  Ok(billing_response(
    outcome.transaction_id,
    outcome.status,
    &outcome.payment_reference_id,
  ))
}

#[instrument(
    name = "handler::transfer_domain",
    skip(app_state, auth_user, req_payload),
    fields(user_id = %auth_user.user_id)
)]
pub async fn transfer_domain_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
  req_payload: web::Json<DomainBillingPayload>,
) -> Result<HttpResponse, AppError> {
  let domain = fetch_owned_domain(&app_state, &auth_user, path.into_inner()).await?;

  let catalog = load_catalog(&app_state).await?;
  let amount = tld::extension(&domain.name)
    .and_then(|ext| catalog.entry_for(ext).map(|e| e.transfer_price))
    .unwrap_or(domain.price);

  let outcome = billing::charge(
    &app_state.db_pool,
    &*app_state.gateway,
    ChargeArgs {
      user_id: domain.user_id,
      kind: TransactionKind::Transfer,
      amount,
      description: format!("Domain transfer for {}", domain.name),
      account_no: req_payload.account_no.clone(),
      domain_id: Some(domain.id),
      service_id: None,
      hosting_package_id: None,
    },
  )
  .await?;

  if outcome.status != TransactionStatus::Completed {
    return Err(AppError::Payment(outcome.message));
  }

  sqlx::query("UPDATE domains SET status = 'transferred', updated_at = now() WHERE id = $1")
    .bind(domain.id)
    .execute(&app_state.db_pool)
    .await?;

  info!(domain = %domain.name, "Domain transferred.");
  Ok(billing_response(
    outcome.transaction_id,
    outcome.status,
    &outcome.payment_reference_id,
  ))
}
