// server/src/web/handlers/transaction_handlers.rs

use actix_web::{web, HttpResponse};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Transaction, TransactionKind};
use crate::services::billing::{self, ChargeArgs};
use crate::state::AppState;
use crate::web::extractors::{AdminUser, AuthenticatedUser};
use crate::web::{created_data, ok_data, ok_message};

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionPayload {
  #[serde(default = "default_kind")]
  pub kind: TransactionKind,
  pub amount: Decimal,
  pub description: String,
  pub account_no: String,
  #[serde(default)]
  pub domain_id: Option<Uuid>,
  #[serde(default)]
  pub service_id: Option<Uuid>,
  #[serde(default)]
  pub hosting_package_id: Option<Uuid>,
}

fn default_kind() -> TransactionKind {
  TransactionKind::Payment
}

/// Creates a single transaction and runs it through the gateway. The
/// ledger row settles `completed` or `failed` from the gateway's
/// response code alone.
#[instrument(
    name = "handler::create_transaction",
    skip(app_state, auth_user, req_payload),
    fields(user_id = %auth_user.user_id)
)]
pub async fn create_transaction_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  req_payload: web::Json<CreateTransactionPayload>,
) -> Result<HttpResponse, AppError> {
  let p = req_payload.into_inner();
  let outcome = billing::charge(
    &app_state.db_pool,
    &*app_state.gateway,
    ChargeArgs {
      user_id: auth_user.user_id,
      kind: p.kind,
      amount: p.amount,
      description: p.description,
      account_no: p.account_no,
      domain_id: p.domain_id,
      service_id: p.service_id,
      hosting_package_id: p.hosting_package_id,
    },
  )
  .await?;

  let transaction = sqlx::query_as::<_, Transaction>("SELECT * FROM transactions WHERE id = $1")
    .bind(outcome.transaction_id)
    .fetch_one(&app_state.db_pool)
    .await?;

  info!(transaction_id = %transaction.id, status = ?transaction.status, "Transaction created.");
  Ok(created_data(transaction))
}

#[instrument(name = "handler::list_transactions", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn list_transactions_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let transactions = if auth_user.is_admin() {
    sqlx::query_as::<_, Transaction>("SELECT * FROM transactions ORDER BY created_at DESC")
      .fetch_all(&app_state.db_pool)
      .await?
  } else {
    sqlx::query_as::<_, Transaction>(
      "SELECT * FROM transactions WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(auth_user.user_id)
    .fetch_all(&app_state.db_pool)
    .await?
  };
  Ok(ok_data(transactions))
}

#[instrument(name = "handler::get_transaction", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn get_transaction_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let transaction = sqlx::query_as::<_, Transaction>("SELECT * FROM transactions WHERE id = $1")
    .bind(path.into_inner())
    .fetch_optional(&app_state.db_pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Transaction not found.".to_string()))?;

  if transaction.user_id != auth_user.user_id && !auth_user.is_admin() {
    return Err(AppError::Forbidden(
      "You may only view your own transactions.".to_string(),
    ));
  }
  Ok(ok_data(transaction))
}

/// Explicit admin action is the only path that removes a ledger row.
#[instrument(name = "handler::delete_transaction", skip(app_state, _admin))]
pub async fn delete_transaction_handler(
  app_state: web::Data<AppState>,
  _admin: AdminUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let transaction_id = path.into_inner();
  let deleted = sqlx::query("DELETE FROM transactions WHERE id = $1")
    .bind(transaction_id)
    .execute(&app_state.db_pool)
    .await?;
  if deleted.rows_affected() == 0 {
    return Err(AppError::NotFound("Transaction not found.".to_string()));
  }
  info!(transaction_id = %transaction_id, "Transaction deleted by admin.");
  Ok(ok_message("Transaction deleted."))
}
