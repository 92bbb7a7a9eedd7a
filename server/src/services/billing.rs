// server/src/services/billing.rs

//! The charge-and-settle sequence shared by checkout, renewal and
//! transfer.
//!
//! The pending transaction row is written before the gateway is invoked,
//! and the settle update is guarded on `status = 'pending'`, so a crash or
//! gateway timeout leaves a pending row for the reconciliation sweep
//! rather than a double-settled one.

use crate::errors::{AppError, Result};
use crate::models::{TransactionKind, TransactionStatus};
use astaan::payment::{settle, PaymentGateway, PurchaseRequest, SettledStatus};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{info, instrument, warn};
use uuid::Uuid;

pub const PAYMENT_METHOD_WAAFI: &str = "waafi";

/// One charge against one purchasable entity.
#[derive(Debug, Clone)]
pub struct ChargeArgs {
  pub user_id: Uuid,
  pub kind: TransactionKind,
  pub amount: Decimal,
  pub description: String,
  pub account_no: String,
  pub domain_id: Option<Uuid>,
  pub service_id: Option<Uuid>,
  pub hosting_package_id: Option<Uuid>,
}

/// Ledger outcome of one charge.
#[derive(Debug, Clone)]
pub struct ChargeOutcome {
  pub transaction_id: Uuid,
  pub status: TransactionStatus,
  pub payment_reference_id: String,
  pub message: String,
}

/// Creates a `pending` transaction, invokes the gateway once, and settles
/// the transaction from the gateway's response code.
///
/// A gateway transport failure propagates and leaves the transaction
/// `pending`; the reconciliation sweep settles such rows later.
#[instrument(
    name = "billing::charge",
    skip(db, gateway, args),
    fields(user_id = %args.user_id, kind = ?args.kind, amount = %args.amount),
    err(Display)
)]
pub async fn charge(
  db: &PgPool,
  gateway: &dyn PaymentGateway,
  args: ChargeArgs,
) -> Result<ChargeOutcome> {
  if args.amount <= Decimal::ZERO {
    return Err(AppError::Validation(
      "Payment amount must be positive.".to_string(),
    ));
  }

  let transaction_id: Uuid = sqlx::query_scalar(
    "INSERT INTO transactions \
       (domain_id, service_id, hosting_package_id, user_id, kind, amount, status, payment_method, description) \
     VALUES ($1, $2, $3, $4, $5, $6, 'pending', $7, $8) \
     RETURNING id",
  )
  .bind(args.domain_id)
  .bind(args.service_id)
  .bind(args.hosting_package_id)
  .bind(args.user_id)
  .bind(args.kind)
  .bind(args.amount)
  .bind(PAYMENT_METHOD_WAAFI)
  .bind(&args.description)
  .fetch_one(db)
  .await?;

  info!(transaction_id = %transaction_id, "Pending transaction recorded.");

  let response = gateway
    .purchase(&PurchaseRequest {
      transaction_id,
      account_no: args.account_no.clone(),
      amount: args.amount,
      description: args.description.clone(),
    })
    .await?;

  let settlement = settle(transaction_id, &response);
  let status = match settlement.status {
    SettledStatus::Completed => TransactionStatus::Completed,
    SettledStatus::Failed => TransactionStatus::Failed,
  };

  let updated = sqlx::query(
    "UPDATE transactions \
     SET status = $2, payment_reference_id = $3, completed_at = now() \
     WHERE id = $1 AND status = 'pending'",
  )
  .bind(transaction_id)
  .bind(status)
  .bind(&settlement.payment_reference_id)
  .execute(db)
  .await?;

  if updated.rows_affected() == 0 {
    // Already settled by a concurrent writer; the first settle wins.
    warn!(transaction_id = %transaction_id, "Transaction was no longer pending at settle time.");
  }

  info!(
    transaction_id = %transaction_id,
    status = ?status,
    reference = %settlement.payment_reference_id,
    "Transaction settled."
  );

  Ok(ChargeOutcome {
    transaction_id,
    status,
    payment_reference_id: settlement.payment_reference_id,
    message: settlement.message,
  })
}
