// server/src/models/transaction.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid;

/// Matches the `transaction_kind` enum in schema.sql.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "transaction_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
  Register,
  Transfer,
  Renew,
  Payment,
  ServicePayment,
  HostingPayment,
}

/// Matches the `transaction_status` enum in schema.sql.
///
/// Status is monotonic: a transaction is created `pending` and settles
/// exactly once into `completed` or `failed`. The settle update carries a
/// `WHERE status = 'pending'` guard, so terminal rows never change again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SqlxType)]
#[sqlx(type_name = "transaction_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
  Pending,
  Completed,
  Failed,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
  pub id: Uuid,
  pub domain_id: Option<Uuid>,
  pub service_id: Option<Uuid>,
  pub hosting_package_id: Option<Uuid>,
  pub user_id: Uuid,
  pub kind: TransactionKind,
  /// Always positive.
  pub amount: Decimal,
  pub status: TransactionStatus,
  pub payment_reference_id: Option<String>,
  pub payment_method: String,
  pub description: String,
  pub completed_at: Option<DateTime<Utc>>,
  pub created_at: DateTime<Utc>,
}
