// server/src/models/domain.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid;

/// Matches the `domain_status` enum in schema.sql.
///
/// The registration flow only ever moves `available` -> `registered`;
/// `transferred` and a pushed-out expiry are later transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SqlxType)]
#[sqlx(type_name = "domain_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DomainStatus {
  Available,
  Registered,
  Transferred,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
  pub id: Uuid,
  /// Fully-qualified name, unique, stored lowercased.
  pub name: String,
  pub user_id: Uuid,
  pub status: DomainStatus,
  pub registration_date: Option<DateTime<Utc>>,
  pub expiry_date: Option<DateTime<Utc>>,
  pub price: Decimal,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
