// server/src/models/hosting.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct HostingPackage {
  pub id: Uuid,
  pub name: String,
  pub description: String,
  pub price: Decimal,
  pub features: Json<Vec<String>>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
