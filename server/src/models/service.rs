// server/src/models/service.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// One tier inside a service offering, stored as JSONB.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePackage {
  pub package_title: String,
  pub price: Decimal,
  pub features: Vec<String>,
}

/// An agency service offering (graphic design, digital consulting, ...).
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Service {
  pub id: Uuid,
  pub service_title: String,
  pub service_icon: String,
  pub packages: Json<Vec<ServicePackage>>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
