// server/src/models/pricing.rs

use astaan::pricing::PricingEntry;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Persisted TLD pricing row. The availability checker consumes these as
/// an `astaan::PricingCatalog`.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DomainPrice {
  pub id: Uuid,
  pub tld: String,
  pub price: Decimal,
  pub renewal_price: Decimal,
  pub transfer_price: Decimal,
  pub duration: String,
}

impl From<DomainPrice> for PricingEntry {
  fn from(row: DomainPrice) -> Self {
    PricingEntry {
      tld: row.tld,
      price: row.price,
      renewal_price: row.renewal_price,
      transfer_price: row.transfer_price,
      duration: row.duration,
    }
  }
}
