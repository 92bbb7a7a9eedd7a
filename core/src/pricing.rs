// core/src/pricing.rs

//! TLD pricing reference data.

use crate::error::CoreError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Price applied to a TLD with no catalog entry.
pub fn fallback_price() -> Decimal {
  Decimal::new(1499, 2) // 14.99
}

/// One TLD's registration, renewal and transfer prices.
///
/// Invariant: `tld` begins with `.` and is stored lowercased.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingEntry {
  pub tld: String,
  pub price: Decimal,
  pub renewal_price: Decimal,
  pub transfer_price: Decimal,
  pub duration: String,
}

impl PricingEntry {
  pub fn new(
    tld: &str,
    price: Decimal,
    renewal_price: Decimal,
    transfer_price: Decimal,
    duration: &str,
  ) -> Result<Self, CoreError> {
    let tld = tld.trim().to_ascii_lowercase();
    if !tld.starts_with('.') || tld.len() < 2 {
      return Err(CoreError::Validation(format!(
        "TLD must begin with '.': '{}'",
        tld
      )));
    }
    Ok(Self {
      tld,
      price,
      renewal_price,
      transfer_price,
      duration: duration.to_string(),
    })
  }
}

/// Immutable, in-memory view of the pricing reference data.
///
/// Lookups are case-insensitive. Fetching the catalog twice with no
/// intervening mutation yields identical entry lists; all accessors are
/// pure.
#[derive(Debug, Clone, Default)]
pub struct PricingCatalog {
  entries: Vec<PricingEntry>,
}

impl PricingCatalog {
  pub fn new(entries: Vec<PricingEntry>) -> Self {
    Self { entries }
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn entries(&self) -> &[PricingEntry] {
    &self.entries
  }

  /// TLDs in catalog order.
  pub fn tlds(&self) -> Vec<String> {
    self.entries.iter().map(|e| e.tld.clone()).collect()
  }

  pub fn entry_for(&self, tld: &str) -> Option<&PricingEntry> {
    let wanted = tld.to_ascii_lowercase();
    self.entries.iter().find(|e| e.tld == wanted)
  }

  pub fn price_for(&self, tld: &str) -> Option<Decimal> {
    self.entry_for(tld).map(|e| e.price)
  }

  pub fn renewal_price_for(&self, tld: &str) -> Option<Decimal> {
    self.entry_for(tld).map(|e| e.renewal_price)
  }
}
