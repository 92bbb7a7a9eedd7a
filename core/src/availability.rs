// core/src/availability.rs

//! The batched domain availability checker.
//!
//! Candidate domains are checked against a registry in batches of
//! [`CHECK_BATCH_SIZE`], with a [`CHECK_BATCH_DELAY`] courtesy pause between
//! batches. Per-domain failures never abort a check: every TLD degrades to
//! a best-effort result, and a lookup error reads as unavailable so a taken
//! domain is never offered for sale.

use crate::error::CoreError;
use crate::pricing::{fallback_price, PricingCatalog};
use crate::tld;
use async_trait::async_trait;
use futures_util::future::join_all;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

pub const CHECK_BATCH_SIZE: usize = 3;
pub const CHECK_BATCH_DELAY: Duration = Duration::from_millis(500);

/// TLDs checked when neither the caller nor the pricing catalog supplies a
/// set.
pub const FALLBACK_TLDS: &[&str] = &[".com", ".org", ".net", ".edu"];

/// Availability of one candidate domain, as reported to the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainCheckResult {
  pub domain: String,
  pub available: bool,
  pub price: String,
  pub invalid_tld: bool,
}

/// What the registry said about one domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryAnswer {
  Available,
  Taken,
  /// The registry throttled the lookup (HTTP 429). Reported as available;
  /// the result is advisory only and registration is still re-verified by
  /// the registrar at purchase time.
  RateLimited,
}

/// A registry backend able to answer "is this exact domain registered?".
#[async_trait]
pub trait DomainAvailabilityClient: Send + Sync {
  async fn lookup(&self, domain: &str) -> Result<RegistryAnswer, CoreError>;
}

#[async_trait]
impl<T: DomainAvailabilityClient + ?Sized> DomainAvailabilityClient for std::sync::Arc<T> {
  async fn lookup(&self, domain: &str) -> Result<RegistryAnswer, CoreError> {
    (**self).lookup(domain).await
  }
}

/// Runs availability checks for a query across a set of TLDs.
pub struct DomainChecker<C> {
  client: C,
  batch_size: usize,
  batch_delay: Duration,
}

impl<C: DomainAvailabilityClient> DomainChecker<C> {
  pub fn new(client: C) -> Self {
    Self {
      client,
      batch_size: CHECK_BATCH_SIZE,
      batch_delay: CHECK_BATCH_DELAY,
    }
  }

  /// Checks `query` against `selected_tlds` (or the catalog's TLDs, or
  /// [`FALLBACK_TLDS`], in that order of preference).
  ///
  /// A query carrying an extension outside the valid-TLD allow-list yields
  /// exactly one `invalid_tld` result and no lookups. Otherwise one result
  /// is produced per TLD, in input order.
  #[instrument(name = "DomainChecker::check", skip(self, catalog), fields(query = %query))]
  pub async fn check(
    &self,
    query: &str,
    selected_tlds: &[String],
    catalog: &PricingCatalog,
  ) -> Vec<DomainCheckResult> {
    let query = query.trim().to_ascii_lowercase();
    let base = tld::base_name(&query).to_string();
    let query_ext = tld::extension(&query).map(|e| e.to_string());

    if let Some(ext) = &query_ext {
      if !tld::is_valid_tld(ext) {
        debug!(extension = %ext, "Query extension is not a recognized TLD.");
        return vec![DomainCheckResult {
          domain: query,
          available: false,
          price: "N/A".to_string(),
          invalid_tld: true,
        }];
      }
    }

    let mut tlds: Vec<String> = if !selected_tlds.is_empty() {
      selected_tlds.iter().map(|t| normalize_tld(t)).collect()
    } else if !catalog.is_empty() {
      catalog.tlds()
    } else {
      FALLBACK_TLDS.iter().map(|t| t.to_string()).collect()
    };

    if let Some(ext) = &query_ext {
      if !tlds.iter().any(|t| t == ext) {
        tlds.push(ext.clone());
      }
    }

    let mut results = Vec::with_capacity(tlds.len());
    let batches: Vec<&[String]> = tlds.chunks(self.batch_size).collect();
    let batch_count = batches.len();

    for (batch_idx, batch) in batches.into_iter().enumerate() {
      let lookups = batch.iter().map(|t| self.check_one(&base, t, catalog));
      results.extend(join_all(lookups).await);

      if batch_idx + 1 < batch_count {
        tokio::time::sleep(self.batch_delay).await;
      }
    }

    results
  }

  async fn check_one(&self, base: &str, tld: &str, catalog: &PricingCatalog) -> DomainCheckResult {
    let domain = format!("{}{}", base, tld);
    let available = match self.client.lookup(&domain).await {
      Ok(RegistryAnswer::Available) => true,
      Ok(RegistryAnswer::RateLimited) => true,
      Ok(RegistryAnswer::Taken) => false,
      Err(err) => {
        // Fail closed: a lookup we could not complete is not for sale.
        warn!(domain = %domain, error = %err, "Registry lookup failed; reporting unavailable.");
        false
      }
    };

    DomainCheckResult {
      domain,
      available,
      price: price_label(catalog, tld),
      invalid_tld: false,
    }
  }
}

/// Renders a TLD's yearly price, falling back to the default when the
/// catalog has no entry.
pub fn price_label(catalog: &PricingCatalog, tld: &str) -> String {
  let price = catalog.price_for(tld).unwrap_or_else(fallback_price);
  format!("${:.2}/Year", price)
}

fn normalize_tld(raw: &str) -> String {
  let tld = raw.trim().to_ascii_lowercase();
  if tld.starts_with('.') {
    tld
  } else {
    format!(".{}", tld)
  }
}
