// tests/availability_tests.rs
mod common;

use astaan::availability::{DomainChecker, RegistryAnswer, FALLBACK_TLDS};
use astaan::pricing::{PricingCatalog, PricingEntry};
use astaan::tld;
use common::*;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;

fn catalog_with(entries: &[(&str, i64)]) -> PricingCatalog {
  // Prices given in cents for readability.
  PricingCatalog::new(
    entries
      .iter()
      .map(|(tld, cents)| {
        PricingEntry::new(
          tld,
          Decimal::new(*cents, 2),
          Decimal::new(*cents, 2),
          Decimal::new(*cents, 2),
          "1 Year",
        )
        .unwrap()
      })
      .collect(),
  )
}

fn strings(tlds: &[&str]) -> Vec<String> {
  tlds.iter().map(|t| t.to_string()).collect()
}

#[test]
fn test_base_name_of_query_without_extension_is_the_query() {
  assert_eq!(tld::base_name("example"), "example");
  assert_eq!(tld::extension("example"), None);
  assert_eq!(tld::base_name("shop.example.com"), "shop.example");
  assert_eq!(tld::extension("shop.example.com"), Some(".com"));
}

#[test]
fn test_valid_tld_allow_list_is_case_insensitive() {
  assert!(tld::is_valid_tld(".com"));
  assert!(tld::is_valid_tld(".COM"));
  assert!(tld::is_valid_tld(".so"));
  assert!(!tld::is_valid_tld(".notarealtld"));
}

#[tokio::test]
async fn test_invalid_extension_short_circuits_without_lookups() {
  setup_tracing();
  let registry = Arc::new(MockRegistry::new(MockAnswer::Answer(RegistryAnswer::Available)));
  let checker = DomainChecker::new(registry.clone());

  let results = checker
    .check("example.notarealtld", &[], &catalog_with(&[(".com", 1348)]))
    .await;

  assert_eq!(results.len(), 1);
  assert!(results[0].invalid_tld);
  assert!(!results[0].available);
  assert_eq!(results[0].price, "N/A");
  assert_eq!(results[0].domain, "example.notarealtld");
  assert_eq!(registry.call_count(), 0, "no network call may be attempted");
}

#[tokio::test(start_paused = true)]
async fn test_lookups_run_in_batches_of_three_with_courtesy_delay() {
  setup_tracing();
  let registry = Arc::new(MockRegistry::new(MockAnswer::Answer(RegistryAnswer::Available)));
  let checker = DomainChecker::new(registry.clone());

  let tlds = strings(&[".com", ".org", ".net", ".io", ".co", ".ai", ".so"]);
  let started = tokio::time::Instant::now();
  let results = checker.check("example", &tlds, &PricingCatalog::default()).await;
  let elapsed = started.elapsed();

  // 7 TLDs -> ceil(7/3) = 3 batches -> 2 enforced delays of 500ms.
  assert_eq!(results.len(), 7);
  assert_eq!(registry.call_count(), 7);
  assert_eq!(elapsed, Duration::from_millis(1000));

  // Results come back in input TLD order, batches concatenated in
  // submission order.
  let domains: Vec<&str> = results.iter().map(|r| r.domain.as_str()).collect();
  assert_eq!(
    domains,
    vec![
      "example.com",
      "example.org",
      "example.net",
      "example.io",
      "example.co",
      "example.ai",
      "example.so"
    ]
  );
}

#[tokio::test]
async fn test_happy_path_catalog_price_is_rendered() {
  setup_tracing();
  let registry = Arc::new(MockRegistry::new(MockAnswer::Answer(RegistryAnswer::Available)));
  let checker = DomainChecker::new(registry.clone());

  let results = checker.check("example", &[], &catalog_with(&[(".com", 1348)])).await;

  assert_eq!(results.len(), 1);
  assert_eq!(results[0].domain, "example.com");
  assert!(results[0].available);
  assert!(!results[0].invalid_tld);
  assert_eq!(results[0].price, "$13.48/Year");
  assert_eq!(registry.calls(), vec!["example.com"]);
}

#[tokio::test]
async fn test_registered_domain_reads_unavailable() {
  setup_tracing();
  let registry = Arc::new(
    MockRegistry::new(MockAnswer::Answer(RegistryAnswer::Available))
      .with_answer("taken.com", MockAnswer::Answer(RegistryAnswer::Taken)),
  );
  let checker = DomainChecker::new(registry);

  let results = checker
    .check("taken", &strings(&[".com"]), &catalog_with(&[(".com", 1348)]))
    .await;

  assert_eq!(results.len(), 1);
  assert!(!results[0].available);
}

#[tokio::test]
async fn test_lookup_error_fails_closed() {
  setup_tracing();
  let registry = Arc::new(MockRegistry::new(MockAnswer::Error));
  let checker = DomainChecker::new(registry.clone());

  let results = checker
    .check("example", &strings(&[".com", ".org"]), &PricingCatalog::default())
    .await;

  // Errors degrade to unavailable results; the batch never aborts.
  assert_eq!(results.len(), 2);
  assert!(results.iter().all(|r| !r.available && !r.invalid_tld));
  assert_eq!(registry.call_count(), 2);
}

#[tokio::test]
async fn test_rate_limited_lookup_reads_available() {
  setup_tracing();
  let registry = Arc::new(MockRegistry::new(MockAnswer::Answer(RegistryAnswer::RateLimited)));
  let checker = DomainChecker::new(registry);

  let results = checker
    .check("example", &strings(&[".com"]), &PricingCatalog::default())
    .await;

  assert!(results[0].available);
}

#[tokio::test]
async fn test_query_extension_is_appended_to_selected_tlds() {
  setup_tracing();
  let registry = Arc::new(MockRegistry::new(MockAnswer::Answer(RegistryAnswer::Available)));
  let checker = DomainChecker::new(registry.clone());

  let results = checker
    .check("example.net", &strings(&[".com"]), &PricingCatalog::default())
    .await;

  let domains: Vec<&str> = results.iter().map(|r| r.domain.as_str()).collect();
  assert_eq!(domains, vec!["example.com", "example.net"]);
}

#[tokio::test]
async fn test_fallback_tld_set_when_catalog_and_selection_are_empty() {
  setup_tracing();
  let registry = Arc::new(MockRegistry::new(MockAnswer::Answer(RegistryAnswer::Available)));
  let checker = DomainChecker::new(registry.clone());

  let results = checker.check("example", &[], &PricingCatalog::default()).await;

  assert_eq!(results.len(), FALLBACK_TLDS.len());
  let domains: Vec<&str> = results.iter().map(|r| r.domain.as_str()).collect();
  assert_eq!(
    domains,
    vec!["example.com", "example.org", "example.net", "example.edu"]
  );
}

#[tokio::test]
async fn test_unpriced_tld_uses_fallback_price() {
  setup_tracing();
  let registry = Arc::new(MockRegistry::new(MockAnswer::Answer(RegistryAnswer::Available)));
  let checker = DomainChecker::new(registry);

  let results = checker
    .check("example", &strings(&[".xyz"]), &catalog_with(&[(".com", 1348)]))
    .await;

  assert_eq!(results[0].price, "$14.99/Year");
}

#[tokio::test]
async fn test_mixed_case_query_is_lowercased() {
  setup_tracing();
  let registry = Arc::new(MockRegistry::new(MockAnswer::Answer(RegistryAnswer::Available)));
  let checker = DomainChecker::new(registry.clone());

  let results = checker
    .check("ExAmPle", &strings(&[".COM"]), &PricingCatalog::default())
    .await;

  assert_eq!(results[0].domain, "example.com");
  assert_eq!(registry.calls(), vec!["example.com"]);
}
