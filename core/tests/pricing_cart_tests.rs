// tests/pricing_cart_tests.rs

use astaan::cart::{Cart, CartLineItem, LineItemKind};
use astaan::pricing::{PricingCatalog, PricingEntry};
use rust_decimal::Decimal;

fn entry(tld: &str, cents: i64) -> PricingEntry {
  PricingEntry::new(
    tld,
    Decimal::new(cents, 2),
    Decimal::new(cents + 200, 2),
    Decimal::new(cents + 100, 2),
    "1 Year",
  )
  .unwrap()
}

fn domain_item(id: &str, name: &str, cents: i64) -> CartLineItem {
  CartLineItem {
    id: id.to_string(),
    kind: LineItemKind::Domain,
    title: name.to_string(),
    subtitle: String::new(),
    price: Decimal::new(cents, 2),
    options: "register".to_string(),
    renewal_price: None,
    reference: None,
  }
}

#[test]
fn test_pricing_entry_requires_leading_dot() {
  assert!(PricingEntry::new("com", Decimal::ONE, Decimal::ONE, Decimal::ONE, "1 Year").is_err());
  assert!(PricingEntry::new(".", Decimal::ONE, Decimal::ONE, Decimal::ONE, "1 Year").is_err());
}

#[test]
fn test_pricing_entry_normalizes_tld_case() {
  let e = entry(".COM", 1348);
  assert_eq!(e.tld, ".com");
}

#[test]
fn test_catalog_lookup_is_case_insensitive() {
  let catalog = PricingCatalog::new(vec![entry(".com", 1348), entry(".so", 5999)]);
  assert_eq!(catalog.price_for(".COM"), Some(Decimal::new(1348, 2)));
  assert_eq!(catalog.price_for(".So"), Some(Decimal::new(5999, 2)));
  assert_eq!(catalog.price_for(".xyz"), None);
  assert_eq!(catalog.renewal_price_for(".com"), Some(Decimal::new(1548, 2)));
}

#[test]
fn test_catalog_reads_are_idempotent() {
  let catalog = PricingCatalog::new(vec![entry(".com", 1348), entry(".net", 1199)]);

  let first = catalog.tlds();
  let second = catalog.tlds();
  assert_eq!(first, second);
  assert_eq!(first, vec![".com", ".net"]);

  assert_eq!(catalog.price_for(".net"), catalog.price_for(".net"));
  assert_eq!(catalog.entries().to_vec(), catalog.entries().to_vec());
}

#[test]
fn test_cart_operations_are_pure() {
  let empty = Cart::new();
  let one = empty.add(domain_item("a", "example.com", 1348));
  let two = one.add(domain_item("b", "example.net", 1199));

  // Earlier values are untouched.
  assert!(empty.is_empty());
  assert_eq!(one.len(), 1);
  assert_eq!(two.len(), 2);

  let removed = two.remove("a");
  assert_eq!(removed.len(), 1);
  assert_eq!(removed.items()[0].id, "b");
  assert_eq!(two.len(), 2);

  assert!(two.clear().is_empty());
  assert_eq!(two.len(), 2);
}

#[test]
fn test_cart_total_sums_line_prices() {
  let cart = Cart::new()
    .add(domain_item("a", "example.com", 1348))
    .add(domain_item("b", "example.net", 1199));
  assert_eq!(cart.total(), Decimal::new(2547, 2));
}

#[test]
fn test_cart_line_item_wire_shape() {
  let body = r#"{
    "id": "li-1",
    "type": "domain",
    "title": "example.com",
    "price": "13.48",
    "options": "register",
    "renewalPrice": "15.48"
  }"#;
  let item: CartLineItem = serde_json::from_str(body).unwrap();
  assert_eq!(item.kind, LineItemKind::Domain);
  assert_eq!(item.price, Decimal::new(1348, 2));
  assert_eq!(item.renewal_price, Some(Decimal::new(1548, 2)));
  assert!(item.reference.is_none());
}
