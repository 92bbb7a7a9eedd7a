// tests/payment_tests.rs

use astaan::payment::{
  format_amount, normalize_account_no, preflight, settle, GatewayResponse, PurchaseRequest,
  SettledStatus, RESPONSE_OK, RESPONSE_REJECTED,
};
use rust_decimal::Decimal;
use uuid::Uuid;

fn request(amount: Decimal, account_no: &str) -> PurchaseRequest {
  PurchaseRequest {
    transaction_id: Uuid::new_v4(),
    account_no: account_no.to_string(),
    amount,
    description: "Domain registration for example.com".to_string(),
  }
}

#[test]
fn test_amount_formats_to_exactly_two_decimals() {
  assert_eq!(format_amount(Decimal::new(1999, 2)), "19.99");
  assert_eq!(format_amount(Decimal::new(5, 0)), "5.00");
  assert_eq!(format_amount(Decimal::ZERO), "0.00");
}

#[test]
fn test_zero_amount_is_rejected_before_any_network_call() {
  let rejection = preflight(&request(Decimal::ZERO, "612345678"))
    .expect("a zero amount must be rejected locally");
  assert_eq!(rejection.response_code, RESPONSE_REJECTED);
  assert!(rejection.response_msg.contains("Amount too low"));
  assert!(rejection.reference_id.is_none());
}

#[test]
fn test_sub_cent_amount_formats_to_zero_and_is_rejected() {
  let rejection = preflight(&request(Decimal::new(4, 3), "612345678")); // 0.004
  assert!(rejection.is_some());
}

#[test]
fn test_missing_account_number_is_rejected_locally() {
  let rejection = preflight(&request(Decimal::new(1999, 2), "   "))
    .expect("a blank payer account must be rejected locally");
  assert_eq!(rejection.response_code, RESPONSE_REJECTED);
  assert!(rejection.response_msg.contains("account number"));
}

#[test]
fn test_valid_request_passes_preflight() {
  assert!(preflight(&request(Decimal::new(1999, 2), "612345678")).is_none());
}

#[test]
fn test_account_normalization() {
  // Plus prefix is stripped.
  assert_eq!(normalize_account_no("+252612345678"), "252612345678");
  // Bare 9-digit local numbers gain the country code.
  assert_eq!(normalize_account_no("612345678"), "252612345678");
  // Already-qualified numbers pass through.
  assert_eq!(normalize_account_no("252612345678"), "252612345678");
}

#[test]
fn test_approved_response_settles_completed_with_gateway_reference() {
  let tx_id = Uuid::new_v4();
  let response = GatewayResponse {
    response_code: RESPONSE_OK.to_string(),
    response_msg: "RCS_SUCCESS".to_string(),
    reference_id: Some("WP-REF-42".to_string()),
  };

  let settlement = settle(tx_id, &response);
  assert_eq!(settlement.status, SettledStatus::Completed);
  assert_eq!(settlement.payment_reference_id, "WP-REF-42");
}

#[test]
fn test_approved_response_without_reference_falls_back_to_transaction_id() {
  let tx_id = Uuid::new_v4();
  let response = GatewayResponse {
    response_code: RESPONSE_OK.to_string(),
    response_msg: "RCS_SUCCESS".to_string(),
    reference_id: None,
  };

  let settlement = settle(tx_id, &response);
  assert_eq!(settlement.status, SettledStatus::Completed);
  assert_eq!(settlement.payment_reference_id, tx_id.to_string());
}

#[test]
fn test_declined_response_settles_failed_with_gateway_message() {
  let tx_id = Uuid::new_v4();
  let response = GatewayResponse {
    response_code: "2002".to_string(),
    response_msg: "Insufficient funds".to_string(),
    reference_id: Some("WP-REF-43".to_string()),
  };

  let settlement = settle(tx_id, &response);
  assert_eq!(settlement.status, SettledStatus::Failed);
  assert!(settlement.message.contains("Insufficient funds"));
  assert_eq!(settlement.payment_reference_id, "WP-REF-43");
}

#[test]
fn test_gateway_response_decodes_from_wire_shape() {
  let body = r#"{"responseCode":"2001","responseMsg":"RCS_SUCCESS","referenceId":"REF123"}"#;
  let response: GatewayResponse = serde_json::from_str(body).unwrap();
  assert!(response.approved());
  assert_eq!(response.reference_id.as_deref(), Some("REF123"));

  // referenceId may be omitted entirely.
  let body = r#"{"responseCode":"5310","responseMsg":"Payment declined"}"#;
  let response: GatewayResponse = serde_json::from_str(body).unwrap();
  assert!(!response.approved());
  assert!(response.reference_id.is_none());
}
