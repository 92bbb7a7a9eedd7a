// core/src/payment/mod.rs

//! Payment gateway contract and settlement mapping.
//!
//! The gateway is invoked once per ledger transaction. Its response code
//! alone decides whether the transaction settles `completed` or `failed`;
//! everything else (the pending row, the monotonic status update) is the
//! caller's concern.

pub mod waafi;

use crate::error::CoreError;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The gateway's success sentinel.
pub const RESPONSE_OK: &str = "2001";

/// Code used for locally synthesized pre-flight rejections.
pub const RESPONSE_REJECTED: &str = "9999";

/// Country code prefixed to bare 9-digit local wallet numbers.
pub const LOCAL_COUNTRY_PREFIX: &str = "252";

/// A single purchase attempt against the gateway.
#[derive(Debug, Clone)]
pub struct PurchaseRequest {
  pub transaction_id: Uuid,
  pub account_no: String,
  pub amount: Decimal,
  pub description: String,
}

/// What the gateway (or a pre-flight rejection) answered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
  pub response_code: String,
  pub response_msg: String,
  #[serde(default)]
  pub reference_id: Option<String>,
}

impl GatewayResponse {
  pub fn approved(&self) -> bool {
    self.response_code == RESPONSE_OK
  }

  pub(crate) fn rejected(msg: impl Into<String>) -> Self {
    Self {
      response_code: RESPONSE_REJECTED.to_string(),
      response_msg: msg.into(),
      reference_id: None,
    }
  }
}

/// A mobile-money gateway able to execute a purchase.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
  async fn purchase(&self, request: &PurchaseRequest) -> Result<GatewayResponse, CoreError>;
}

/// Terminal status a transaction settles into after the gateway answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettledStatus {
  Completed,
  Failed,
}

/// The ledger-side consequence of a gateway response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
  pub status: SettledStatus,
  pub payment_reference_id: String,
  pub message: String,
}

/// Maps a gateway response onto the transaction's terminal state.
///
/// Code `"2001"` settles `Completed`; anything else settles `Failed` with
/// the gateway's message. The payment reference is the gateway's
/// `referenceId`, falling back to the transaction's own id when omitted.
pub fn settle(transaction_id: Uuid, response: &GatewayResponse) -> Settlement {
  let status = if response.approved() {
    SettledStatus::Completed
  } else {
    SettledStatus::Failed
  };
  Settlement {
    status,
    payment_reference_id: response
      .reference_id
      .clone()
      .unwrap_or_else(|| transaction_id.to_string()),
    message: response.response_msg.clone(),
  }
}

/// Formats an amount the way the gateway expects: exactly two decimals.
pub fn format_amount(amount: Decimal) -> String {
  format!("{:.2}", amount)
}

/// Normalizes a payer wallet number: strips `+`, and prefixes the country
/// code to bare 9-digit local numbers.
pub fn normalize_account_no(raw: &str) -> String {
  let cleaned: String = raw.trim().chars().filter(|c| *c != '+').collect();
  if cleaned.len() == 9 && cleaned.chars().all(|c| c.is_ascii_digit()) {
    format!("{}{}", LOCAL_COUNTRY_PREFIX, cleaned)
  } else {
    cleaned
  }
}

/// Pre-flight validation shared by every gateway implementation.
///
/// Returns a locally synthesized rejection when the request must not reach
/// the network: a formatted amount of `"0.00"`, or a missing payer account.
pub fn preflight(request: &PurchaseRequest) -> Option<GatewayResponse> {
  if format_amount(request.amount) == "0.00" {
    return Some(GatewayResponse::rejected(
      "Amount too low to process payment.",
    ));
  }
  if request.account_no.trim().is_empty() {
    return Some(GatewayResponse::rejected(
      "Payer account number is required.",
    ));
  }
  None
}
