// core/src/payment/waafi.rs

//! The WaafiPay client.
//!
//! One synchronous POST per purchase, against the fixed `/asm` endpoint,
//! with the schema-1.0 envelope. Network failures propagate to the caller;
//! the associated transaction stays `pending` until the reconciliation
//! sweep settles it.

use crate::error::CoreError;
use crate::payment::{
  format_amount, normalize_account_no, preflight, GatewayResponse, PaymentGateway,
  PurchaseRequest,
};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::time::Duration;
use tracing::{info, instrument};
use uuid::Uuid;

pub const DEFAULT_WAAFI_ENDPOINT: &str = "https://api.waafipay.net/asm";

const PURCHASE_TIMEOUT: Duration = Duration::from_secs(30);

/// Merchant credentials and endpoint, loaded from the environment by the
/// server. Credential values must be trimmed of whitespace by the loader.
#[derive(Debug, Clone)]
pub struct WaafiConfig {
  pub endpoint: String,
  pub merchant_uid: String,
  pub api_user_id: String,
  pub api_key: String,
}

pub struct WaafiClient {
  http: reqwest::Client,
  config: WaafiConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WaafiEnvelope<'a> {
  schema_version: &'static str,
  request_id: String,
  timestamp: String,
  channel_name: &'static str,
  service_name: &'static str,
  service_params: ServiceParams<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ServiceParams<'a> {
  merchant_uid: &'a str,
  api_user_id: &'a str,
  api_key: &'a str,
  payment_method: &'static str,
  payer_info: PayerInfo,
  transaction_info: TransactionInfo,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PayerInfo {
  account_no: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TransactionInfo {
  reference_id: String,
  invoice_id: String,
  amount: String,
  currency: &'static str,
  description: String,
}

impl WaafiClient {
  pub fn new(config: WaafiConfig) -> Result<Self, CoreError> {
    if config.merchant_uid.is_empty() || config.api_user_id.is_empty() || config.api_key.is_empty()
    {
      return Err(CoreError::Config(
        "WaafiPay merchant credentials are not configured.".to_string(),
      ));
    }
    let http = reqwest::Client::builder()
      .timeout(PURCHASE_TIMEOUT)
      .build()
      .map_err(|e| CoreError::Config(format!("Failed to build WaafiPay HTTP client: {}", e)))?;
    Ok(Self { http, config })
  }

  fn envelope<'a>(&'a self, request: &PurchaseRequest) -> WaafiEnvelope<'a> {
    let reference = request.transaction_id.to_string();
    WaafiEnvelope {
      schema_version: "1.0",
      request_id: Uuid::new_v4().to_string(),
      timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
      channel_name: "WEB",
      service_name: "API_PURCHASE",
      service_params: ServiceParams {
        merchant_uid: &self.config.merchant_uid,
        api_user_id: &self.config.api_user_id,
        api_key: &self.config.api_key,
        payment_method: "mwallet_account",
        payer_info: PayerInfo {
          account_no: normalize_account_no(&request.account_no),
        },
        transaction_info: TransactionInfo {
          reference_id: reference.clone(),
          invoice_id: reference,
          amount: format_amount(request.amount),
          currency: "USD",
          description: request.description.clone(),
        },
      },
    }
  }
}

#[async_trait]
impl PaymentGateway for WaafiClient {
  #[instrument(
        name = "WaafiClient::purchase",
        skip(self, request),
        fields(transaction_id = %request.transaction_id, amount = %request.amount),
        err(Display)
    )]
  async fn purchase(&self, request: &PurchaseRequest) -> Result<GatewayResponse, CoreError> {
    if let Some(rejection) = preflight(request) {
      info!(
        response_code = %rejection.response_code,
        "Purchase rejected before reaching the gateway: {}",
        rejection.response_msg
      );
      return Ok(rejection);
    }

    let payload = self.envelope(request);
    let response = self
      .http
      .post(&self.config.endpoint)
      .json(&payload)
      .send()
      .await
      .map_err(|e| CoreError::Gateway { source: e.into() })?;

    let status = response.status();
    if !status.is_success() {
      return Err(CoreError::Gateway {
        source: anyhow::anyhow!("gateway returned HTTP {}", status),
      });
    }

    let gateway_response: GatewayResponse = response
      .json()
      .await
      .map_err(|e| CoreError::Gateway { source: e.into() })?;

    info!(
      response_code = %gateway_response.response_code,
      reference_id = ?gateway_response.reference_id,
      "Gateway answered."
    );
    Ok(gateway_response)
  }
}
