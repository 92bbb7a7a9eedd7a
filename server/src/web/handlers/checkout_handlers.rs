// server/src/web/handlers/checkout_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::pipelines::contexts::{CheckoutCtxData, CheckoutCustomer};
use crate::state::AppState;
use crate::web::ok_data;
use astaan::cart::CartLineItem;
use astaan::{FlowContext, FlowOutcome};

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequestPayload {
  pub customer: CheckoutCustomer,
  pub items: Vec<CartLineItem>,
  pub account_no: String,
}

#[instrument(
    name = "handler::start_checkout",
    skip(app_state, req_payload),
    fields(item_count = req_payload.items.len())
)]
pub async fn start_checkout_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<CheckoutRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();
  info!("Checkout initiated with {} item(s).", payload.items.len());

  let checkout_ctx = FlowContext::new(CheckoutCtxData::new(
    app_state.get_ref().clone(),
    payload.customer,
    payload.items,
    payload.account_no,
  ));

  match app_state.flows.checkout.run(checkout_ctx.clone()).await {
    Ok(FlowOutcome::Completed) => {
      let final_ctx_guard = checkout_ctx.read();
      let user_id = final_ctx_guard.user_id.ok_or_else(|| {
        warn!("Checkout flow completed but no user id was recorded.");
        AppError::Internal(
          "Checkout completed, but confirmation details are unavailable.".to_string(),
        )
      })?;

      info!(
        user_id = %user_id,
        completed = final_ctx_guard.completed_count,
        total = final_ctx_guard.receipts.len(),
        "Checkout finished."
      );

      Ok(ok_data(json!({
          "userId": user_id,
          "token": final_ctx_guard.token.clone(),
          "receipts": final_ctx_guard.receipts.clone(),
          "completedCount": final_ctx_guard.completed_count,
          "receiptEmailSent": final_ctx_guard.receipt_email_sent,
      })))
    }
    Ok(FlowOutcome::Stopped) => {
      // Stopped means no line item settled completed; surface the first
      // failure as a single actionable message.
      let final_ctx_guard = checkout_ctx.read();
      let message = final_ctx_guard
        .receipts
        .iter()
        .find(|r| !r.message.is_empty())
        .map(|r| r.message.clone())
        .unwrap_or_else(|| "Payment processing failed.".to_string());
      warn!("Checkout stopped without a completed item: {}", message);
      Err(AppError::Payment(message))
    }
    Err(app_err) => {
      warn!("Checkout flow failed: {:?}", app_err);
      Err(app_err)
    }
  }
}
