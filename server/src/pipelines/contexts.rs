// server/src/pipelines/contexts.rs

//! Context structs carried through the application's flows.

use crate::state::AppState;
use astaan::cart::{CartLineItem, LineItemKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registration fields, shared by the signup endpoint and the
/// new-customer checkout path.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupInput {
  pub fullname: String,
  pub email: String,
  pub password: String,
  pub phone: String,
  #[serde(default)]
  pub company_name: Option<String>,
  #[serde(default)]
  pub address: Option<String>,
  #[serde(default)]
  pub city: Option<String>,
  #[serde(default)]
  pub country: Option<String>,
}

#[derive(Clone)]
pub struct SignupCtxData {
  pub app_state: AppState,
  pub input: SignupInput,
  pub created_user_id: Option<Uuid>,
  pub token: Option<String>,
}

#[derive(Clone)]
pub struct SigninCtxData {
  pub app_state: AppState,
  pub email: String,
  pub password: String,
  pub temp_password_hash: Option<String>,
  pub user_id: Option<Uuid>,
  pub fullname: Option<String>,
  pub role: Option<String>,
  pub token: Option<String>,
}

/// Who is paying for the cart. Decoded explicitly as a tagged union;
/// unrecognized shapes are rejected at the API boundary.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum CheckoutCustomer {
  Existing {
    email: String,
    password: String,
  },
  New {
    #[serde(flatten)]
    input: SignupInput,
    #[serde(default, rename = "confirmPassword")]
    confirm_password: Option<String>,
  },
}

/// Outcome of one cart line item, reported back to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemReceipt {
  pub item_id: String,
  pub title: String,
  pub kind: LineItemKind,
  pub transaction_id: Option<Uuid>,
  pub entity_id: Option<Uuid>,
  pub status: String,
  pub message: String,
}

#[derive(Clone)]
pub struct CheckoutCtxData {
  pub app_state: AppState,
  pub customer: CheckoutCustomer,
  pub items: Vec<CartLineItem>,
  pub account_no: String,

  // Populated by the flow:
  pub user_id: Option<Uuid>,
  pub user_email: Option<String>,
  pub user_fullname: Option<String>,
  pub token: Option<String>,
  pub receipts: Vec<LineItemReceipt>,
  pub completed_count: usize,
  pub receipt_email_sent: bool,
}

impl CheckoutCtxData {
  pub fn new(
    app_state: AppState,
    customer: CheckoutCustomer,
    items: Vec<CartLineItem>,
    account_no: String,
  ) -> Self {
    Self {
      app_state,
      customer,
      items,
      account_no,
      user_id: None,
      user_email: None,
      user_fullname: None,
      token: None,
      receipts: Vec::new(),
      completed_count: 0,
      receipt_email_sent: false,
    }
  }
}
