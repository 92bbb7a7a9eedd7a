// server/src/pipelines/checkout_pipeline.rs

//! The checkout flow: identity resolution, then strictly sequential
//! line-item processing, then an optional receipt email.
//!
//! Items are processed one at a time, in cart order, so the identity
//! established by step 2 is in place before any item-level call and the
//! gateway sees at most one in-flight purchase per buyer. A failing item
//! is captured into its receipt and later items still run; there is no
//! compensating rollback.

use crate::errors::AppError;
use crate::pipelines::contexts::{
  CheckoutCtxData, CheckoutCustomer, LineItemReceipt, SigninCtxData, SignupCtxData,
};
use crate::services::billing::{self, ChargeArgs};
use crate::services::email;
use crate::state::AppState;
use astaan::cart::{CartLineItem, LineItemKind};
use astaan::{Flow, FlowContext, FlowControl, FlowOutcome};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{event, info, warn, Level};
use uuid::Uuid;

pub const RECEIPT_COMPLETED: &str = "completed";
pub const RECEIPT_FAILED: &str = "failed";
pub const RECEIPT_ERROR: &str = "error";

/// Builds the checkout flow.
pub fn build_checkout_flow() -> Flow<CheckoutCtxData, AppError> {
  let mut checkout_f = Flow::<CheckoutCtxData, AppError>::new(&[
    ("validate_checkout_input", false, None),
    ("resolve_customer_identity", false, None),
    ("process_line_items", false, None),
    ("finalize_checkout", false, None),
    (
      "send_receipt_email",
      true, // Best-effort; never fails the checkout.
      Some(Arc::new(|ctx: FlowContext<CheckoutCtxData>| {
        ctx.read().completed_count == 0
      })),
    ),
  ]);

  // Step 1: Validate the cart and buyer input
  checkout_f.on(
    "validate_checkout_input",
    |ctx_data: FlowContext<CheckoutCtxData>| async move {
      let (items, account_no, customer) = {
        let guard = ctx_data.read();
        (guard.items.clone(), guard.account_no.clone(), guard.customer.clone())
      }; // guard dropped

      if items.is_empty() {
        return Err(AppError::Validation("Your cart is empty.".to_string()));
      }
      if items.iter().any(|i| i.price <= Decimal::ZERO) {
        return Err(AppError::Validation(
          "Every cart item must have a positive price.".to_string(),
        ));
      }
      if account_no.trim().is_empty() {
        return Err(AppError::Validation(
          "A payer wallet number is required.".to_string(),
        ));
      }
      if let CheckoutCustomer::New {
        input,
        confirm_password: Some(confirm),
      } = &customer
      {
        if *confirm != input.password {
          return Err(AppError::Validation("Passwords do not match.".to_string()));
        }
      }

      event!(Level::DEBUG, item_count = items.len(), "Checkout input validated.");
      Ok::<_, AppError>(FlowControl::Continue)
    },
  );

  // Step 2: Resolve buyer identity (login or signup)
  checkout_f.on(
    "resolve_customer_identity",
    |ctx_data: FlowContext<CheckoutCtxData>| async move {
      let (app_state, customer) = {
        let guard = ctx_data.read();
        (guard.app_state.clone(), guard.customer.clone())
      }; // guard dropped

      match customer {
        CheckoutCustomer::Existing { email, password } => {
          let signin_ctx = FlowContext::new(SigninCtxData {
            app_state: app_state.clone(),
            email,
            password,
            temp_password_hash: None,
            user_id: None,
            fullname: None,
            role: None,
            token: None,
          });
          // Identity failures abort the entire checkout.
          let outcome = app_state.flows.signin.run(signin_ctx.clone()).await?;
          if outcome != FlowOutcome::Completed {
            return Err(AppError::Auth(
              "Authentication was halted unexpectedly.".to_string(),
            ));
          }
          let signin_guard = signin_ctx.read();
          let mut guard = ctx_data.write();
          guard.user_id = signin_guard.user_id;
          guard.user_email = Some(signin_guard.email.clone());
          guard.user_fullname = signin_guard.fullname.clone();
          guard.token = signin_guard.token.clone();
        }
        CheckoutCustomer::New { input, .. } => {
          let email = input.email.clone();
          let fullname = input.fullname.clone();
          let signup_ctx = FlowContext::new(SignupCtxData {
            app_state: app_state.clone(),
            input,
            created_user_id: None,
            token: None,
          });
          let outcome = app_state.flows.signup.run(signup_ctx.clone()).await?;
          if outcome != FlowOutcome::Completed {
            return Err(AppError::Auth(
              "Account creation was halted unexpectedly.".to_string(),
            ));
          }
          let signup_guard = signup_ctx.read();
          let mut guard = ctx_data.write();
          guard.user_id = signup_guard.created_user_id;
          guard.user_email = Some(email.to_ascii_lowercase());
          guard.user_fullname = Some(fullname);
          guard.token = signup_guard.token.clone();
        }
      }

      let user_id = ctx_data.read().user_id;
      info!(user_id = ?user_id, "Checkout identity resolved.");
      Ok::<_, AppError>(FlowControl::Continue)
    },
  );

  // Step 3: Process cart items, one at a time, in cart order
  checkout_f.on(
    "process_line_items",
    |ctx_data: FlowContext<CheckoutCtxData>| async move {
      let (app_state, items, account_no, user_id_opt) = {
        let guard = ctx_data.read();
        (
          guard.app_state.clone(),
          guard.items.clone(),
          guard.account_no.clone(),
          guard.user_id,
        )
      }; // guard dropped

      let user_id = user_id_opt.ok_or_else(|| {
        AppError::Internal("Checkout reached item processing without an identity.".to_string())
      })?;

      let mut receipts = Vec::with_capacity(items.len());
      for item in &items {
        let receipt = process_item(&app_state, user_id, &account_no, item).await;
        info!(
          item_id = %receipt.item_id,
          status = %receipt.status,
          "Cart line item processed."
        );
        receipts.push(receipt);
      }

      let completed_count = receipts.iter().filter(|r| r.status == RECEIPT_COMPLETED).count();
      {
        let mut guard = ctx_data.write();
        guard.receipts = receipts;
        guard.completed_count = completed_count;
      } // guard dropped

      Ok::<_, AppError>(FlowControl::Continue)
    },
  );

  // Step 4: Decide the overall outcome
  checkout_f.on(
    "finalize_checkout",
    |ctx_data: FlowContext<CheckoutCtxData>| async move {
      let (completed_count, total_items) = {
        let guard = ctx_data.read();
        (guard.completed_count, guard.receipts.len())
      }; // guard dropped

      info!(completed_count, total_items, "Checkout settled.");
      if completed_count == 0 {
        // Nothing was purchased; the handler surfaces the first failure.
        return Ok::<_, AppError>(FlowControl::Stop);
      }
      Ok(FlowControl::Continue)
    },
  );

  // Step 5: Receipt email (optional, skipped when nothing completed)
  checkout_f.on(
    "send_receipt_email",
    |ctx_data: FlowContext<CheckoutCtxData>| async move {
      let (recipient_opt, fullname, smtp_from, completed_count, completed_total) = {
        let guard = ctx_data.read();
        let completed_total: Decimal = guard
          .receipts
          .iter()
          .zip(guard.items.iter())
          .filter(|(r, _)| r.status == RECEIPT_COMPLETED)
          .map(|(_, i)| i.price)
          .sum();
        (
          guard.user_email.clone(),
          guard
            .user_fullname
            .clone()
            .unwrap_or_else(|| "Valued Customer".to_string()),
          guard.app_state.config.smtp_from.clone(),
          guard.completed_count,
          completed_total,
        )
      }; // guard dropped

      let recipient = match recipient_opt {
        Some(email) => email,
        None => {
          warn!("Skipping receipt email: recipient address missing.");
          return Ok::<_, AppError>(FlowControl::Continue);
        }
      };

      let total_display = format!("${:.2}", completed_total);
      match email::send_checkout_receipt(&recipient, &smtp_from, &fullname, completed_count, &total_display)
        .await
      {
        Ok(sent) => {
          info!(message_id = %sent.message_id, "Checkout receipt email sent.");
          ctx_data.write().receipt_email_sent = true;
        }
        Err(e) => {
          warn!(error = %e, "Failed to send checkout receipt email.");
          ctx_data.write().receipt_email_sent = false;
        }
      }
      Ok(FlowControl::Continue)
    },
  );

  checkout_f
}

/// Processes one cart line item: creates the purchasable record where
/// needed, then charges and settles. Every failure is absorbed into the
/// receipt so later items still run.
async fn process_item(
  app_state: &AppState,
  user_id: Uuid,
  account_no: &str,
  item: &CartLineItem,
) -> LineItemReceipt {
  let mut receipt = LineItemReceipt {
    item_id: item.id.clone(),
    title: item.title.clone(),
    kind: item.kind,
    transaction_id: None,
    entity_id: None,
    status: RECEIPT_ERROR.to_string(),
    message: String::new(),
  };

  let charge_args = match prepare_item(app_state, user_id, account_no, item).await {
    Ok((entity_id, args)) => {
      receipt.entity_id = entity_id;
      args
    }
    Err(err) => {
      receipt.message = err.user_message();
      return receipt;
    }
  };

  match billing::charge(&app_state.db_pool, &*app_state.gateway, charge_args).await {
    Ok(outcome) => {
      receipt.transaction_id = Some(outcome.transaction_id);
      if outcome.status == crate::models::TransactionStatus::Completed {
        receipt.status = RECEIPT_COMPLETED.to_string();
        receipt.message = "Payment completed.".to_string();
        if item.kind == LineItemKind::Domain {
          if let Some(domain_id) = receipt.entity_id {
            if let Err(e) = mark_domain_registered(app_state, domain_id).await {
              warn!(domain_id = %domain_id, error = %e, "Failed to finalize domain registration.");
            }
          }
        }
      } else {
        receipt.status = RECEIPT_FAILED.to_string();
        receipt.message = outcome.message;
      }
    }
    Err(err) => {
      // The transaction (if created) stays pending for the sweep.
      receipt.message = err.user_message();
    }
  }

  receipt
}

/// Creates/validates the purchased entity and assembles the charge.
async fn prepare_item(
  app_state: &AppState,
  user_id: Uuid,
  account_no: &str,
  item: &CartLineItem,
) -> Result<(Option<Uuid>, ChargeArgs), AppError> {
  let mut args = ChargeArgs {
    user_id,
    kind: crate::models::TransactionKind::Payment,
    amount: item.price,
    description: String::new(),
    account_no: account_no.to_string(),
    domain_id: None,
    service_id: None,
    hosting_package_id: None,
  };

  match item.kind {
    LineItemKind::Domain => {
      let name = item.title.trim().to_ascii_lowercase();
      let insert_result = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO domains (name, user_id, status, price) \
         VALUES ($1, $2, 'available', $3) \
         RETURNING id",
      )
      .bind(&name)
      .bind(user_id)
      .bind(item.price)
      .fetch_one(&app_state.db_pool)
      .await;

      let domain_id = match insert_result {
        Ok(id) => id,
        Err(e) if crate::errors::is_unique_violation(&e) => {
          return Err(AppError::Validation(format!(
            "Domain '{}' is already registered.",
            name
          )));
        }
        Err(e) => return Err(AppError::Sqlx(e)),
      };

      args.kind = crate::models::TransactionKind::Register;
      args.description = format!("Domain registration for {}", name);
      args.domain_id = Some(domain_id);
      Ok((Some(domain_id), args))
    }
    LineItemKind::Service => {
      let service_id = item.reference.ok_or_else(|| {
        AppError::Validation(format!("Cart item '{}' is missing a package reference.", item.title))
      })?;
      let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM services WHERE id = $1)")
        .bind(service_id)
        .fetch_one(&app_state.db_pool)
        .await?;
      if !exists {
        return Err(AppError::NotFound("Service package not found.".to_string()));
      }

      args.kind = crate::models::TransactionKind::ServicePayment;
      args.description = format!("Service payment for {} ({})", item.title, item.options);
      args.service_id = Some(service_id);
      Ok((Some(service_id), args))
    }
    LineItemKind::Hosting => {
      let package_id = item.reference.ok_or_else(|| {
        AppError::Validation(format!("Cart item '{}' is missing a package reference.", item.title))
      })?;
      let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM hosting_packages WHERE id = $1)")
          .bind(package_id)
          .fetch_one(&app_state.db_pool)
          .await?;
      if !exists {
        return Err(AppError::NotFound("Hosting package not found.".to_string()));
      }

      args.kind = crate::models::TransactionKind::HostingPayment;
      args.description = format!("Hosting payment for {}", item.title);
      args.hosting_package_id = Some(package_id);
      Ok((Some(package_id), args))
    }
  }
}

/// The only forward transition in the registration flow:
/// `available` -> `registered`, with a one-year term.
async fn mark_domain_registered(app_state: &AppState, domain_id: Uuid) -> Result<(), AppError> {
  sqlx::query(
    "UPDATE domains \
     SET status = 'registered', \
         registration_date = now(), \
         expiry_date = now() + interval '1 year', \
         updated_at = now() \
     WHERE id = $1 AND status = 'available'",
  )
  .bind(domain_id)
  .execute(&app_state.db_pool)
  .await?;
  Ok(())
}
