// server/src/services/reconcile.rs

//! Background reconciliation of stuck `pending` transactions.
//!
//! A transaction stays `pending` when the process dies, or the gateway
//! times out, between the pending insert and the settle update. WaafiPay
//! exposes no status-query API, so the sweep fails closed: stale pending
//! rows settle `failed`, each logged with its payment reference for manual
//! follow-up.

use crate::errors::Result;
use crate::state::AppState;
use sqlx::PgPool;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// Spawns the periodic sweep for the lifetime of the process.
pub fn spawn_reconciliation(state: AppState) {
  let interval_secs = state.config.reconcile_interval_secs;
  let stale_after_secs = state.config.reconcile_stale_after_secs;
  tokio::spawn(async move {
    let mut ticker = tokio::time::interval(std::time::Duration::from_secs(interval_secs));
    loop {
      ticker.tick().await;
      match sweep(&state.db_pool, stale_after_secs).await {
        Ok(0) => {}
        Ok(n) => info!(settled = n, "Reconciliation sweep settled stale transactions."),
        Err(e) => error!(error = %e, "Reconciliation sweep failed."),
      }
    }
  });
  info!(
    interval_secs,
    stale_after_secs, "Transaction reconciliation sweep scheduled."
  );
}

/// Settles every `pending` transaction older than `stale_after_secs` as
/// `failed`. Returns how many rows were settled.
#[instrument(name = "reconcile::sweep", skip(db), err(Display))]
pub async fn sweep(db: &PgPool, stale_after_secs: i64) -> Result<usize> {
  let settled: Vec<(Uuid, Option<String>)> = sqlx::query_as(
    "UPDATE transactions \
     SET status = 'failed', \
         completed_at = now(), \
         payment_reference_id = COALESCE(payment_reference_id, id::text) \
     WHERE status = 'pending' \
       AND created_at < now() - make_interval(secs => $1) \
     RETURNING id, payment_reference_id",
  )
  .bind(stale_after_secs as f64)
  .fetch_all(db)
  .await?;

  for (id, reference) in &settled {
    warn!(
      transaction_id = %id,
      payment_reference_id = ?reference,
      "Stale pending transaction settled as failed; verify against the gateway statement."
    );
  }

  Ok(settled.len())
}
