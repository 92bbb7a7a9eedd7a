// core/src/error.rs

use anyhow::Error as AnyhowError;
use thiserror::Error;

/// Errors produced by the flow runner itself, as opposed to the handlers it
/// executes (those carry the application's own error type).
#[derive(Debug, Error)]
pub enum FlowError {
  #[error("Step not found: {step_name}")]
  StepNotFound { step_name: String },

  #[error("Handler missing for required step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("Internal flow error: {0}")]
  Internal(String),
}

/// Errors from the domain operations in this crate: pricing, availability
/// lookups, and the payment gateway adapter.
#[derive(Debug, Error)]
pub enum CoreError {
  #[error("Validation error: {0}")]
  Validation(String),

  #[error("Configuration error: {0}")]
  Config(String),

  #[error("Registry lookup failed for '{domain}'. Source: {source}")]
  Registry {
    domain: String,
    #[source]
    source: AnyhowError,
  },

  #[error("Payment gateway error: {source}")]
  Gateway {
    #[source]
    source: AnyhowError,
  },

  #[error("Flow error: {0}")]
  Flow(#[from] FlowError),
}

pub type CoreResult<T, E = CoreError> = std::result::Result<T, E>;
