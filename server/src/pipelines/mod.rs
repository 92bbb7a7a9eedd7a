// server/src/pipelines/mod.rs

//! The application's flows: signup, signin, and checkout.

use crate::errors::AppError;
use astaan::Flow;

pub mod checkout_pipeline;
pub mod contexts;
pub mod signin_pipeline;
pub mod signup_pipeline;

use self::contexts::{CheckoutCtxData, SigninCtxData, SignupCtxData};

/// Every flow the server runs, assembled once at startup and shared
/// through `AppState`.
pub struct Flows {
  pub signup: Flow<SignupCtxData, AppError>,
  pub signin: Flow<SigninCtxData, AppError>,
  pub checkout: Flow<CheckoutCtxData, AppError>,
}

pub fn build_flows() -> Flows {
  tracing::info!("Assembling application flows...");
  let flows = Flows {
    signup: signup_pipeline::build_signup_flow(),
    signin: signin_pipeline::build_signin_flow(),
    checkout: checkout_pipeline::build_checkout_flow(),
  };
  tracing::info!("All application flows assembled.");
  flows
}
