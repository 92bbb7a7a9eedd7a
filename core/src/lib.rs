// src/lib.rs

//! Astaan: the domain-check, pricing, cart and payment engine behind the
//! Astaan Digital back-office.
//!
//! This crate holds everything that does not depend on the web framework or
//! the database:
//!  - A sequential, named-step flow runner used to orchestrate signup,
//!    signin and checkout.
//!  - The TLD pricing catalog and the valid-TLD allow-list.
//!  - The batched domain availability checker over a pluggable registry
//!    client (RDAP by default).
//!  - The cart value object.
//!  - The WaafiPay payment gateway adapter and its settlement mapping.

pub mod availability;
pub mod cart;
pub mod error;
pub mod flow;
pub mod payment;
pub mod pricing;
pub mod rdap;
pub mod tld;

// --- Re-exports for the Public API ---

pub use crate::error::{CoreError, CoreResult, FlowError};

pub use crate::flow::{Flow, FlowContext, FlowControl, FlowOutcome, SkipCondition};

pub use crate::availability::{
  DomainAvailabilityClient, DomainCheckResult, DomainChecker, RegistryAnswer,
};
pub use crate::cart::{Cart, CartLineItem, LineItemKind};
pub use crate::payment::{
  GatewayResponse, PaymentGateway, PurchaseRequest, SettledStatus, Settlement,
};
pub use crate::payment::waafi::{WaafiClient, WaafiConfig};
pub use crate::pricing::{PricingCatalog, PricingEntry};
pub use crate::rdap::RdapClient;
