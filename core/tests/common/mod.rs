// tests/common/mod.rs
#![allow(dead_code)] // Allow unused helpers across the test binaries.

use astaan::availability::{DomainAvailabilityClient, RegistryAnswer};
use astaan::{CoreError, FlowContext, FlowControl, FlowError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use tracing::Level;

// --- Common Context Struct for Flow Tests ---
#[derive(Clone, Debug, Default)]
pub struct TestContext {
  pub counter: i32,
  pub message: String,
  pub steps_executed: Vec<String>,
}

// --- Common Error Type for Flow Tests ---
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("Flow framework error: {0}")]
  Flow(String), // Stored as String for Eq comparison.

  #[error("Test handler failed: {0}")]
  Handler(String),
}

impl From<FlowError> for TestError {
  fn from(fe: FlowError) -> Self {
    TestError::Flow(format!("{:?}", fe))
  }
}

pub type TestHandlerFut = Pin<Box<dyn Future<Output = Result<FlowControl, TestError>> + Send>>;

// --- Common Handler Creators ---
pub fn create_simple_handler(
  step_name: &'static str,
  message_to_append: &'static str,
) -> impl Fn(FlowContext<TestContext>) -> TestHandlerFut + Send + Sync + 'static {
  move |ctx: FlowContext<TestContext>| {
    let step_name_owned = step_name.to_string();
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.counter += 1;
      guard.message.push_str(message_to_append);
      guard.steps_executed.push(step_name_owned);
      Ok(FlowControl::Continue)
    })
  }
}

pub fn create_failing_handler(
  step_name: &'static str,
  error_message: &'static str,
) -> impl Fn(FlowContext<TestContext>) -> TestHandlerFut + Send + Sync + 'static {
  move |ctx: FlowContext<TestContext>| {
    let step_name_owned = step_name.to_string();
    let error_message_owned = error_message.to_string();
    Box::pin(async move {
      ctx.write().steps_executed.push(step_name_owned);
      Err(TestError::Handler(error_message_owned))
    })
  }
}

// --- Mock Registry Client for Availability Tests ---

/// Scripted per-domain registry behavior.
#[derive(Debug, Clone, Copy)]
pub enum MockAnswer {
  Answer(RegistryAnswer),
  Error,
}

pub struct MockRegistry {
  answers: HashMap<String, MockAnswer>,
  default_answer: MockAnswer,
  calls: Mutex<Vec<String>>,
}

impl MockRegistry {
  pub fn new(default_answer: MockAnswer) -> Self {
    Self {
      answers: HashMap::new(),
      default_answer,
      calls: Mutex::new(Vec::new()),
    }
  }

  pub fn with_answer(mut self, domain: &str, answer: MockAnswer) -> Self {
    self.answers.insert(domain.to_string(), answer);
    self
  }

  pub fn calls(&self) -> Vec<String> {
    self.calls.lock().unwrap().clone()
  }

  pub fn call_count(&self) -> usize {
    self.calls.lock().unwrap().len()
  }
}

#[async_trait]
impl DomainAvailabilityClient for MockRegistry {
  async fn lookup(&self, domain: &str) -> Result<RegistryAnswer, CoreError> {
    self.calls.lock().unwrap().push(domain.to_string());
    let answer = self.answers.get(domain).copied().unwrap_or(self.default_answer);
    match answer {
      MockAnswer::Answer(a) => Ok(a),
      MockAnswer::Error => Err(CoreError::Registry {
        domain: domain.to_string(),
        source: anyhow::anyhow!("scripted lookup failure"),
      }),
    }
  }
}

// --- Helper for Tracing Setup ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
