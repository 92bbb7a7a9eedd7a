// tests/flow_tests.rs
mod common;

use astaan::{Flow, FlowContext, FlowControl, FlowOutcome};
use common::*;
use serial_test::serial;
use std::sync::Arc;

#[tokio::test]
#[serial]
async fn test_flow_runs_steps_in_order() {
  setup_tracing();
  let mut flow = Flow::<TestContext, TestError>::new(&[
    ("step1", false, None),
    ("step2", false, None),
    ("step3", false, None),
  ]);

  flow.on("step1", create_simple_handler("step1", " S1"));
  flow.on("step2", create_simple_handler("step2", " S2"));
  flow.on("step3", create_simple_handler("step3", " S3"));

  let ctx = FlowContext::new(TestContext::default());
  let result = flow.run(ctx.clone()).await;

  assert!(result.is_ok());
  assert_eq!(result.unwrap(), FlowOutcome::Completed);

  let guard = ctx.read();
  assert_eq!(guard.counter, 3);
  assert_eq!(guard.message, " S1 S2 S3");
  assert_eq!(guard.steps_executed, vec!["step1", "step2", "step3"]);
}

#[tokio::test]
#[serial]
async fn test_flow_stops_on_flow_control_stop() {
  setup_tracing();
  let mut flow = Flow::<TestContext, TestError>::new(&[
    ("stepA", false, None),
    ("stopStep", false, None),
    ("stepC", false, None),
  ]);

  flow.on("stepA", create_simple_handler("stepA", "A"));
  flow.on("stopStep", |ctx: FlowContext<TestContext>| async move {
    ctx.write().steps_executed.push("stopStep".to_string());
    Ok::<FlowControl, TestError>(FlowControl::Stop)
  });
  flow.on("stepC", create_simple_handler("stepC", "C")); // Must not run.

  let ctx = FlowContext::new(TestContext::default());
  let result = flow.run(ctx.clone()).await;

  assert!(result.is_ok());
  assert_eq!(result.unwrap(), FlowOutcome::Stopped);

  let guard = ctx.read();
  assert_eq!(guard.counter, 1); // Only stepA incremented.
  assert_eq!(guard.message, "A");
  assert_eq!(guard.steps_executed, vec!["stepA", "stopStep"]);
}

#[tokio::test]
#[serial]
async fn test_flow_propagates_handler_error() {
  setup_tracing();
  let mut flow = Flow::<TestContext, TestError>::new(&[
    ("good_step", false, None),
    ("bad_step", false, None),
    ("another_step", false, None),
  ]);

  flow.on("good_step", create_simple_handler("good_step", "Good"));
  flow.on("bad_step", create_failing_handler("bad_step", "I am a bad step!"));
  flow.on("another_step", create_simple_handler("another_step", "NeverRun"));

  let ctx = FlowContext::new(TestContext::default());
  let result = flow.run(ctx.clone()).await;

  assert!(result.is_err());
  match result.err().unwrap() {
    TestError::Handler(msg) => assert_eq!(msg, "I am a bad step!"),
    other => panic!("Expected TestError::Handler, got {:?}", other),
  }

  let guard = ctx.read();
  assert_eq!(guard.counter, 1); // Only good_step incremented.
  assert_eq!(guard.steps_executed, vec!["good_step", "bad_step"]);
}

#[tokio::test]
#[serial]
async fn test_flow_skips_step_if_condition_met() {
  setup_tracing();
  let mut flow = Flow::<TestContext, TestError>::new(&[
    ("step1", false, None),
    (
      "step_to_skip",
      false,
      Some(Arc::new(|ctx: FlowContext<TestContext>| ctx.read().counter > 0)),
    ),
    ("step3", false, None),
  ]);

  flow.on("step1", create_simple_handler("step1", " S1"));
  flow.on("step_to_skip", create_simple_handler("step_to_skip", " SKIPPED"));
  flow.on("step3", create_simple_handler("step3", " S3"));

  let ctx = FlowContext::new(TestContext::default());
  let result = flow.run(ctx.clone()).await;

  assert_eq!(result.unwrap(), FlowOutcome::Completed);
  let guard = ctx.read();
  assert_eq!(guard.counter, 2); // step1 and step3 ran.
  assert_eq!(guard.message, " S1 S3");
  assert_eq!(guard.steps_executed, vec!["step1", "step3"]);
}

#[tokio::test]
#[serial]
async fn test_required_step_missing_handler_fails() {
  setup_tracing();
  let flow = Flow::<TestContext, TestError>::new(&[("step_with_no_handler", false, None)]);

  let ctx = FlowContext::new(TestContext::default());
  let result = flow.run(ctx.clone()).await;

  assert!(result.is_err());
  if let Err(TestError::Flow(s)) = result {
    assert!(s.contains("HandlerMissing"));
    assert!(s.contains("step_with_no_handler"));
  } else {
    panic!("Expected FlowError::HandlerMissing, got {:?}", result);
  }
}

#[tokio::test]
#[serial]
async fn test_optional_step_missing_handler_succeeds() {
  setup_tracing();
  let flow = Flow::<TestContext, TestError>::new(&[("optional_step_no_handler", true, None)]);

  let ctx = FlowContext::new(TestContext::default());
  let result = flow.run(ctx.clone()).await;

  assert!(result.is_ok());
  assert_eq!(result.unwrap(), FlowOutcome::Completed);
}

#[tokio::test]
#[serial]
async fn test_multiple_handlers_on_one_step_run_in_registration_order() {
  setup_tracing();
  let mut flow = Flow::<TestContext, TestError>::new(&[("main_step", false, None)]);

  flow.on("main_step", create_simple_handler("first", "First;"));
  flow.on("main_step", create_simple_handler("second", "Second;"));

  let ctx = FlowContext::new(TestContext::default());
  flow.run(ctx.clone()).await.unwrap();

  let guard = ctx.read();
  assert_eq!(guard.counter, 2);
  assert_eq!(guard.message, "First;Second;");
  assert_eq!(guard.steps_executed, vec!["first", "second"]);
}
