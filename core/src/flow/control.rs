// core/src/flow/control.rs

//! Signals for controlling flow progression and the outcome of a run.

/// Signal from a step handler indicating whether the flow should continue
/// with the next step or stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowControl {
  /// Continue with the remaining steps.
  Continue,
  /// Halt the flow immediately. No further steps will be executed.
  Stop,
}

/// Outcome of a full flow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
  /// Every non-skipped step ran to completion.
  Completed,
  /// A handler returned `FlowControl::Stop`.
  Stopped,
}
