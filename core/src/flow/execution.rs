// core/src/flow/execution.rs

//! `Flow::run()`: executes the steps against a shared context.

use crate::error::FlowError;
use crate::flow::context::FlowContext;
use crate::flow::control::{FlowControl, FlowOutcome};
use crate::flow::definition::Flow;
use tracing::{event, instrument, span, Instrument, Level};

impl<TData, Err> Flow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Executes the flow against `ctx_data`.
  ///
  /// Steps run strictly in definition order. A handler returning
  /// `FlowControl::Stop` halts the run with `FlowOutcome::Stopped`; a
  /// handler error aborts the run and propagates. A required step with no
  /// registered handler is a [`FlowError::HandlerMissing`], converted into
  /// `Err` via the `From<FlowError>` bound.
  #[instrument(
        name = "Flow::run",
        skip_all,
        fields(
            flow_context_type = %std::any::type_name::<TData>(),
            num_steps = self.steps.len(),
        ),
        err(Display)
    )]
  pub async fn run(&self, ctx_data: FlowContext<TData>) -> Result<FlowOutcome, Err> {
    event!(Level::DEBUG, "Flow execution starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_name_str = step_def.name.as_str();

      // Handler futures are instrumented with this span rather than run
      // under an entered guard; the run future stays Send.
      let step_span = span!(
        Level::INFO,
        "flow_step",
        step_name = step_name_str,
        step_index = step_idx,
        optional = step_def.optional
      );

      if let Some(skip_cond_fn) = &step_def.skip_if {
        if skip_cond_fn(ctx_data.clone()) {
          event!(parent: &step_span, Level::INFO, "Step skipped due to 'skip_if' condition.");
          continue;
        }
      }

      let handlers = match self.handlers.get(step_name_str) {
        Some(handlers) if !handlers.is_empty() => handlers,
        _ => {
          if step_def.optional {
            event!(parent: &step_span, Level::DEBUG, "Optional step has no handlers, skipping.");
            continue;
          }
          event!(parent: &step_span, Level::ERROR, "Required step has no handlers.");
          return Err(Err::from(FlowError::HandlerMissing {
            step_name: step_def.name.clone(),
          }));
        }
      };

      for (handler_idx, handler_fn) in handlers.iter().enumerate() {
        let handler_result = handler_fn(ctx_data.clone())
          .instrument(step_span.clone())
          .await;
        match handler_result {
          Ok(FlowControl::Continue) => {}
          Ok(FlowControl::Stop) => {
            event!(parent: &step_span, Level::INFO, handler_index = handler_idx, "Flow stopped by a handler.");
            return Ok(FlowOutcome::Stopped);
          }
          Err(e) => {
            event!(parent: &step_span, Level::ERROR, handler_index = handler_idx, error = %e, "Flow handler failed.");
            return Err(e);
          }
        }
      }
      event!(parent: &step_span, Level::DEBUG, "Step finished.");
    }

    event!(Level::DEBUG, "Flow execution completed.");
    Ok(FlowOutcome::Completed)
  }
}
