// storefront/src/workflow/pipeline.rs

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use tracing::{event, instrument, span, Instrument, Level};

use super::{ContextData, PipelineControl, PipelineResult, SkipCondition, StepDef, WorkflowError, WorkflowResult};

/// A boxed async step handler.
pub type Handler<T, Err> =
  Box<dyn Fn(ContextData<T>) -> Pin<Box<dyn Future<Output = Result<PipelineControl, Err>> + Send>> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Phase {
  Before,
  On,
  After,
}

impl Phase {
  const ORDER: [Phase; 3] = [Phase::Before, Phase::On, Phase::After];

  fn as_str(self) -> &'static str {
    match self {
      Phase::Before => "before",
      Phase::On => "on",
      Phase::After => "after",
    }
  }
}

/// Ordered steps over a context of type `T`, with handlers failing as `Err`.
pub struct Pipeline<T, Err>
where
  T: Send + Sync + 'static,
  Err: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
{
  steps: Vec<StepDef<T>>,
  handlers: HashMap<(String, Phase), Vec<Handler<T, Err>>>,
}

fn key(step_name: &str, phase: Phase) -> (String, Phase) {
  (step_name.to_string(), phase)
}

impl<T, Err> Pipeline<T, Err>
where
  T: Send + Sync + 'static,
  Err: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
{
  /// `(name, optional, skip_if)` per step, in execution order.
  pub fn new(step_defs: &[(&str, bool, Option<SkipCondition<T>>)]) -> Self {
    Self {
      steps: step_defs
        .iter()
        .map(|(name, optional, skip_if)| StepDef::new(*name, *optional, skip_if.clone()))
        .collect(),
      handlers: HashMap::new(),
    }
  }

  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }

  fn position(&self, step_name: &str) -> WorkflowResult<usize> {
    self
      .steps
      .iter()
      .position(|s| s.name == step_name)
      .ok_or_else(|| WorkflowError::StepNotFound {
        step_name: step_name.to_string(),
      })
  }

  fn ensure_new(&self, step_name: &str) -> WorkflowResult<()> {
    if self.steps.iter().any(|s| s.name == step_name) {
      return Err(WorkflowError::DuplicateStep {
        step_name: step_name.to_string(),
      });
    }
    Ok(())
  }

  pub fn insert_before_step(
    &mut self,
    existing: &str,
    name: &str,
    optional: bool,
    skip_if: Option<SkipCondition<T>>,
  ) -> WorkflowResult<()> {
    let idx = self.position(existing)?;
    self.ensure_new(name)?;
    self.steps.insert(idx, StepDef::new(name, optional, skip_if));
    Ok(())
  }

  pub fn insert_after_step(
    &mut self,
    existing: &str,
    name: &str,
    optional: bool,
    skip_if: Option<SkipCondition<T>>,
  ) -> WorkflowResult<()> {
    let idx = self.position(existing)?;
    self.ensure_new(name)?;
    self.steps.insert(idx + 1, StepDef::new(name, optional, skip_if));
    Ok(())
  }

  /// Removes the step and all its handlers. Unknown names are a no-op.
  pub fn remove_step(&mut self, step_name: &str) {
    if let Ok(idx) = self.position(step_name) {
      self.steps.remove(idx);
      for phase in Phase::ORDER {
        self.handlers.remove(&key(step_name, phase));
      }
    }
  }

  pub fn set_optional(&mut self, step_name: &str, optional: bool) -> WorkflowResult<()> {
    let idx = self.position(step_name)?;
    self.steps[idx].optional = optional;
    Ok(())
  }

  fn register<F, HandlerErr>(
    &mut self,
    step_name: &str,
    phase: Phase,
    handler_fn: impl Fn(ContextData<T>) -> F + Send + Sync + 'static,
  ) -> WorkflowResult<()>
  where
    F: Future<Output = Result<PipelineControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<Err> + Send + Sync + 'static,
  {
    self.position(step_name)?;
    let handler: Handler<T, Err> = Box::new(move |ctx| {
      let fut = handler_fn(ctx);
      Box::pin(async move { fut.await.map_err(Into::into) })
    });
    self.handlers.entry(key(step_name, phase)).or_default().push(handler);
    event!(Level::TRACE, step_name, phase = phase.as_str(), "Handler registered.");
    Ok(())
  }

  pub fn before<F, HandlerErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<T>) -> F + Send + Sync + 'static,
  ) -> WorkflowResult<()>
  where
    F: Future<Output = Result<PipelineControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<Err> + Send + Sync + 'static,
  {
    self.register(step_name, Phase::Before, handler_fn)
  }

  pub fn on<F, HandlerErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<T>) -> F + Send + Sync + 'static,
  ) -> WorkflowResult<()>
  where
    F: Future<Output = Result<PipelineControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<Err> + Send + Sync + 'static,
  {
    self.register(step_name, Phase::On, handler_fn)
  }

  pub fn after<F, HandlerErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<T>) -> F + Send + Sync + 'static,
  ) -> WorkflowResult<()>
  where
    F: Future<Output = Result<PipelineControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<Err> + Send + Sync + 'static,
  {
    self.register(step_name, Phase::After, handler_fn)
  }

  fn phase_handlers(&self, step_name: &str, phase: Phase) -> &[Handler<T, Err>] {
    self
      .handlers
      .get(&key(step_name, phase))
      .map(Vec::as_slice)
      .unwrap_or(&[])
  }

  /// Runs every step in order against `ctx`.
  ///
  /// A handler error aborts the run and is returned as-is. A non-optional
  /// step with no handlers fails with [`WorkflowError::HandlerMissing`].
  #[instrument(
    name = "Pipeline::run",
    skip_all,
    fields(context_type = %std::any::type_name::<T>(), num_steps = self.steps.len()),
    err(Display)
  )]
  pub async fn run(&self, ctx: ContextData<T>) -> Result<PipelineResult, Err> {
    event!(Level::DEBUG, "Pipeline execution starting.");

    for (step_index, step) in self.steps.iter().enumerate() {
      let step_span = span!(
        Level::INFO,
        "pipeline_step",
        step_name = step.name.as_str(),
        step_index,
        optional = step.optional
      );

      if let Some(skip_if) = &step.skip_if {
        if skip_if(ctx.clone()) {
          event!(parent: &step_span, Level::DEBUG, "Step skipped by condition.");
          continue;
        }
      }

      let registered: usize = Phase::ORDER
        .iter()
        .map(|phase| self.phase_handlers(&step.name, *phase).len())
        .sum();
      if registered == 0 {
        if step.optional {
          event!(parent: &step_span, Level::DEBUG, "Optional step has no handlers, skipping.");
          continue;
        }
        event!(parent: &step_span, Level::ERROR, "Non-optional step has no handlers.");
        return Err(Err::from(WorkflowError::HandlerMissing {
          step_name: step.name.clone(),
        }));
      }

      for phase in Phase::ORDER {
        for (handler_index, handler) in self.phase_handlers(&step.name, phase).iter().enumerate() {
          let handler_span = span!(parent: &step_span, Level::DEBUG, "handler", phase = phase.as_str(), handler_index);
          match handler(ctx.clone()).instrument(handler_span).await {
            Ok(PipelineControl::Continue) => {}
            Ok(PipelineControl::Stop) => {
              event!(parent: &step_span, Level::INFO, phase = phase.as_str(), "Pipeline stopped by handler.");
              return Ok(PipelineResult::Stopped);
            }
            Err(e) => {
              event!(parent: &step_span, Level::ERROR, phase = phase.as_str(), error = %e, "Handler failed.");
              return Err(e);
            }
          }
        }
      }
      event!(parent: &step_span, Level::DEBUG, "Step finished.");
    }

    event!(Level::DEBUG, "Pipeline execution completed.");
    Ok(PipelineResult::Completed)
  }
}

impl<T, Err> std::fmt::Debug for Pipeline<T, Err>
where
  T: Send + Sync + 'static,
  Err: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
{
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Pipeline")
      .field("steps", &self.steps)
      .field("handler_count", &self.handlers.values().map(Vec::len).sum::<usize>())
      .finish()
  }
}
