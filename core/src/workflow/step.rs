// storefront/src/workflow/step.rs

use std::sync::Arc;

use super::ContextData;

/// Evaluated right before a step runs; `true` skips the step.
pub type SkipCondition<T> = Arc<dyn Fn(ContextData<T>) -> bool + Send + Sync + 'static>;

#[derive(Clone)]
pub struct StepDef<T: Send + Sync + 'static> {
  pub name: String,
  /// An optional step without handlers is skipped instead of failing the run.
  pub optional: bool,
  pub skip_if: Option<SkipCondition<T>>,
}

impl<T: Send + Sync + 'static> StepDef<T> {
  pub fn new(name: impl Into<String>, optional: bool, skip_if: Option<SkipCondition<T>>) -> Self {
    Self {
      name: name.into(),
      optional,
      skip_if,
    }
  }
}

impl<T: Send + Sync + 'static> std::fmt::Debug for StepDef<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("StepDef")
      .field("name", &self.name)
      .field("optional", &self.optional)
      .field("has_skip_if", &self.skip_if.is_some())
      .finish()
  }
}
