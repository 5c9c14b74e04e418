// storefront/src/workflow/error.rs

use thiserror::Error;

/// Pipeline construction and wiring mistakes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
  #[error("step not found: {step_name}")]
  StepNotFound { step_name: String },

  #[error("step already defined: {step_name}")]
  DuplicateStep { step_name: String },

  #[error("handler missing for non-optional step: {step_name}")]
  HandlerMissing { step_name: String },
}

pub type WorkflowResult<T, E = WorkflowError> = std::result::Result<T, E>;
