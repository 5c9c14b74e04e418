// storefront/src/workflow/control.rs

/// Returned by every handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineControl {
  Continue,
  /// Halts the run. Remaining handlers and steps are not executed.
  Stop,
}

/// Outcome of [`Pipeline::run`](super::Pipeline::run).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineResult {
  Completed,
  Stopped,
}
