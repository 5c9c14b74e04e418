// storefront/src/workflow/mod.rs

//! A small async step pipeline.
//!
//! A [`Pipeline`] is an ordered list of named steps. Each step may carry
//! `before`, `on` and `after` handlers that receive a shared
//! [`ContextData`] and return a [`PipelineControl`]. Steps can be optional
//! and can be skipped by a predicate over the context. The server builds its
//! multi-step operations (checkout, status changes, claims, dispute
//! resolution) on top of this.

mod context_data;
mod control;
mod error;
mod pipeline;
mod step;

pub use context_data::ContextData;
pub use control::{PipelineControl, PipelineResult};
pub use error::{WorkflowError, WorkflowResult};
pub use pipeline::{Handler, Pipeline};
pub use step::{SkipCondition, StepDef};
