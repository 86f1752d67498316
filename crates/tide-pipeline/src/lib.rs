//! # tide-pipeline
//!
//! The question-to-answer orchestration pipeline:
//!
//! 1. classify the question's [`tide_core::Topic`]
//! 2. synthesize a read-only SQL query scoped to the live schema catalog
//! 3. validate and execute it against the lake
//! 4. derive a declarative chart spec when the question asks for one
//! 5. generate a grounded executive summary
//!
//! Every stage talks to the model through the [`ModelCaller`] seam so the
//! pipeline is fully testable with scripted replies. All failures terminate
//! in a discriminated [`tide_core::Answer`]; nothing in this crate panics
//! or raises into the presentation layer.

pub mod caller;
pub mod chart;
pub mod narrate;
pub mod orchestrator;
pub mod reply;
pub mod synthesize;
pub mod topic;

pub use caller::ModelCaller;
pub use chart::{ChartError, wants_chart};
pub use orchestrator::{Orchestrator, PipelineOptions};
pub use reply::ParseError;
pub use synthesize::{SynthesizedQuery, ValidationStatus};
