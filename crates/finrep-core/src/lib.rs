//! FINREP Core: Stage Trait, Runner, Context and Data Model
//!
//! Generic seven-stage pipeline core. Stages accumulate typed results in a
//! `WorkflowContext`; the `PipelineRunner` executes them in order and seals
//! the run into a `WorkflowEnvelope`.

pub mod context;
pub mod data_model;
pub mod envelope;
pub mod error;
pub mod events;
pub mod reasoning;
pub mod runner;
pub mod stage;

pub use context::WorkflowContext;
pub use data_model::*;
pub use envelope::{
    generate_report_id, generate_workflow_id, StageRecord, WorkflowEnvelope, WorkflowStatus,
    DEFAULT_WORKFLOW_PREFIX,
};
pub use error::FinrepError;
pub use events::{ChannelEventSink, EventSink, PipelineEvent, TracingEventSink};
pub use reasoning::{analyze, ChatMessage, ChatRole, ReasoningError, ReasoningService};
pub use runner::PipelineRunner;
pub use stage::{Stage, StageKind, StagePayload, StageResult, StageStatus};

/// FINREP engine version
pub const FINREP_VERSION: &str = "1.0.0";
