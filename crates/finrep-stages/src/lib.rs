//! FINREP Stages: the seven analysis stages and the workflow facade.
//!
//! # Pipeline Flow
//!
//! ```text
//! extraction → financial_analysis → compliance → market_context
//!     → risk_assessment → quality_control → report_generation
//!        ↓                ↓                 ↓
//!   document svc     compliance svc     market svc        reporting svc
//! ```
//!
//! Each stage reaches its collaborator through the shared `ToolInvoker`. A
//! failed call is replaced by the stage's fallback payload and the stage is
//! marked degraded; a response of the wrong shape turns into a stage error
//! carrying that fallback as its partial payload. Only a missing upstream
//! stage aborts the run.

mod compliance;
mod extraction;
mod financial_analysis;
mod market;
mod prompts;
mod quality;
mod report;
mod risk;
mod workflow;

pub use compliance::ComplianceStage;
pub use extraction::ExtractionStage;
pub use financial_analysis::FinancialAnalysisStage;
pub use market::MarketContextStage;
pub use quality::QualityControlStage;
pub use report::ReportGenerationStage;
pub use risk::RiskAssessmentStage;
pub use workflow::{standard_stages, FinancialWorkflow, WorkflowSettings};

use finrep_core::{ReasoningService, Stage, StageKind, StageResult};
use finrep_tools::{fallback_for, ToolError, ToolInvoker};
use std::sync::Arc;

/// Shared, immutable collaborators handed to every stage
#[derive(Clone)]
pub struct Collaborators {
    pub tools: Arc<ToolInvoker>,
    pub reasoning: Arc<dyn ReasoningService>,
}

impl Collaborators {
    pub fn new(tools: Arc<ToolInvoker>, reasoning: Arc<dyn ReasoningService>) -> Self {
        Self { tools, reasoning }
    }
}

/// Turn a failed collaborator call into the stage's result
pub(crate) fn recover(kind: StageKind, err: ToolError) -> StageResult {
    match err {
        ToolError::Malformed { .. } => {
            tracing::error!(stage = %kind, error = %err, "malformed service response");
            StageResult::error(err.to_string(), Some(fallback_for(kind)))
        }
        _ => {
            tracing::warn!(stage = %kind, error = %err, "collaborator unavailable, using fallback data");
            StageResult::fallback(fallback_for(kind), err.to_string())
        }
    }
}

pub(crate) fn boxed<S: Stage + 'static>(stage: S) -> Box<dyn Stage> {
    Box::new(stage)
}
