//! Workflow facade: wires the seven stages into a runner and starts runs
use crate::{
    boxed, Collaborators, ComplianceStage, ExtractionStage, FinancialAnalysisStage,
    MarketContextStage, QualityControlStage, ReportGenerationStage, RiskAssessmentStage,
};
use chrono::Utc;
use finrep_core::{
    generate_workflow_id, CompanyProfile, EventSink, FinrepError, PipelineRunner, Stage,
    WorkflowContext, WorkflowEnvelope, DEFAULT_WORKFLOW_PREFIX,
};
use std::path::PathBuf;
use std::sync::Arc;

/// Where artifacts go and how runs are named
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowSettings {
    pub reports_dir: PathBuf,
    pub workflow_prefix: String,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            reports_dir: PathBuf::from("./generated_reports"),
            workflow_prefix: DEFAULT_WORKFLOW_PREFIX.to_string(),
        }
    }
}

/// The seven stages in canonical order
pub fn standard_stages(
    collaborators: &Collaborators,
    settings: &WorkflowSettings,
) -> Vec<Box<dyn Stage>> {
    vec![
        boxed(ExtractionStage::new(collaborators.clone())),
        boxed(FinancialAnalysisStage::new(collaborators.clone())),
        boxed(ComplianceStage::new(collaborators.clone())),
        boxed(MarketContextStage::new(collaborators.clone())),
        boxed(RiskAssessmentStage::new(collaborators.clone())),
        boxed(QualityControlStage::new(collaborators.clone())),
        boxed(ReportGenerationStage::new(
            collaborators.clone(),
            settings.reports_dir.clone(),
        )),
    ]
}

/// Runs the full financial analysis workflow. Safe to share across tasks.
pub struct FinancialWorkflow {
    runner: PipelineRunner,
    prefix: String,
}

impl FinancialWorkflow {
    pub fn new(collaborators: Collaborators, settings: WorkflowSettings) -> Result<Self, FinrepError> {
        let runner = PipelineRunner::new(standard_stages(&collaborators, &settings))?;
        Ok(Self {
            runner,
            prefix: settings.workflow_prefix,
        })
    }

    /// Forward pipeline events to `sink` as well as the tracing log
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.runner = self.runner.with_sink(sink);
        self
    }

    pub fn pipeline_id(&self) -> &str {
        self.runner.pipeline_id()
    }

    /// Process `documents` for `company`. Always returns an envelope.
    pub async fn execute(&self, documents: Vec<String>, company: CompanyProfile) -> WorkflowEnvelope {
        let workflow_id = generate_workflow_id(&self.prefix, Utc::now());
        tracing::info!(%workflow_id, company = %company.name, documents = documents.len(), "starting workflow");
        let ctx = WorkflowContext::new(workflow_id, company, documents);
        self.runner.run(ctx).await
    }
}
