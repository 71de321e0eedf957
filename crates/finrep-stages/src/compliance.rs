use crate::{recover, Collaborators};
use async_trait::async_trait;
use finrep_core::{
    ComplianceResult, FinrepError, Stage, StageKind, StagePayload, StageResult, WorkflowContext,
};
use finrep_tools::service::CHECK_REGULATORY_COMPLIANCE;
use finrep_tools::{ComplianceResponse, ServiceName};
use serde_json::json;

const REGULATIONS: [&str; 4] = ["SEC", "SOX", "IFRS", "GAAP"];
const JURISDICTION: &str = "US";

/// Stage 3: regulatory compliance check
pub struct ComplianceStage {
    collaborators: Collaborators,
}

impl ComplianceStage {
    pub fn new(collaborators: Collaborators) -> Self {
        Self { collaborators }
    }
}

#[async_trait]
impl Stage for ComplianceStage {
    fn kind(&self) -> StageKind {
        StageKind::Compliance
    }

    async fn run(&self, ctx: &WorkflowContext) -> Result<StageResult, FinrepError> {
        let params = json!({
            "document_data": ctx.extraction(),
            "analysis_results": ctx.financial_analysis().map(|a| &a.ratios),
            "regulations": REGULATIONS,
            "jurisdiction": JURISDICTION,
        });

        match self
            .collaborators
            .tools
            .invoke_as::<ComplianceResponse>(
                ServiceName::Compliance,
                CHECK_REGULATORY_COMPLIANCE,
                params,
            )
            .await
        {
            Ok(response) => Ok(StageResult::success(StagePayload::Compliance(
                ComplianceResult::from(response),
            ))),
            Err(e) => Ok(recover(self.kind(), e)),
        }
    }
}
