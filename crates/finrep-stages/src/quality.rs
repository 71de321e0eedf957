use crate::prompts::QUALITY_TASK;
use crate::Collaborators;
use async_trait::async_trait;
use finrep_core::{
    analyze, FinrepError, QualityReview, Stage, StageKind, StagePayload, StageResult,
    WorkflowContext,
};
use finrep_quality::QualityEngine;

/// Stage 6: confidence score over everything recorded so far
pub struct QualityControlStage {
    collaborators: Collaborators,
    engine: QualityEngine,
}

impl QualityControlStage {
    pub fn new(collaborators: Collaborators) -> Self {
        Self::with_engine(collaborators, QualityEngine::default())
    }

    pub fn with_engine(collaborators: Collaborators, engine: QualityEngine) -> Self {
        Self {
            collaborators,
            engine,
        }
    }
}

#[async_trait]
impl Stage for QualityControlStage {
    fn kind(&self) -> StageKind {
        StageKind::QualityControl
    }

    async fn run(&self, ctx: &WorkflowContext) -> Result<StageResult, FinrepError> {
        let report = self.engine.review(ctx);

        let sections: Vec<&str> = ctx.iter().map(|(kind, _)| kind.as_str()).collect();
        let data = format!(
            "Sections: {}\nIssues found: {}\n{}",
            sections.join(", "),
            report.issues.len(),
            report.issues.join("\n"),
        );
        let narrative = analyze(self.collaborators.reasoning.as_ref(), QUALITY_TASK, &data).await;

        Ok(StageResult::success(StagePayload::QualityControl(
            QualityReview { report, narrative },
        )))
    }
}
