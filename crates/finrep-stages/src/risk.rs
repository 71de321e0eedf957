use crate::prompts::RISK_TASK;
use crate::Collaborators;
use async_trait::async_trait;
use finrep_core::{
    analyze, FinrepError, RiskAnalysis, Stage, StageKind, StagePayload, StageResult,
    WorkflowContext,
};
use finrep_risk::RiskCalculator;

/// Stage 5: score compliance, ratios and sentiment on the 1-10 scale
pub struct RiskAssessmentStage {
    collaborators: Collaborators,
    calculator: RiskCalculator,
}

impl RiskAssessmentStage {
    pub fn new(collaborators: Collaborators) -> Self {
        Self {
            collaborators,
            calculator: RiskCalculator::default(),
        }
    }
}

#[async_trait]
impl Stage for RiskAssessmentStage {
    fn kind(&self) -> StageKind {
        StageKind::RiskAssessment
    }

    async fn run(&self, ctx: &WorkflowContext) -> Result<StageResult, FinrepError> {
        if !ctx.contains(StageKind::Compliance) {
            return Err(FinrepError::MissingStage(StageKind::Compliance));
        }
        let Some(compliance) = ctx.compliance() else {
            return Ok(StageResult::error("compliance result unavailable", None));
        };

        // Absent ratios or sentiment fall back to their neutral values
        let ratios = ctx
            .financial_analysis()
            .map(|a| a.ratios.clone())
            .unwrap_or_default();
        let sentiment = ctx
            .market()
            .map(|m| m.snapshot.sentiment)
            .unwrap_or_default();

        let assessment = self.calculator.calculate(&ratios, compliance, sentiment);
        tracing::info!(
            workflow_id = %ctx.workflow_id,
            risk_score = assessment.risk_score,
            risk_level = %assessment.risk_level,
            "risk assessed"
        );

        let data = format!(
            "Risk score: {}/10 ({})\nCompliance status: {}\nViolations: {}\nWarnings: {}\n\
             Net margin: {}\nDebt to equity: {}\nMarket sentiment: {}",
            assessment.risk_score,
            assessment.risk_level,
            compliance.status,
            assessment.risk_factors.compliance_issues,
            assessment.risk_factors.warnings_count,
            assessment.risk_factors.profitability,
            assessment.risk_factors.financial_leverage,
            assessment.risk_factors.market_sentiment,
        );
        let narrative = analyze(self.collaborators.reasoning.as_ref(), RISK_TASK, &data).await;

        Ok(StageResult::success(StagePayload::RiskAssessment(
            RiskAnalysis {
                assessment,
                narrative,
            },
        )))
    }
}
