use crate::extraction::statement_summary;
use crate::prompts::ANALYSIS_TASK;
use crate::Collaborators;
use async_trait::async_trait;
use finrep_core::{
    analyze, FinancialAnalysis, FinrepError, RatioSet, Stage, StageKind, StagePayload,
    StageResult, WorkflowContext,
};
use finrep_risk::compute_ratios;

/// Stage 2: ratios from the extracted statements, plus a narrative
pub struct FinancialAnalysisStage {
    collaborators: Collaborators,
}

impl FinancialAnalysisStage {
    pub fn new(collaborators: Collaborators) -> Self {
        Self { collaborators }
    }
}

#[async_trait]
impl Stage for FinancialAnalysisStage {
    fn kind(&self) -> StageKind {
        StageKind::FinancialAnalysis
    }

    async fn run(&self, ctx: &WorkflowContext) -> Result<StageResult, FinrepError> {
        if !ctx.contains(StageKind::Extraction) {
            return Err(FinrepError::MissingStage(StageKind::Extraction));
        }
        let Some(extraction) = ctx.extraction() else {
            return Ok(StageResult::error("extraction result unavailable", None));
        };
        let statements = &extraction.financial_statements;

        let ratios = compute_ratios(&statements.income, &statements.balance);
        let data = format!(
            "{}\n\nComputed ratios:\n{}",
            statement_summary(statements),
            ratio_summary(&ratios)
        );
        let narrative = analyze(self.collaborators.reasoning.as_ref(), ANALYSIS_TASK, &data).await;

        Ok(StageResult::success(StagePayload::FinancialAnalysis(
            FinancialAnalysis { ratios, narrative },
        )))
    }
}

fn ratio_summary(ratios: &RatioSet) -> String {
    let show = |v: Option<f64>| v.map(|x| format!("{}", x)).unwrap_or_else(|| "N/A".to_string());
    format!(
        "Net Margin: {}\nReturn on Assets: {}\nReturn on Equity: {}\nCurrent Ratio: {}\nDebt to Equity: {}",
        show(ratios.profitability.net_margin),
        show(ratios.profitability.return_on_assets),
        show(ratios.profitability.return_on_equity),
        show(ratios.liquidity.current_ratio),
        show(ratios.leverage.debt_to_equity),
    )
}
