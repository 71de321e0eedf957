use crate::prompts::EXTRACTION_TASK;
use crate::{recover, Collaborators};
use async_trait::async_trait;
use finrep_core::{
    analyze, FinancialStatements, FinrepError, Stage, StageKind, StagePayload, StageResult,
    WorkflowContext,
};
use finrep_tools::service::EXTRACT_FINANCIAL_DATA;
use finrep_tools::{ExtractionResponse, ServiceName};
use serde_json::json;

/// Stage 1: pull statements and disclosures out of the source documents
pub struct ExtractionStage {
    collaborators: Collaborators,
}

impl ExtractionStage {
    pub fn new(collaborators: Collaborators) -> Self {
        Self { collaborators }
    }
}

#[async_trait]
impl Stage for ExtractionStage {
    fn kind(&self) -> StageKind {
        StageKind::Extraction
    }

    async fn run(&self, ctx: &WorkflowContext) -> Result<StageResult, FinrepError> {
        let params = json!({
            "file_paths": ctx.documents,
            "extract_tables": true,
            "ocr_enabled": true,
            "language": "en",
        });

        let response = match self
            .collaborators
            .tools
            .invoke_as::<ExtractionResponse>(ServiceName::Document, EXTRACT_FINANCIAL_DATA, params)
            .await
        {
            Ok(response) => response,
            Err(e) => return Ok(recover(self.kind(), e)),
        };

        let insights = analyze(
            self.collaborators.reasoning.as_ref(),
            EXTRACTION_TASK,
            &statement_summary(&response.statements),
        )
        .await;

        let mut output = response.into_output(insights);
        if output.metadata.document_count == 0 {
            output.metadata.document_count = ctx.documents.len();
        }

        Ok(StageResult::success(StagePayload::Extraction(output)))
    }
}

pub(crate) fn statement_summary(statements: &FinancialStatements) -> String {
    let income = &statements.income;
    let balance = &statements.balance;
    format!(
        "Income Statement:\nRevenue: ${:.0}\nGross Profit: ${:.0}\nOperating Income: ${:.0}\n\
         Net Income: ${:.0}\n\nBalance Sheet:\nTotal Assets: ${:.0}\nTotal Liabilities: ${:.0}\n\
         Shareholders Equity: ${:.0}\nCash: ${:.0}\nReceivables: ${:.0}",
        income.revenue,
        income.gross_profit,
        income.operating_income,
        income.net_income,
        balance.assets,
        balance.liabilities,
        balance.equity,
        balance.cash,
        balance.receivables,
    )
}
