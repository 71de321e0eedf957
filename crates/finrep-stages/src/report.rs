use crate::prompts::SUMMARY_TASK;
use crate::Collaborators;
use async_trait::async_trait;
use chrono::Utc;
use finrep_core::{
    analyze, generate_report_id, FinrepError, ReportOutput, Stage, StageKind, StagePayload,
    StageResult, WorkflowContext,
};
use finrep_out::{minimal_document, persist, render, RenderedReport, ReportModel};
use finrep_tools::service::GENERATE_FINANCIAL_REPORT;
use finrep_tools::{PublishedReport, ServiceName};
use serde_json::json;
use std::path::PathBuf;

const REPORT_FORMAT: &str = "html";
const REPORT_TEMPLATE: &str = "professional";

/// Stage 7: executive summary, local artifacts, then publication
pub struct ReportGenerationStage {
    collaborators: Collaborators,
    reports_dir: PathBuf,
}

impl ReportGenerationStage {
    pub fn new(collaborators: Collaborators, reports_dir: impl Into<PathBuf>) -> Self {
        Self {
            collaborators,
            reports_dir: reports_dir.into(),
        }
    }
}

#[async_trait]
impl Stage for ReportGenerationStage {
    fn kind(&self) -> StageKind {
        StageKind::ReportGeneration
    }

    async fn run(&self, ctx: &WorkflowContext) -> Result<StageResult, FinrepError> {
        let executive_summary = analyze(
            self.collaborators.reasoning.as_ref(),
            SUMMARY_TASK,
            &key_findings(ctx),
        )
        .await;

        let generated_at = Utc::now();
        let report_id = generate_report_id(generated_at);
        let model = ReportModel::from_context(ctx, &report_id, &executive_summary, generated_at);

        let mut degraded: Vec<String> = Vec::new();
        let rendered = match render(&model) {
            Ok(rendered) => rendered,
            Err(e) => {
                tracing::error!(%report_id, error = %e, "report templates failed, writing minimal report");
                degraded.push(format!("render: {}", e));
                let data = serde_json::to_string_pretty(&model)?;
                RenderedReport {
                    report_id: report_id.clone(),
                    document: minimal_document(&report_id, &data),
                    text: data.clone(),
                    data,
                }
            }
        };

        let mut reference = persist(&rendered, &self.reports_dir);
        if let Some(note) = &reference.degraded {
            degraded.push(note.clone());
        }

        let params = json!({
            "analyses": serde_json::to_value(&model)?,
            "executive_summary": executive_summary,
            "format": REPORT_FORMAT,
            "template": REPORT_TEMPLATE,
            "report_id": report_id,
        });
        match self
            .collaborators
            .tools
            .invoke_as::<PublishedReport>(ServiceName::Reporting, GENERATE_FINANCIAL_REPORT, params)
            .await
        {
            Ok(published) => reference.remote_url = published.report_url,
            Err(e) => {
                tracing::warn!(%report_id, error = %e, "report not published, local artifacts kept");
                degraded.push(format!("publish: {}", e));
            }
        }

        let payload = StagePayload::ReportGeneration(ReportOutput {
            reference,
            executive_summary,
            generated_at,
        });

        if degraded.is_empty() {
            Ok(StageResult::success(payload))
        } else {
            Ok(StageResult::fallback(payload, degraded.join("; ")))
        }
    }
}

fn key_findings(ctx: &WorkflowContext) -> String {
    let risk = ctx
        .risk()
        .map(|r| format!("{}/10 ({})", r.assessment.risk_score, r.assessment.risk_level))
        .unwrap_or_else(|| "N/A".to_string());
    let compliance = ctx
        .compliance()
        .map(|c| c.status.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let confidence = ctx
        .quality()
        .map(|q| format!("{:.1}%", q.report.confidence_score * 100.0))
        .unwrap_or_else(|| "N/A".to_string());
    let net_margin = ctx
        .financial_analysis()
        .and_then(|a| a.ratios.profitability.net_margin)
        .map(|m| format!("{:.1}%", m * 100.0))
        .unwrap_or_else(|| "N/A".to_string());

    format!(
        "Company: {}\nRisk Score: {}\nCompliance: {}\nNet Margin: {}\nConfidence: {}",
        ctx.company.name, risk, compliance, net_margin, confidence
    )
}
