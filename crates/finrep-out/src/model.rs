//! Canonical report model
//!
//! The one structure all three artifacts are projected from. Built once from
//! the workflow context; map-typed fields are ordered so that serializing the
//! same model twice yields identical bytes.

use chrono::{DateTime, SecondsFormat, Utc};
use finrep_core::{
    CompanyProfile, ComplianceResult, ExtractionOutput, FinancialAnalysis, MarketAnalysis,
    QualityReview, RiskAnalysis, StageResult, WorkflowContext,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// File names of the three artifacts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactNames {
    pub html: String,
    pub txt: String,
    pub json: String,
}

impl ArtifactNames {
    pub fn for_report(report_id: &str) -> Self {
        Self {
            html: format!("{}.html", report_id),
            txt: format!("{}.txt", report_id),
            json: format!("{}.json", report_id),
        }
    }
}

/// Status of one stage plus its error message or fallback reason
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageOutcome {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<&StageResult> for StageOutcome {
    fn from(result: &StageResult) -> Self {
        Self {
            status: result.status().as_str().to_string(),
            message: result
                .error_message()
                .or_else(|| result.fallback_reason())
                .map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportModel {
    pub report_id: String,
    pub workflow_id: String,
    pub generated_at: String,
    pub company: CompanyProfile,
    pub executive_summary: String,
    /// Outcome per stage that ran before the report
    pub stages: BTreeMap<String, StageOutcome>,
    pub extraction: Option<ExtractionOutput>,
    pub financial_analysis: Option<FinancialAnalysis>,
    pub compliance: Option<ComplianceResult>,
    pub market: Option<MarketAnalysis>,
    pub risk: Option<RiskAnalysis>,
    pub quality: Option<QualityReview>,
    pub files: ArtifactNames,
}

impl ReportModel {
    pub fn from_context(
        ctx: &WorkflowContext,
        report_id: impl Into<String>,
        executive_summary: impl Into<String>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let report_id = report_id.into();
        let stages = ctx
            .iter()
            .map(|(kind, result)| (kind.as_str().to_string(), StageOutcome::from(result)))
            .collect();

        Self {
            files: ArtifactNames::for_report(&report_id),
            report_id,
            workflow_id: ctx.workflow_id.clone(),
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            company: ctx.company.clone(),
            executive_summary: executive_summary.into(),
            stages,
            extraction: ctx.extraction().cloned(),
            financial_analysis: ctx.financial_analysis().cloned(),
            compliance: ctx.compliance().cloned(),
            market: ctx.market().cloned(),
            risk: ctx.risk().cloned(),
            quality: ctx.quality().cloned(),
        }
    }
}
