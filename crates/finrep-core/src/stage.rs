//! Stage Trait: single contract for the seven workflow steps
use crate::context::WorkflowContext;
use crate::data_model::{
    ComplianceResult, ExtractionOutput, FinancialAnalysis, MarketAnalysis, QualityReview,
    ReportOutput, RiskAnalysis,
};
use crate::error::FinrepError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The seven fixed steps, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Extraction,
    FinancialAnalysis,
    Compliance,
    MarketContext,
    RiskAssessment,
    QualityControl,
    ReportGeneration,
}

impl StageKind {
    /// Canonical execution order
    pub const ALL: [StageKind; 7] = [
        StageKind::Extraction,
        StageKind::FinancialAnalysis,
        StageKind::Compliance,
        StageKind::MarketContext,
        StageKind::RiskAssessment,
        StageKind::QualityControl,
        StageKind::ReportGeneration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StageKind::Extraction => "extraction",
            StageKind::FinancialAnalysis => "financial_analysis",
            StageKind::Compliance => "compliance",
            StageKind::MarketContext => "market_context",
            StageKind::RiskAssessment => "risk_assessment",
            StageKind::QualityControl => "quality_control",
            StageKind::ReportGeneration => "report_generation",
        }
    }

    /// The stage that follows this one, `None` after report generation
    pub fn next(&self) -> Option<StageKind> {
        let idx = StageKind::ALL.iter().position(|k| k == self)?;
        StageKind::ALL.get(idx + 1).copied()
    }
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed payload, one variant per stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StagePayload {
    Extraction(ExtractionOutput),
    FinancialAnalysis(FinancialAnalysis),
    Compliance(ComplianceResult),
    MarketContext(MarketAnalysis),
    RiskAssessment(RiskAnalysis),
    QualityControl(QualityReview),
    ReportGeneration(ReportOutput),
}

impl StagePayload {
    pub fn kind(&self) -> StageKind {
        match self {
            StagePayload::Extraction(_) => StageKind::Extraction,
            StagePayload::FinancialAnalysis(_) => StageKind::FinancialAnalysis,
            StagePayload::Compliance(_) => StageKind::Compliance,
            StagePayload::MarketContext(_) => StageKind::MarketContext,
            StagePayload::RiskAssessment(_) => StageKind::RiskAssessment,
            StagePayload::QualityControl(_) => StageKind::QualityControl,
            StagePayload::ReportGeneration(_) => StageKind::ReportGeneration,
        }
    }
}

/// Outcome of one stage. Every stage yields exactly one of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageResult {
    Success {
        payload: StagePayload,
        /// Why a fallback payload replaced the collaborator response
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fallback: Option<String>,
    },
    Error {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        partial: Option<StagePayload>,
    },
}

impl StageResult {
    pub fn success(payload: StagePayload) -> Self {
        StageResult::Success {
            payload,
            fallback: None,
        }
    }

    pub fn fallback(payload: StagePayload, reason: impl Into<String>) -> Self {
        StageResult::Success {
            payload,
            fallback: Some(reason.into()),
        }
    }

    pub fn error(message: impl Into<String>, partial: Option<StagePayload>) -> Self {
        StageResult::Error {
            message: message.into(),
            partial,
        }
    }

    /// The payload downstream stages should read, if any
    pub fn payload(&self) -> Option<&StagePayload> {
        match self {
            StageResult::Success { payload, .. } => Some(payload),
            StageResult::Error { partial, .. } => partial.as_ref(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, StageResult::Error { .. })
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            StageResult::Error { message, .. } => Some(message),
            StageResult::Success { .. } => None,
        }
    }

    /// Why the payload came from fallback data, if it did
    pub fn fallback_reason(&self) -> Option<&str> {
        match self {
            StageResult::Success { fallback, .. } => fallback.as_deref(),
            StageResult::Error { .. } => None,
        }
    }

    pub fn status(&self) -> StageStatus {
        match self {
            StageResult::Success { fallback: None, .. } => StageStatus::Completed,
            StageResult::Success { fallback: Some(_), .. } => StageStatus::Degraded,
            StageResult::Error { .. } => StageStatus::Error,
        }
    }
}

/// Per-stage status recorded in the envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Completed,
    /// Completed on fallback data
    Degraded,
    Error,
}

impl StageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageStatus::Completed => "completed",
            StageStatus::Degraded => "degraded",
            StageStatus::Error => "error",
        }
    }
}

/// Contract for one workflow step.
///
/// `Ok` is returned for every designed outcome, including collaborator
/// failures. `Err` means the stage could not even run (a wiring defect) and
/// aborts the workflow.
#[async_trait]
pub trait Stage: Send + Sync {
    fn kind(&self) -> StageKind;

    async fn run(&self, ctx: &WorkflowContext) -> Result<StageResult, FinrepError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_model::ComplianceResult;

    #[test]
    fn test_stage_order() {
        assert_eq!(StageKind::Extraction.next(), Some(StageKind::FinancialAnalysis));
        assert_eq!(StageKind::ReportGeneration.next(), None);
        assert!(StageKind::Compliance < StageKind::MarketContext);
    }

    #[test]
    fn test_status_from_result() {
        let payload = StagePayload::Compliance(ComplianceResult::default());
        assert_eq!(StageResult::success(payload.clone()).status(), StageStatus::Completed);
        assert_eq!(
            StageResult::fallback(payload.clone(), "offline").status(),
            StageStatus::Degraded
        );
        assert_eq!(
            StageResult::fallback(payload.clone(), "offline").fallback_reason(),
            Some("offline")
        );
        let err = StageResult::error("bad shape", Some(payload));
        assert_eq!(err.status(), StageStatus::Error);
        assert!(err.payload().is_some());
        assert_eq!(err.fallback_reason(), None);
        assert_eq!(err.error_message(), Some("bad shape"));
    }

    #[test]
    fn test_result_serializes_with_tags() {
        let result = StageResult::error("boom", None);
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["message"], "boom");
        assert!(value.get("partial").is_none());

        let ok = StageResult::success(StagePayload::Compliance(ComplianceResult::default()));
        let value = serde_json::to_value(&ok).unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["payload"]["kind"], "compliance");
    }
}
