//! Quality review of a workflow context
//!
//! Walks the recorded stage results and derives a confidence score. Each
//! finding becomes a `Finding` carrying its penalty; the report keeps the
//! messages in the order they were found.

use crate::policy::ConfidencePolicy;
use finrep_core::{QualityReport, StageKind, WorkflowContext};

/// A single issue found during review
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub stage: StageKind,
    pub message: String,
    pub penalty: f64,
}

/// Applies a `ConfidencePolicy` to a context
#[derive(Debug, Clone, Default)]
pub struct QualityEngine {
    policy: ConfidencePolicy,
}

impl QualityEngine {
    pub fn new(policy: ConfidencePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ConfidencePolicy {
        &self.policy
    }

    /// Collect findings in stage order
    pub fn findings(&self, ctx: &WorkflowContext) -> Vec<Finding> {
        let mut findings = Vec::new();

        for (stage, result) in ctx.iter() {
            if let Some(message) = result.error_message() {
                findings.push(Finding {
                    stage,
                    message: format!("Error in {}: {}", stage, message),
                    penalty: self.policy.error_penalty,
                });
            }
        }

        if ctx.contains(StageKind::RiskAssessment) && ctx.risk().is_none() {
            findings.push(Finding {
                stage: StageKind::RiskAssessment,
                message: "Missing risk score".to_string(),
                penalty: self.policy.missing_field_penalty,
            });
        }

        if ctx.contains(StageKind::Compliance) && ctx.compliance().is_none() {
            findings.push(Finding {
                stage: StageKind::Compliance,
                message: "Missing compliance status".to_string(),
                penalty: self.policy.missing_field_penalty,
            });
        }

        findings
    }

    pub fn review(&self, ctx: &WorkflowContext) -> QualityReport {
        let findings = self.findings(ctx);
        let penalty: f64 = findings.iter().map(|f| f.penalty).sum();
        let confidence = (self.policy.start - penalty).max(self.policy.floor);
        let confidence_score = (confidence * 100.0).round() / 100.0;

        tracing::debug!(
            workflow_id = %ctx.workflow_id,
            issues = findings.len(),
            confidence_score,
            "quality review complete"
        );

        QualityReport {
            passed: findings.is_empty(),
            issues: findings.into_iter().map(|f| f.message).collect(),
            confidence_score,
        }
    }
}

/// Review with the default policy
pub fn review(ctx: &WorkflowContext) -> QualityReport {
    QualityEngine::default().review(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use finrep_core::{
        CompanyProfile, ComplianceResult, RiskAnalysis, RiskAssessment, RiskFactors, RiskLevel,
        StagePayload, StageResult,
    };

    fn ctx() -> WorkflowContext {
        WorkflowContext::new("FINWF-TEST", CompanyProfile::new("Acme", "Technology"), vec![])
    }

    fn risk_ok() -> StageResult {
        StageResult::success(StagePayload::RiskAssessment(RiskAnalysis {
            assessment: RiskAssessment {
                risk_score: 5.0,
                risk_level: RiskLevel::Medium,
                risk_factors: RiskFactors::default(),
                adjustments: vec![],
                recommendations: vec![],
            },
            narrative: String::new(),
        }))
    }

    fn compliance_ok() -> StageResult {
        StageResult::success(StagePayload::Compliance(ComplianceResult::default()))
    }

    #[test]
    fn test_clean_run_passes() {
        let mut ctx = ctx();
        ctx.record(StageKind::Compliance, compliance_ok());
        ctx.record(StageKind::RiskAssessment, risk_ok());

        let report = review(&ctx);
        assert!(report.passed);
        assert!(report.issues.is_empty());
        assert_eq!(report.confidence_score, 0.95);
    }

    #[test]
    fn test_empty_context_passes() {
        let report = review(&ctx());
        assert!(report.passed);
        assert_eq!(report.confidence_score, 0.95);
    }

    #[test]
    fn test_one_error_costs_ten_points() {
        let mut ctx = ctx();
        ctx.record(StageKind::MarketContext, StageResult::error("timeout", None));

        let report = review(&ctx);
        assert!(!report.passed);
        assert_eq!(report.issues, vec!["Error in market_context: timeout".to_string()]);
        assert_eq!(report.confidence_score, 0.85);
    }

    #[test]
    fn test_missing_fields_are_flagged() {
        let mut ctx = ctx();
        ctx.record(StageKind::Compliance, StageResult::error("down", None));
        ctx.record(StageKind::RiskAssessment, StageResult::error("bad input", None));

        let report = review(&ctx);
        assert_eq!(
            report.issues,
            vec![
                "Error in compliance: down".to_string(),
                "Error in risk_assessment: bad input".to_string(),
                "Missing risk score".to_string(),
                "Missing compliance status".to_string(),
            ]
        );
        // 0.95 - 0.20 - 0.10
        assert_eq!(report.confidence_score, 0.65);
    }

    #[test]
    fn test_partial_payload_counts_as_present() {
        let mut ctx = ctx();
        ctx.record(
            StageKind::Compliance,
            StageResult::error(
                "malformed response",
                Some(StagePayload::Compliance(ComplianceResult::default())),
            ),
        );

        let report = review(&ctx);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.confidence_score, 0.85);
    }

    #[test]
    fn test_confidence_floor() {
        let mut ctx = ctx();
        for stage in StageKind::ALL {
            ctx.record(stage, StageResult::error("down", None));
        }

        let report = review(&ctx);
        assert_eq!(report.issues.len(), StageKind::ALL.len() + 2);
        assert_eq!(report.confidence_score, 0.5);
    }

    #[test]
    fn test_confidence_never_rises_with_more_errors() {
        let mut previous = f64::INFINITY;
        for errors in 0..=StageKind::ALL.len() {
            let mut ctx = ctx();
            for stage in StageKind::ALL.into_iter().take(errors) {
                ctx.record(stage, StageResult::error("down", None));
            }

            let confidence = review(&ctx).confidence_score;
            assert!(confidence <= previous, "{} errors raised confidence", errors);
            assert!(confidence >= 0.5, "{} errors went below the floor", errors);
            assert!((0.0..=1.0).contains(&confidence));
            previous = confidence;
        }
        assert_eq!(previous, 0.5);
    }

    #[test]
    fn test_custom_policy() {
        let engine = QualityEngine::new(ConfidencePolicy {
            error_penalty: 0.25,
            ..Default::default()
        });
        let mut ctx = ctx();
        ctx.record(StageKind::Extraction, StageResult::error("ocr failed", None));

        assert_eq!(engine.review(&ctx).confidence_score, 0.7);
        assert_eq!(engine.findings(&ctx)[0].stage, StageKind::Extraction);
    }
}
