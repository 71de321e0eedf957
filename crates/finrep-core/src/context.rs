//! Workflow Context: state accumulated across one pipeline run
use crate::data_model::{
    CompanyProfile, ComplianceResult, ExtractionOutput, FinancialAnalysis, MarketAnalysis,
    QualityReview, ReportOutput, RiskAnalysis,
};
use crate::stage::{StageKind, StagePayload, StageResult};
use std::collections::BTreeMap;

/// Ordered record of stage results for a single run. Never shared between runs.
#[derive(Debug, Clone)]
pub struct WorkflowContext {
    pub run_id: String,
    pub workflow_id: String,
    pub company: CompanyProfile,
    pub documents: Vec<String>,
    results: BTreeMap<StageKind, StageResult>,
}

impl WorkflowContext {
    pub fn new(workflow_id: impl Into<String>, company: CompanyProfile, documents: Vec<String>) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            workflow_id: workflow_id.into(),
            company,
            documents,
            results: BTreeMap::new(),
        }
    }

    /// Store the result of a stage, replacing any earlier one for the same kind
    pub fn record(&mut self, kind: StageKind, result: StageResult) {
        self.results.insert(kind, result);
    }

    pub fn result(&self, kind: StageKind) -> Option<&StageResult> {
        self.results.get(&kind)
    }

    pub fn contains(&self, kind: StageKind) -> bool {
        self.results.contains_key(&kind)
    }

    pub fn results(&self) -> &BTreeMap<StageKind, StageResult> {
        &self.results
    }

    /// Results in stage order
    pub fn iter(&self) -> impl Iterator<Item = (StageKind, &StageResult)> {
        self.results.iter().map(|(k, v)| (*k, v))
    }

    pub fn into_results(self) -> BTreeMap<StageKind, StageResult> {
        self.results
    }

    fn payload(&self, kind: StageKind) -> Option<&StagePayload> {
        self.results.get(&kind).and_then(StageResult::payload)
    }

    pub fn extraction(&self) -> Option<&ExtractionOutput> {
        match self.payload(StageKind::Extraction) {
            Some(StagePayload::Extraction(p)) => Some(p),
            _ => None,
        }
    }

    pub fn financial_analysis(&self) -> Option<&FinancialAnalysis> {
        match self.payload(StageKind::FinancialAnalysis) {
            Some(StagePayload::FinancialAnalysis(p)) => Some(p),
            _ => None,
        }
    }

    pub fn compliance(&self) -> Option<&ComplianceResult> {
        match self.payload(StageKind::Compliance) {
            Some(StagePayload::Compliance(p)) => Some(p),
            _ => None,
        }
    }

    pub fn market(&self) -> Option<&MarketAnalysis> {
        match self.payload(StageKind::MarketContext) {
            Some(StagePayload::MarketContext(p)) => Some(p),
            _ => None,
        }
    }

    pub fn risk(&self) -> Option<&RiskAnalysis> {
        match self.payload(StageKind::RiskAssessment) {
            Some(StagePayload::RiskAssessment(p)) => Some(p),
            _ => None,
        }
    }

    pub fn quality(&self) -> Option<&QualityReview> {
        match self.payload(StageKind::QualityControl) {
            Some(StagePayload::QualityControl(p)) => Some(p),
            _ => None,
        }
    }

    pub fn report(&self) -> Option<&ReportOutput> {
        match self.payload(StageKind::ReportGeneration) {
            Some(StagePayload::ReportGeneration(p)) => Some(p),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_model::{ComplianceResult, ComplianceStatus};

    #[test]
    fn test_typed_accessors() {
        let mut ctx = WorkflowContext::new("WF-1", CompanyProfile::new("Acme", "Tech"), vec![]);
        assert!(ctx.compliance().is_none());

        let compliance = ComplianceResult {
            status: ComplianceStatus::Compliant,
            ..Default::default()
        };
        ctx.record(
            StageKind::Compliance,
            StageResult::success(StagePayload::Compliance(compliance)),
        );

        assert!(ctx.contains(StageKind::Compliance));
        assert!(ctx.compliance().unwrap().is_compliant());
        assert!(ctx.extraction().is_none());
    }

    #[test]
    fn test_error_without_partial_hides_payload() {
        let mut ctx = WorkflowContext::new("WF-1", CompanyProfile::default(), vec![]);
        ctx.record(StageKind::Compliance, StageResult::error("offline", None));
        assert!(ctx.contains(StageKind::Compliance));
        assert!(ctx.compliance().is_none());
    }

    #[test]
    fn test_runs_get_distinct_ids() {
        let a = WorkflowContext::new("WF-1", CompanyProfile::default(), vec![]);
        let b = WorkflowContext::new("WF-1", CompanyProfile::default(), vec![]);
        assert_ne!(a.run_id, b.run_id);
    }
}
