//! End-to-end workflow runs against in-process services.

use async_trait::async_trait;
use finrep_core::{
    ChannelEventSink, ChatMessage, CompanyProfile, FinrepError, PipelineEvent, PipelineRunner,
    ReasoningError, ReasoningService, RiskLevel, Stage, StageKind, StagePayload, StageResult,
    StageStatus, WorkflowContext, WorkflowStatus,
};
use finrep_stages::{
    Collaborators, FinancialAnalysisStage, FinancialWorkflow, QualityControlStage,
    RiskAssessmentStage, WorkflowSettings,
};
use finrep_tools::{ServiceName, ToolError, ToolInvoker, ToolTransport};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Answers each tool from a fixed table; anything else is unreachable
#[derive(Default)]
struct FakeServices {
    replies: HashMap<&'static str, Value>,
    calls: Mutex<Vec<String>>,
}

impl FakeServices {
    fn reply(mut self, tool: &'static str, value: Value) -> Self {
        self.replies.insert(tool, value);
        self
    }

    fn healthy() -> Self {
        Self::default()
            .reply(
                "extract_financial_data",
                json!({
                    "status": "success",
                    "statements": {
                        "income": {"revenue": 10_500_000.0, "net_income": 2_600_000.0},
                        "balance": {
                            "assets": 15_200_000.0,
                            "liabilities": 7_000_000.0,
                            "equity": 8_200_000.0,
                            "cash": 2_500_000.0,
                            "receivables": 1_800_000.0
                        }
                    },
                    "disclosures": ["Note 1"],
                    "metadata": {"pages": 12, "language": "en"},
                    "confidence": 0.97
                }),
            )
            .reply(
                "check_regulatory_compliance",
                json!({
                    "status": "non_compliant",
                    "violations": ["Missing auditor signature"],
                    "warnings": ["Thin risk disclosure", "Late filing"],
                    "regulations_checked": ["SEC", "SOX"],
                    "compliance_score": 0.6
                }),
            )
            .reply(
                "get_market_context",
                json!({"status": "success", "sentiment": "bearish"}),
            )
            .reply(
                "generate_financial_report",
                json!({"status": "success", "report_url": "https://reports.example/r/1"}),
            )
    }

    fn called(&self, tool: &str) -> bool {
        self.calls.lock().unwrap().iter().any(|c| c == tool)
    }
}

#[async_trait]
impl ToolTransport for FakeServices {
    async fn call(
        &self,
        service: ServiceName,
        tool_name: &str,
        _parameters: &Value,
    ) -> Result<Value, ToolError> {
        self.calls.lock().unwrap().push(tool_name.to_string());
        self.replies
            .get(tool_name)
            .cloned()
            .ok_or_else(|| ToolError::Transport {
                service,
                message: "connection refused".to_string(),
            })
    }
}

struct Narrator;

#[async_trait]
impl ReasoningService for Narrator {
    async fn complete(
        &self,
        _messages: &[ChatMessage],
        _temperature: f32,
        _max_tokens: u32,
    ) -> Result<String, ReasoningError> {
        Ok("Looks fine.".to_string())
    }
}

struct Silent;

#[async_trait]
impl ReasoningService for Silent {
    async fn complete(
        &self,
        _messages: &[ChatMessage],
        _temperature: f32,
        _max_tokens: u32,
    ) -> Result<String, ReasoningError> {
        Err(ReasoningError::Transport("dns failure".to_string()))
    }
}

fn collaborators(services: Arc<FakeServices>, reasoning: Arc<dyn ReasoningService>) -> Collaborators {
    Collaborators::new(Arc::new(ToolInvoker::new(services)), reasoning)
}

fn workflow(collab: Collaborators, dir: &std::path::Path) -> FinancialWorkflow {
    FinancialWorkflow::new(
        collab,
        WorkflowSettings {
            reports_dir: dir.to_path_buf(),
            workflow_prefix: "TEST".to_string(),
        },
    )
    .unwrap()
}

fn acme() -> CompanyProfile {
    CompanyProfile {
        name: "Acme Corp".to_string(),
        tickers: vec!["ACME".to_string()],
        sector: "Technology".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_healthy_services_complete_every_stage() {
    let dir = tempfile::tempdir().unwrap();
    let services = Arc::new(FakeServices::healthy());
    let wf = workflow(collaborators(services.clone(), Arc::new(Narrator)), dir.path());

    let envelope = wf
        .execute(vec!["annual_report.pdf".to_string()], acme())
        .await;

    assert_eq!(envelope.status, WorkflowStatus::Completed);
    assert!(envelope.workflow_id.starts_with("TEST-"));
    assert_eq!(envelope.stages.len(), 7);
    assert!(envelope
        .stage_status
        .values()
        .all(|s| *s == StageStatus::Completed));

    // 5 + 2 (non-compliant) + 1.5 + 1.0 (warnings) + 1 (bearish), clamped
    let risk = match envelope.result(StageKind::RiskAssessment).and_then(StageResult::payload) {
        Some(StagePayload::RiskAssessment(r)) => r.clone(),
        other => panic!("unexpected risk payload: {:?}", other),
    };
    assert_eq!(risk.assessment.risk_score, 10.0);
    assert_eq!(risk.assessment.risk_level, RiskLevel::High);
    assert_eq!(risk.narrative, "Looks fine.");

    let quality = match envelope.result(StageKind::QualityControl).and_then(StageResult::payload) {
        Some(StagePayload::QualityControl(q)) => q.clone(),
        other => panic!("unexpected quality payload: {:?}", other),
    };
    assert_eq!(quality.report.confidence_score, 0.95);
    assert!(quality.report.passed);
    assert!(quality.report.issues.is_empty());

    let report = envelope.report.clone().unwrap();
    assert!(report.url.starts_with("file://"));
    assert_eq!(report.remote_url.as_deref(), Some("https://reports.example/r/1"));
    assert!(report.degraded.is_none());
    for path in [&report.html_path, &report.txt_path, &report.json_path] {
        assert!(std::path::Path::new(path.as_ref().unwrap()).exists());
    }
    assert!(services.called("generate_financial_report"));
}

#[tokio::test]
async fn test_unreachable_services_degrade_to_fallbacks() {
    let dir = tempfile::tempdir().unwrap();
    let services = Arc::new(FakeServices::default());
    let wf = workflow(collaborators(services, Arc::new(Narrator)), dir.path());

    let envelope = wf.execute(vec![], acme()).await;

    assert_eq!(envelope.status, WorkflowStatus::Completed);
    assert!(envelope.error.is_none());
    for kind in [
        StageKind::Extraction,
        StageKind::Compliance,
        StageKind::MarketContext,
        StageKind::ReportGeneration,
    ] {
        assert_eq!(envelope.stage_status[&kind], StageStatus::Degraded, "{}", kind);
    }
    assert_eq!(
        envelope.stage_status[&StageKind::FinancialAnalysis],
        StageStatus::Completed
    );

    // Fallback data: compliant with two warnings, bullish market
    let risk = match envelope.result(StageKind::RiskAssessment).and_then(StageResult::payload) {
        Some(StagePayload::RiskAssessment(r)) => r.assessment.clone(),
        other => panic!("unexpected risk payload: {:?}", other),
    };
    assert_eq!(risk.risk_score, 5.0);
    assert_eq!(risk.risk_level, RiskLevel::Medium);

    let report = envelope.report.unwrap();
    assert!(report.remote_url.is_none());
    assert!(report.html_path.is_some());
}

#[tokio::test]
async fn test_malformed_response_records_error_with_partial() {
    let dir = tempfile::tempdir().unwrap();
    let services = Arc::new(FakeServices::healthy().reply(
        "extract_financial_data",
        json!({"status": "success", "statements": "not a table"}),
    ));
    let wf = workflow(collaborators(services, Arc::new(Narrator)), dir.path());

    let envelope = wf.execute(vec!["broken.pdf".to_string()], acme()).await;

    assert_eq!(envelope.status, WorkflowStatus::Completed);
    let extraction = envelope.result(StageKind::Extraction).unwrap();
    assert_eq!(extraction.status(), StageStatus::Error);
    assert!(matches!(
        extraction.payload(),
        Some(StagePayload::Extraction(_))
    ));

    // Analysis still ran on the partial payload
    assert_eq!(
        envelope.stage_status[&StageKind::FinancialAnalysis],
        StageStatus::Completed
    );

    let quality = match envelope.result(StageKind::QualityControl).and_then(StageResult::payload) {
        Some(StagePayload::QualityControl(q)) => q.report.clone(),
        other => panic!("unexpected quality payload: {:?}", other),
    };
    assert!(!quality.passed);
    assert_eq!(quality.confidence_score, 0.85);
    assert!(quality.issues[0].starts_with("Error in extraction:"));
}

#[tokio::test]
async fn test_reasoning_failure_is_embedded_in_narratives() {
    let dir = tempfile::tempdir().unwrap();
    let services = Arc::new(FakeServices::healthy());
    let wf = workflow(collaborators(services, Arc::new(Silent)), dir.path());

    let envelope = wf.execute(vec![], acme()).await;

    assert_eq!(envelope.status, WorkflowStatus::Completed);
    match envelope.result(StageKind::FinancialAnalysis).and_then(StageResult::payload) {
        Some(StagePayload::FinancialAnalysis(a)) => {
            assert!(a.narrative.starts_with("Error: "));
            assert!(a.ratios.profitability.net_margin.is_some());
        }
        other => panic!("unexpected analysis payload: {:?}", other),
    }
    match envelope.result(StageKind::ReportGeneration).and_then(StageResult::payload) {
        Some(StagePayload::ReportGeneration(r)) => {
            assert!(r.executive_summary.starts_with("Error: "))
        }
        other => panic!("unexpected report payload: {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_extraction_fails_the_run() {
    let services = Arc::new(FakeServices::healthy());
    let collab = collaborators(services, Arc::new(Narrator));
    let runner = PipelineRunner::new(vec![
        Box::new(FinancialAnalysisStage::new(collab.clone())) as Box<dyn Stage>,
        Box::new(RiskAssessmentStage::new(collab)),
    ])
    .unwrap();

    let ctx = WorkflowContext::new("TEST-1", acme(), vec![]);
    let envelope = runner.run(ctx).await;

    assert_eq!(envelope.status, WorkflowStatus::Failed);
    assert!(envelope
        .error
        .as_deref()
        .unwrap()
        .contains(&FinrepError::MissingStage(StageKind::Extraction).to_string()));
    assert!(envelope.results.is_empty());
    assert!(envelope.report.is_none());
}

#[tokio::test]
async fn test_risk_without_compliance_payload_is_a_stage_error() {
    let services = Arc::new(FakeServices::healthy());
    let collab = collaborators(services, Arc::new(Narrator));
    let stage = RiskAssessmentStage::new(collab.clone());

    let mut ctx = WorkflowContext::new("TEST-2", acme(), vec![]);
    ctx.record(StageKind::Compliance, StageResult::error("service exploded", None));

    let result = stage.run(&ctx).await.unwrap();
    assert_eq!(result.status(), StageStatus::Error);
    ctx.record(StageKind::RiskAssessment, result);

    let quality = QualityControlStage::new(collab).run(&ctx).await.unwrap();
    match quality.payload() {
        Some(StagePayload::QualityControl(q)) => {
            assert!(!q.report.passed);
            assert!(q.report.issues.contains(&"Missing risk score".to_string()));
            assert!(q
                .report
                .issues
                .contains(&"Missing compliance status".to_string()));
        }
        other => panic!("unexpected quality payload: {:?}", other),
    }
}

#[tokio::test]
async fn test_events_follow_stage_order() {
    let dir = tempfile::tempdir().unwrap();
    let services = Arc::new(FakeServices::healthy());
    let (sink, mut rx) = ChannelEventSink::new();
    let wf = workflow(collaborators(services, Arc::new(Narrator)), dir.path())
        .with_sink(Arc::new(sink));

    wf.execute(vec![], acme()).await;

    let mut started = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let PipelineEvent::StageStarted { stage, .. } = event {
            started.push(stage);
        }
    }
    assert_eq!(started.len(), 7);
    assert!(started.windows(2).all(|w| w[0] < w[1]));
}
