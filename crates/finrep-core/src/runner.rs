//! Pipeline Runner: runs stages in order, records timing and assembles the envelope
use crate::context::WorkflowContext;
use crate::envelope::{StageRecord, WorkflowEnvelope, WorkflowStatus};
use crate::error::FinrepError;
use crate::events::{EventSink, PipelineEvent, TracingEventSink};
use crate::stage::{Stage, StageKind, StagePayload, StageResult};
use futures::FutureExt;
use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

pub struct PipelineRunner {
    stages: Vec<Box<dyn Stage>>,
    pipeline_id: String,
    sinks: Vec<Arc<dyn EventSink>>,
}

impl PipelineRunner {
    /// Build a runner. Stages must be non-empty, unique and in canonical order.
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Result<Self, FinrepError> {
        if stages.is_empty() {
            return Err(FinrepError::EmptyPipeline);
        }

        for pair in stages.windows(2) {
            let (previous, next) = (pair[0].kind(), pair[1].kind());
            if previous >= next {
                return Err(FinrepError::StageOrder { previous, next });
            }
        }

        let pipeline_id = stages
            .iter()
            .map(|s| s.kind().as_str())
            .collect::<Vec<_>>()
            .join("→");

        Ok(Self {
            stages,
            pipeline_id,
            sinks: vec![Arc::new(TracingEventSink)],
        })
    }

    /// Add an event consumer alongside the default tracing sink
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn pipeline_id(&self) -> &str {
        &self.pipeline_id
    }

    pub fn stage_kinds(&self) -> Vec<StageKind> {
        self.stages.iter().map(|s| s.kind()).collect()
    }

    fn emit(&self, event: PipelineEvent) {
        for sink in &self.sinks {
            sink.emit(&event);
        }
    }

    /// Execute every stage against `ctx` and assemble the envelope.
    ///
    /// A stage error or panic stops the run; the envelope is then `Failed`
    /// and carries the results of the stages that finished before it.
    pub async fn run(&self, mut ctx: WorkflowContext) -> WorkflowEnvelope {
        let workflow_id = ctx.workflow_id.clone();
        self.emit(PipelineEvent::WorkflowStarted {
            workflow_id: workflow_id.clone(),
            company: ctx.company.name.clone(),
        });

        let started = Instant::now();
        let mut records = Vec::with_capacity(self.stages.len());
        let mut failure: Option<(String, String)> = None;

        for stage in &self.stages {
            let kind = stage.kind();
            self.emit(PipelineEvent::StageStarted {
                workflow_id: workflow_id.clone(),
                stage: kind,
            });

            let stage_start = Instant::now();
            let outcome = AssertUnwindSafe(stage.run(&ctx))
                .catch_unwind()
                .await
                .map(|r| r.and_then(|result| matching_payload(kind, result)));
            let latency_ms = stage_start.elapsed().as_millis() as u64;

            match outcome {
                Ok(Ok(result)) => {
                    let status = result.status();
                    records.push(StageRecord {
                        stage: kind,
                        status,
                        latency_ms,
                        digest: digest(&result),
                    });
                    self.emit(PipelineEvent::StageFinished {
                        workflow_id: workflow_id.clone(),
                        stage: kind,
                        status,
                        latency_ms,
                    });
                    ctx.record(kind, result);
                }
                Ok(Err(err)) => {
                    tracing::error!(%workflow_id, stage = %kind, error = %err, "stage aborted workflow");
                    failure = Some((
                        err.to_string(),
                        failure_details(kind, &format!("{:?}", err), &records),
                    ));
                    break;
                }
                Err(panic) => {
                    let message = panic_message(panic.as_ref());
                    tracing::error!(%workflow_id, stage = %kind, panic = %message, "stage panicked");
                    failure = Some((
                        format!("STAGE/PANIC: {} panicked: {}", kind, message),
                        failure_details(kind, &message, &records),
                    ));
                    break;
                }
            }
        }

        let execution_time_seconds = round2(started.elapsed().as_secs_f64());
        let status = if failure.is_some() {
            WorkflowStatus::Failed
        } else {
            WorkflowStatus::Completed
        };

        self.emit(PipelineEvent::WorkflowFinished {
            workflow_id: workflow_id.clone(),
            status,
            execution_time_seconds,
        });

        let stage_status: BTreeMap<_, _> = records.iter().map(|r| (r.stage, r.status)).collect();
        let report = ctx.report().map(|r| r.reference.clone());
        let company = ctx.company.name.clone();
        let (error, error_details) = match failure {
            Some((message, details)) => (Some(message), Some(details)),
            None => (None, None),
        };

        WorkflowEnvelope {
            workflow_id,
            status,
            company,
            stage_status,
            stages: records,
            results: ctx.into_results(),
            execution_time_seconds,
            report,
            timestamp: chrono::Utc::now(),
            error,
            error_details,
        }
    }
}

/// A payload must belong to the stage that produced it
fn matching_payload(stage: StageKind, result: StageResult) -> Result<StageResult, FinrepError> {
    match result.payload().map(StagePayload::kind) {
        Some(payload) if payload != stage => Err(FinrepError::PayloadMismatch { stage, payload }),
        _ => Ok(result),
    }
}

fn digest(result: &StageResult) -> String {
    let bytes = serde_json::to_vec(result).unwrap_or_default();
    format!("blake3:{}", blake3::hash(&bytes))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

fn failure_details(kind: StageKind, cause: &str, completed: &[StageRecord]) -> String {
    let done = completed
        .iter()
        .map(|r| r.stage.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "stage: {}\ncause: {}\ncompleted stages: [{}]",
        kind, cause, done
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_model::{CompanyProfile, ComplianceResult, MarketAnalysis, MarketSnapshot};
    use crate::events::ChannelEventSink;
    use crate::stage::StageStatus;
    use async_trait::async_trait;

    struct Fixed(StageKind, StageResult);

    #[async_trait]
    impl Stage for Fixed {
        fn kind(&self) -> StageKind {
            self.0
        }

        async fn run(&self, _ctx: &WorkflowContext) -> Result<StageResult, FinrepError> {
            Ok(self.1.clone())
        }
    }

    struct NeedsExtraction;

    #[async_trait]
    impl Stage for NeedsExtraction {
        fn kind(&self) -> StageKind {
            StageKind::FinancialAnalysis
        }

        async fn run(&self, ctx: &WorkflowContext) -> Result<StageResult, FinrepError> {
            ctx.extraction()
                .ok_or(FinrepError::MissingStage(StageKind::Extraction))?;
            unreachable!("extraction is never present in these tests")
        }
    }

    struct Panics;

    #[async_trait]
    impl Stage for Panics {
        fn kind(&self) -> StageKind {
            StageKind::MarketContext
        }

        async fn run(&self, _ctx: &WorkflowContext) -> Result<StageResult, FinrepError> {
            panic!("malformed payload slipped through")
        }
    }

    fn compliance_ok() -> StageResult {
        StageResult::success(StagePayload::Compliance(ComplianceResult::default()))
    }

    fn market_ok() -> StageResult {
        StageResult::success(StagePayload::MarketContext(MarketAnalysis {
            snapshot: MarketSnapshot::default(),
            narrative: String::new(),
        }))
    }

    fn ctx() -> WorkflowContext {
        WorkflowContext::new("FINWF-TEST", CompanyProfile::new("Acme", "Tech"), vec![])
    }

    #[test]
    fn test_rejects_out_of_order_stages() {
        let stages: Vec<Box<dyn Stage>> = vec![
            Box::new(Fixed(StageKind::Compliance, compliance_ok())),
            Box::new(Fixed(StageKind::Extraction, compliance_ok())),
        ];
        assert!(matches!(
            PipelineRunner::new(stages),
            Err(FinrepError::StageOrder { .. })
        ));
        assert!(matches!(
            PipelineRunner::new(vec![]),
            Err(FinrepError::EmptyPipeline)
        ));
    }

    #[tokio::test]
    async fn test_stage_errors_do_not_abort() {
        let runner = PipelineRunner::new(vec![
            Box::new(Fixed(StageKind::Compliance, StageResult::error("offline", None))),
            Box::new(Fixed(StageKind::MarketContext, market_ok())),
        ])
        .unwrap();

        let envelope = runner.run(ctx()).await;
        assert_eq!(envelope.status, WorkflowStatus::Completed);
        assert_eq!(envelope.stage_status[&StageKind::Compliance], StageStatus::Error);
        assert_eq!(envelope.stage_status[&StageKind::MarketContext], StageStatus::Completed);
        assert_eq!(envelope.stages.len(), 2);
        assert!(envelope.stages[0].digest.starts_with("blake3:"));
        assert!(envelope.error.is_none());
    }

    #[tokio::test]
    async fn test_stage_err_fails_with_partial_results() {
        let runner = PipelineRunner::new(vec![
            Box::new(NeedsExtraction),
            Box::new(Fixed(StageKind::Compliance, compliance_ok())),
        ])
        .unwrap();

        let envelope = runner.run(ctx()).await;
        assert_eq!(envelope.status, WorkflowStatus::Failed);
        assert!(envelope.error.as_deref().unwrap().contains("STAGE/MISSING"));
        assert!(envelope.error_details.is_some());
        assert!(envelope.results.is_empty());
        assert!(envelope.report.is_none());
    }

    #[tokio::test]
    async fn test_payload_of_another_stage_fails_the_run() {
        let runner = PipelineRunner::new(vec![
            Box::new(Fixed(StageKind::Compliance, compliance_ok())),
            Box::new(Fixed(StageKind::MarketContext, compliance_ok())),
        ])
        .unwrap();

        let envelope = runner.run(ctx()).await;
        assert_eq!(envelope.status, WorkflowStatus::Failed);
        assert!(envelope.error.as_deref().unwrap().contains("STAGE/PAYLOAD"));
        assert_eq!(envelope.results.len(), 1);
        assert!(!envelope.results.contains_key(&StageKind::MarketContext));
    }

    #[tokio::test]
    async fn test_panic_is_contained() {
        let runner = PipelineRunner::new(vec![
            Box::new(Fixed(StageKind::Compliance, compliance_ok())),
            Box::new(Panics),
            Box::new(Fixed(StageKind::RiskAssessment, compliance_ok())),
        ])
        .unwrap();

        let envelope = runner.run(ctx()).await;
        assert_eq!(envelope.status, WorkflowStatus::Failed);
        assert!(envelope.error.as_deref().unwrap().contains("malformed payload"));
        assert_eq!(envelope.results.len(), 1);
        assert!(envelope.results.contains_key(&StageKind::Compliance));
    }

    #[tokio::test]
    async fn test_emits_transition_events_in_order() {
        let (sink, mut rx) = ChannelEventSink::new();
        let runner = PipelineRunner::new(vec![Box::new(Fixed(
            StageKind::Compliance,
            compliance_ok(),
        ))])
        .unwrap()
        .with_sink(Arc::new(sink));

        runner.run(ctx()).await;

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], PipelineEvent::WorkflowStarted { .. }));
        assert!(matches!(
            events[1],
            PipelineEvent::StageStarted { stage: StageKind::Compliance, .. }
        ));
        assert!(matches!(events[2], PipelineEvent::StageFinished { .. }));
        assert!(matches!(
            events[3],
            PipelineEvent::WorkflowFinished { status: WorkflowStatus::Completed, .. }
        ));
    }

    #[test]
    fn test_pipeline_id() {
        let runner = PipelineRunner::new(vec![
            Box::new(Fixed(StageKind::Extraction, compliance_ok())),
            Box::new(Fixed(StageKind::Compliance, compliance_ok())),
        ])
        .unwrap();
        assert_eq!(runner.pipeline_id(), "extraction→compliance");
    }
}
