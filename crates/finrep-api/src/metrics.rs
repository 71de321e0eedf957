//! Prometheus counters fed by pipeline events
use finrep_core::{EventSink, PipelineEvent};
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

pub struct Metrics {
    registry: Registry,
    workflows: IntCounterVec,
    stage_outcomes: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let workflows = IntCounterVec::new(
            Opts::new("finrep_workflows_total", "Finished workflow runs by status"),
            &["status"],
        )?;
        let stage_outcomes = IntCounterVec::new(
            Opts::new("finrep_stage_outcomes_total", "Stage results by stage and status"),
            &["stage", "status"],
        )?;
        registry.register(Box::new(workflows.clone()))?;
        registry.register(Box::new(stage_outcomes.clone()))?;

        Ok(Self {
            registry,
            workflows,
            stage_outcomes,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}

impl EventSink for Metrics {
    fn emit(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::StageFinished { stage, status, .. } => self
                .stage_outcomes
                .with_label_values(&[stage.as_str(), status.as_str()])
                .inc(),
            PipelineEvent::WorkflowFinished { status, .. } => {
                self.workflows.with_label_values(&[status.as_str()]).inc()
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finrep_core::{StageKind, StageStatus, WorkflowStatus};

    #[test]
    fn test_counts_stage_and_workflow_outcomes() {
        let metrics = Metrics::new().unwrap();
        metrics.emit(&PipelineEvent::StageFinished {
            workflow_id: "W".to_string(),
            stage: StageKind::Compliance,
            status: StageStatus::Degraded,
            latency_ms: 3,
        });
        metrics.emit(&PipelineEvent::WorkflowFinished {
            workflow_id: "W".to_string(),
            status: WorkflowStatus::Completed,
            execution_time_seconds: 0.1,
        });

        let text = metrics.encode().unwrap();
        assert!(text.contains("finrep_stage_outcomes_total{stage=\"compliance\",status=\"degraded\"} 1"));
        assert!(text.contains("finrep_workflows_total{status=\"completed\"} 1"));
    }
}
