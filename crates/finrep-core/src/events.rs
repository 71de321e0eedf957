//! Pipeline events emitted at every state transition
use crate::envelope::WorkflowStatus;
use crate::stage::{StageKind, StageStatus};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PipelineEvent {
    WorkflowStarted {
        workflow_id: String,
        company: String,
    },
    StageStarted {
        workflow_id: String,
        stage: StageKind,
    },
    StageFinished {
        workflow_id: String,
        stage: StageKind,
        status: StageStatus,
        latency_ms: u64,
    },
    WorkflowFinished {
        workflow_id: String,
        status: WorkflowStatus,
        execution_time_seconds: f64,
    },
}

/// Consumer of pipeline events
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &PipelineEvent);
}

/// Writes every event to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::WorkflowStarted { workflow_id, company } => {
                tracing::info!(%workflow_id, %company, "workflow started");
            }
            PipelineEvent::StageStarted { workflow_id, stage } => {
                tracing::info!(%workflow_id, stage = %stage, "stage started");
            }
            PipelineEvent::StageFinished {
                workflow_id,
                stage,
                status,
                latency_ms,
            } => match status {
                StageStatus::Completed => {
                    tracing::info!(%workflow_id, stage = %stage, latency_ms, "stage completed");
                }
                StageStatus::Degraded | StageStatus::Error => {
                    tracing::warn!(
                        %workflow_id,
                        stage = %stage,
                        status = status.as_str(),
                        latency_ms,
                        "stage finished with degraded output"
                    );
                }
            },
            PipelineEvent::WorkflowFinished {
                workflow_id,
                status,
                execution_time_seconds,
            } => match status {
                WorkflowStatus::Completed => {
                    tracing::info!(%workflow_id, execution_time_seconds, "workflow completed");
                }
                WorkflowStatus::Failed => {
                    tracing::error!(%workflow_id, execution_time_seconds, "workflow failed");
                }
            },
        }
    }
}

/// Forwards events to an unbounded channel. Send errors (receiver gone) are ignored.
#[derive(Debug, Clone)]
pub struct ChannelEventSink {
    tx: mpsc::UnboundedSender<PipelineEvent>,
}

impl ChannelEventSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PipelineEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: &PipelineEvent) {
        let _ = self.tx.send(event.clone());
    }
}
