//! Workflow Envelope: the immutable record of one finished run
use crate::data_model::ReportReference;
use crate::stage::{StageKind, StageResult, StageStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default prefix for workflow identifiers
pub const DEFAULT_WORKFLOW_PREFIX: &str = "FINWF";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    Completed,
    /// Reserved for errors that escaped a stage
    Failed,
}

impl WorkflowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStatus::Completed => "completed",
            WorkflowStatus::Failed => "failed",
        }
    }
}

/// Timing and fingerprint of one executed stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageRecord {
    pub stage: StageKind,
    pub status: StageStatus,
    pub latency_ms: u64,
    /// blake3 digest of the serialized stage result
    pub digest: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowEnvelope {
    pub workflow_id: String,
    pub status: WorkflowStatus,
    pub company: String,
    pub stage_status: BTreeMap<StageKind, StageStatus>,
    pub stages: Vec<StageRecord>,
    pub results: BTreeMap<StageKind, StageResult>,
    pub execution_time_seconds: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<ReportReference>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
}

impl WorkflowEnvelope {
    pub fn is_completed(&self) -> bool {
        self.status == WorkflowStatus::Completed
    }

    pub fn result(&self, kind: StageKind) -> Option<&StageResult> {
        self.results.get(&kind)
    }

    /// URL of the report, if the run got as far as report generation
    pub fn report_url(&self) -> Option<&str> {
        self.report.as_ref().map(|r| r.url.as_str())
    }
}

/// `PREFIX-YYYYMMDD-HHMMSS`
pub fn generate_workflow_id(prefix: &str, at: DateTime<Utc>) -> String {
    format!("{}-{}", prefix, at.format("%Y%m%d-%H%M%S"))
}

/// `report_YYYYMMDD_HHMMSS`. Two reports in the same second collide.
pub fn generate_report_id(at: DateTime<Utc>) -> String {
    format!("report_{}", at.format("%Y%m%d_%H%M%S"))
}
