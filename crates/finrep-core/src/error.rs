//! Unified Error Model
//!
//! These errors are fatal to a workflow run. Collaborator and computation
//! failures never surface here; stages absorb them into their `StageResult`.
use crate::stage::StageKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinrepError {
    #[error("STAGE/MISSING: {0} result not available")]
    MissingStage(StageKind),

    #[error("PIPELINE/ORDER: {previous} cannot precede {next}")]
    StageOrder { previous: StageKind, next: StageKind },

    #[error("PIPELINE/EMPTY: no stages configured")]
    EmptyPipeline,

    #[error("STAGE/PAYLOAD: {stage} returned a {payload} payload")]
    PayloadMismatch { stage: StageKind, payload: StageKind },

    #[error("STAGE/EXEC: {0}")]
    ExecutionFailed(String),

    #[error("SERIALIZE/{0}")]
    SerializeError(String),
}

impl From<serde_json::Error> for FinrepError {
    fn from(err: serde_json::Error) -> Self {
        FinrepError::SerializeError(err.to_string())
    }
}
