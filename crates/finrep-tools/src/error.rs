//! Errors raised by the tool invoker and its transports
use crate::service::ServiceName;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("TOOL/UNKNOWN_CLIENT: no service named '{0}'")]
    UnknownClient(String),

    #[error("TOOL/UNKNOWN_TOOL: {service} has no tool '{tool}'")]
    UnknownTool { service: ServiceName, tool: String },

    #[error("TOOL/TRANSPORT: {service}: {message}")]
    Transport { service: ServiceName, message: String },

    #[error("TOOL/TIMEOUT: {service} did not answer within {timeout_ms}ms")]
    Timeout { service: ServiceName, timeout_ms: u64 },

    #[error("TOOL/REMOTE: {service}: {message}")]
    Remote { service: ServiceName, message: String },

    #[error("TOOL/MALFORMED: {service}.{tool}: {message}")]
    Malformed {
        service: ServiceName,
        tool: String,
        message: String,
    },
}

impl ToolError {
    /// True for failures that never reached the remote service
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ToolError::UnknownClient(_) | ToolError::UnknownTool { .. }
        )
    }
}
