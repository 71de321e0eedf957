//! Reasoning service boundary: an opaque text-completion function
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Low temperature keeps narrative generation close to deterministic
pub const ANALYSIS_TEMPERATURE: f32 = 0.1;
pub const ANALYSIS_MAX_TOKENS: u32 = 2000;

const ANALYST_SYSTEM_PROMPT: &str = "You are a financial analysis expert. Extract and analyze \
financial data accurately. Provide clear, concise insights.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ReasoningError {
    #[error("reasoning service not configured: {0}")]
    NotConfigured(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("reasoning call timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
    #[error("reasoning service returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("reasoning service returned no content")]
    EmptyResponse,
}

#[async_trait]
pub trait ReasoningService: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, ReasoningError>;

    /// Model name reported in artifacts
    fn model(&self) -> &str {
        "unknown"
    }
}

/// Ask the reasoning service to perform `task` over `data`.
///
/// Never fails: a service error comes back as `"Error: ..."` so it can be
/// embedded in the narrative field it was meant to fill.
pub async fn analyze(service: &dyn ReasoningService, task: &str, data: &str) -> String {
    let messages = [
        ChatMessage::system(ANALYST_SYSTEM_PROMPT),
        ChatMessage::user(format!("Task: {}\n\nData to analyze: {}", task, data)),
    ];

    match service
        .complete(&messages, ANALYSIS_TEMPERATURE, ANALYSIS_MAX_TOKENS)
        .await
    {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, "reasoning service call failed");
            format!("Error: {}", e)
        }
    }
}
