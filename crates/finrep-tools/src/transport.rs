//! Tool transports: how a `{tool_name, parameters}` request reaches a service
use crate::error::ToolError;
use crate::service::{ServiceEndpoints, ServiceName};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

/// Carries one tool call to a service and returns its raw JSON response.
///
/// Implementations make a single attempt and never retry.
#[async_trait]
pub trait ToolTransport: Send + Sync {
    async fn call(
        &self,
        service: ServiceName,
        tool_name: &str,
        parameters: &Value,
    ) -> Result<Value, ToolError>;
}

/// POSTs `{tool_name, parameters}` to `{base_url}/call_tool`
pub struct HttpToolTransport {
    client: reqwest::Client,
    endpoints: ServiceEndpoints,
    timeout_ms: u64,
}

impl HttpToolTransport {
    pub fn new(endpoints: ServiceEndpoints, timeout: Duration) -> Result<Self, ToolError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ToolError::Transport {
                service: ServiceName::Document,
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            endpoints,
            timeout_ms: timeout.as_millis() as u64,
        })
    }

    pub fn endpoints(&self) -> &ServiceEndpoints {
        &self.endpoints
    }
}

#[async_trait]
impl ToolTransport for HttpToolTransport {
    async fn call(
        &self,
        service: ServiceName,
        tool_name: &str,
        parameters: &Value,
    ) -> Result<Value, ToolError> {
        let url = format!("{}/call_tool", self.endpoints.base_url(service));
        let body = json!({
            "tool_name": tool_name,
            "parameters": parameters,
        });

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify(service, e))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(ToolError::Transport {
                service,
                message: format!("HTTP {}: {}", status.as_u16(), text),
            });
        }

        resp.json::<Value>()
            .await
            .map_err(|e| self.classify(service, e))
    }
}

impl HttpToolTransport {
    fn classify(&self, service: ServiceName, err: reqwest::Error) -> ToolError {
        if err.is_timeout() {
            ToolError::Timeout {
                service,
                timeout_ms: self.timeout_ms,
            }
        } else {
            ToolError::Transport {
                service,
                message: err.to_string(),
            }
        }
    }
}
