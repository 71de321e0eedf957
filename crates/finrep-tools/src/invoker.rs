//! Remote Tool Invoker
//!
//! Validates the service and tool name locally, forwards the call to the
//! transport, and turns an error-status payload into `ToolError::Remote`.
//! Callers branch on the returned `Result`; nothing is retried here.

use crate::error::ToolError;
use crate::service::{ServiceEndpoints, ServiceName, HEALTH_CHECK};
use crate::transport::{HttpToolTransport, ToolTransport};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Reachability of one service
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceHealth {
    pub service: ServiceName,
    pub healthy: bool,
    /// Status reported by the service, or the error that prevented the probe
    pub detail: String,
    pub latency_ms: u64,
}

#[derive(Clone)]
pub struct ToolInvoker {
    transport: Arc<dyn ToolTransport>,
}

impl ToolInvoker {
    pub fn new(transport: Arc<dyn ToolTransport>) -> Self {
        Self { transport }
    }

    /// Invoker over HTTP with one timeout for every call
    pub fn http(endpoints: ServiceEndpoints, timeout: Duration) -> Result<Self, ToolError> {
        Ok(Self::new(Arc::new(HttpToolTransport::new(endpoints, timeout)?)))
    }

    /// Call `tool_name` on the service named `service_name`
    pub async fn invoke(
        &self,
        service_name: &str,
        tool_name: &str,
        parameters: Value,
    ) -> Result<Value, ToolError> {
        let service = ServiceName::parse(service_name)
            .ok_or_else(|| ToolError::UnknownClient(service_name.to_string()))?;
        self.call(service, tool_name, parameters).await
    }

    pub async fn call(
        &self,
        service: ServiceName,
        tool_name: &str,
        parameters: Value,
    ) -> Result<Value, ToolError> {
        if !service.has_tool(tool_name) {
            return Err(ToolError::UnknownTool {
                service,
                tool: tool_name.to_string(),
            });
        }

        tracing::debug!(%service, tool = tool_name, "invoking remote tool");
        let response = self.transport.call(service, tool_name, &parameters).await?;

        if response.get("status").and_then(Value::as_str) == Some("error") {
            let message = response
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("service reported an error without a message")
                .to_string();
            return Err(ToolError::Remote { service, message });
        }

        Ok(response)
    }

    /// Call a tool and decode the response into `T`
    pub async fn invoke_as<T: DeserializeOwned>(
        &self,
        service: ServiceName,
        tool_name: &str,
        parameters: Value,
    ) -> Result<T, ToolError> {
        let value = self.call(service, tool_name, parameters).await?;
        serde_json::from_value(value).map_err(|e| ToolError::Malformed {
            service,
            tool: tool_name.to_string(),
            message: e.to_string(),
        })
    }

    /// Probe one service with its `health_check` tool
    pub async fn health(&self, service: ServiceName) -> ServiceHealth {
        let started = Instant::now();
        let outcome = self.call(service, HEALTH_CHECK, json!({})).await;
        let latency_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(value) => ServiceHealth {
                service,
                healthy: true,
                detail: value
                    .get("status")
                    .and_then(Value::as_str)
                    .unwrap_or("ok")
                    .to_string(),
                latency_ms,
            },
            Err(e) => ServiceHealth {
                service,
                healthy: false,
                detail: e.to_string(),
                latency_ms,
            },
        }
    }

    /// Probe every service concurrently
    pub async fn health_all(&self) -> Vec<ServiceHealth> {
        futures::future::join_all(ServiceName::ALL.into_iter().map(|s| self.health(s))).await
    }
}
