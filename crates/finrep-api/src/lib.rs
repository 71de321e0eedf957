//! FINREP API /v1: REST endpoints over the workflow
pub mod config;
pub mod handlers;
pub mod metrics;
pub mod middleware;

pub use config::{AppConfig, ConfigError, ReasoningConfig};
pub use metrics::Metrics;

use axum::{
    routing::{get, post},
    Router,
};
use finrep_core::{FinrepError, ReasoningError};
use finrep_stages::{Collaborators, FinancialWorkflow};
use finrep_tools::{ChatCompletionClient, ToolError, ToolInvoker};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("tool invoker: {0}")]
    Tools(#[from] ToolError),
    #[error("reasoning client: {0}")]
    Reasoning(#[from] ReasoningError),
    #[error("pipeline: {0}")]
    Pipeline(#[from] FinrepError),
    #[error("metrics: {0}")]
    Metrics(String),
    #[error("server: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared, read-only handles for every request
#[derive(Clone)]
pub struct AppState {
    pub workflow: Arc<FinancialWorkflow>,
    pub tools: Arc<ToolInvoker>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Wire collaborators into a workflow whose events feed the metrics
    pub fn new(
        collaborators: Collaborators,
        settings: finrep_stages::WorkflowSettings,
    ) -> Result<Self, StartupError> {
        let metrics = Arc::new(Metrics::new().map_err(|e| StartupError::Metrics(e.to_string()))?);
        let tools = collaborators.tools.clone();
        let workflow = FinancialWorkflow::new(collaborators, settings)?.with_sink(metrics.clone());

        Ok(Self {
            workflow: Arc::new(workflow),
            tools,
            metrics,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, StartupError> {
        let tools = Arc::new(ToolInvoker::http(config.endpoints.clone(), config.tool_timeout)?);
        let reasoning = Arc::new(ChatCompletionClient::new(
            config.reasoning.base_url.clone(),
            config.reasoning.model.clone(),
            config.reasoning.api_key.clone(),
            config.reasoning.timeout,
        )?);
        Self::new(Collaborators::new(tools, reasoning), config.workflow.clone())
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/v1/workflows", post(handlers::run_workflow))
        .route("/v1/services/health", get(handlers::services_health))
        .route("/v1/reports", get(handlers::list_reports))
        .route("/v1/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .layer(middleware::cors())
        .layer(middleware::trace())
        .with_state(state)
}

pub async fn run(config: AppConfig) -> Result<(), StartupError> {
    let state = AppState::from_config(&config)?;
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(&config.addr).await?;

    tracing::info!(addr = %config.addr, "FINREP API listening");
    axum::serve(listener, app).await?;
    Ok(())
}
