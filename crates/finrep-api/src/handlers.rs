//! API Handlers
use crate::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use finrep_core::{CompanyProfile, WorkflowEnvelope, FINREP_VERSION};
use finrep_tools::service::LIST_REPORTS;
use finrep_tools::{ReportListing, ServiceName};
use serde::Deserialize;
use serde_json::{json, Value};

type ApiResult<T> = Result<T, (StatusCode, Json<Value>)>;

fn problem(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": message.into() })))
}

#[derive(Debug, Deserialize)]
pub struct WorkflowRequest {
    #[serde(default)]
    pub documents: Vec<String>,
    pub company: CompanyProfile,
}

/// Run one workflow to completion on its own task
pub async fn run_workflow(
    State(state): State<AppState>,
    Json(request): Json<WorkflowRequest>,
) -> ApiResult<Json<WorkflowEnvelope>> {
    if request.company.name.trim().is_empty() {
        return Err(problem(StatusCode::BAD_REQUEST, "company.name is required"));
    }

    let workflow = state.workflow.clone();
    let handle = tokio::spawn(async move {
        workflow.execute(request.documents, request.company).await
    });

    match handle.await {
        Ok(envelope) => Ok(Json(envelope)),
        Err(e) => {
            tracing::error!(error = %e, "workflow task did not finish");
            Err(problem(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

pub async fn services_health(State(state): State<AppState>) -> Json<Value> {
    let services = state.tools.health_all().await;
    let healthy = services.iter().all(|s| s.healthy);
    Json(json!({ "healthy": healthy, "services": services }))
}

/// Recent reports, as listed by the reporting service
pub async fn list_reports(State(state): State<AppState>) -> ApiResult<Json<ReportListing>> {
    state
        .tools
        .invoke_as::<ReportListing>(ServiceName::Reporting, LIST_REPORTS, json!({}))
        .await
        .map(Json)
        .map_err(|e| {
            tracing::warn!(error = %e, "report listing unavailable");
            problem(StatusCode::BAD_GATEWAY, e.to_string())
        })
}

pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "version": FINREP_VERSION })),
    )
}

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    match state.metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain")],
            e.to_string(),
        ),
    }
}
