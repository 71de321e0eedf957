//! Runtime configuration read from the environment
use finrep_stages::WorkflowSettings;
use finrep_tools::{ServiceEndpoints, ServiceName};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("CONFIG/MISSING: {0} must be set")]
    Missing(&'static str),
    #[error("CONFIG/INVALID: {key}={value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct ReasoningConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub addr: String,
    pub workflow: WorkflowSettings,
    pub endpoints: ServiceEndpoints,
    pub tool_timeout: Duration,
    pub reasoning: ReasoningConfig,
}

impl AppConfig {
    /// Read `FINREP_*` variables, seeding them from `.env` when present
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let host = get("FINREP_SERVICE_HOST", "localhost");
        let mut endpoints = ServiceEndpoints::on_host(&host);
        for (service, key) in [
            (ServiceName::Document, "FINREP_DOCUMENT_PORT"),
            (ServiceName::Compliance, "FINREP_COMPLIANCE_PORT"),
            (ServiceName::Market, "FINREP_MARKET_PORT"),
            (ServiceName::Reporting, "FINREP_REPORTING_PORT"),
        ] {
            let port: u16 = parse(key, &get(key, &service.default_port().to_string()))?;
            endpoints = endpoints.with_url(service, format!("http://{}:{}", host, port));
        }

        let api_key = lookup("FINREP_REASONING_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("FINREP_REASONING_API_KEY"))?;

        Ok(Self {
            addr: get("FINREP_ADDR", "0.0.0.0:8787"),
            workflow: WorkflowSettings {
                reports_dir: PathBuf::from(get("FINREP_REPORTS_DIR", "./generated_reports")),
                workflow_prefix: get("FINREP_WORKFLOW_PREFIX", finrep_core::DEFAULT_WORKFLOW_PREFIX),
            },
            endpoints,
            tool_timeout: millis("FINREP_TOOL_TIMEOUT_MS", &get("FINREP_TOOL_TIMEOUT_MS", "30000"))?,
            reasoning: ReasoningConfig {
                base_url: get("FINREP_REASONING_URL", "https://api.deepseek.com/v1"),
                model: get("FINREP_REASONING_MODEL", "deepseek-chat"),
                api_key,
                timeout: millis(
                    "FINREP_REASONING_TIMEOUT_MS",
                    &get("FINREP_REASONING_TIMEOUT_MS", "120000"),
                )?,
            },
        })
    }
}

fn parse<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn millis(key: &'static str, value: &str) -> Result<Duration, ConfigError> {
    let ms: u64 = parse(key, value)?;
    if ms == 0 {
        return Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: "timeout must be positive".to_string(),
        });
    }
    Ok(Duration::from_millis(ms))
}
