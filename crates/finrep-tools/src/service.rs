//! Domain services, their tool registries and endpoints
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const HEALTH_CHECK: &str = "health_check";
pub const EXTRACT_FINANCIAL_DATA: &str = "extract_financial_data";
pub const CHECK_REGULATORY_COMPLIANCE: &str = "check_regulatory_compliance";
pub const GET_MARKET_CONTEXT: &str = "get_market_context";
pub const GENERATE_FINANCIAL_REPORT: &str = "generate_financial_report";
pub const LIST_REPORTS: &str = "list_reports";

/// The four domain services a workflow talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceName {
    Document,
    Compliance,
    Market,
    Reporting,
}

impl ServiceName {
    pub const ALL: [ServiceName; 4] = [
        ServiceName::Document,
        ServiceName::Compliance,
        ServiceName::Market,
        ServiceName::Reporting,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceName::Document => "document",
            ServiceName::Compliance => "compliance",
            ServiceName::Market => "market",
            ServiceName::Reporting => "reporting",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == name)
    }

    /// Tools the service exposes
    pub fn tools(&self) -> &'static [&'static str] {
        match self {
            ServiceName::Document => &[EXTRACT_FINANCIAL_DATA, HEALTH_CHECK],
            ServiceName::Compliance => &[CHECK_REGULATORY_COMPLIANCE, HEALTH_CHECK],
            ServiceName::Market => &[GET_MARKET_CONTEXT, HEALTH_CHECK],
            ServiceName::Reporting => &[GENERATE_FINANCIAL_REPORT, LIST_REPORTS, HEALTH_CHECK],
        }
    }

    pub fn has_tool(&self, tool: &str) -> bool {
        self.tools().contains(&tool)
    }

    pub fn default_port(&self) -> u16 {
        match self {
            ServiceName::Document => 8001,
            ServiceName::Compliance => 8002,
            ServiceName::Market => 8003,
            ServiceName::Reporting => 8004,
        }
    }
}

impl std::fmt::Display for ServiceName {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Base URL per service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoints {
    urls: BTreeMap<ServiceName, String>,
}

impl ServiceEndpoints {
    /// Every service on `host` at its default port
    pub fn on_host(host: &str) -> Self {
        let urls = ServiceName::ALL
            .into_iter()
            .map(|s| (s, format!("http://{}:{}", host, s.default_port())))
            .collect();
        Self { urls }
    }

    pub fn with_url(mut self, service: ServiceName, url: impl Into<String>) -> Self {
        self.urls
            .insert(service, url.into().trim_end_matches('/').to_string());
        self
    }

    pub fn base_url(&self, service: ServiceName) -> &str {
        self.urls.get(&service).map(String::as_str).unwrap_or_default()
    }
}

impl Default for ServiceEndpoints {
    fn default() -> Self {
        Self::on_host("localhost")
    }
}
